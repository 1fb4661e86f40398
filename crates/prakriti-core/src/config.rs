//! Layered configuration loader and path helpers.
//!
//! Uses Figment to merge typed defaults + `config.toml` + `config.<env>.toml`
//! + `PRAKRITI_*` env vars (`__` separates nested keys, e.g.
//! `PRAKRITI_TRAINING__SEED=7`).
//!
//! The base directory holding `config.toml` is `PRAKRITI_HOME` when set,
//! otherwise the working directory if it has a `config.toml`, otherwise the
//! nearest ancestor of the running executable that has one.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::dataset::{DEFAULT_TARGET_COLUMN, SENTINEL_CATEGORY};
use crate::encoding::UnseenPolicy;
use crate::error::Error;
use crate::params::{BoostingParams, ForestParams, LogisticParams, SvmParams};
use crate::types::Algorithm;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub dataset_path: String,
    pub target_column: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            dataset_path: "dataset/Updated_Prakriti_With_Features.csv".to_string(),
            target_column: DEFAULT_TARGET_COLUMN.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactSettings {
    pub model_dir: String,
    pub outputs_dir: String,
}

impl Default for ArtifactSettings {
    fn default() -> Self { Self { model_dir: "models".to_string(), outputs_dir: "outputs".to_string() } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingSettings {
    pub test_size: f64,
    pub seed: u64,
    /// Stratified k-fold selection when >= 2; 0 selects on the held-out test split.
    pub cv_folds: usize,
    pub candidates: Vec<Algorithm>,
    pub show_progress: bool,
    pub random_forest: ForestParams,
    pub gradient_boosting: BoostingParams,
    pub logistic_regression: LogisticParams,
    pub svm: SvmParams,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            seed: 42,
            cv_folds: 0,
            candidates: Algorithm::ALL.to_vec(),
            show_progress: true,
            random_forest: ForestParams::default(),
            gradient_boosting: BoostingParams::default(),
            logistic_regression: LogisticParams::default(),
            svm: SvmParams::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceSettings {
    /// Value substituted for features absent from a prediction request.
    pub sentinel: String,
    pub unseen_policy: UnseenPolicy,
}

impl Default for InferenceSettings {
    fn default() -> Self { Self { sentinel: SENTINEL_CATEGORY.to_string(), unseen_policy: UnseenPolicy::FirstCode } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub artifacts: ArtifactSettings,
    pub training: TrainingSettings,
    pub inference: InferenceSettings,
}

impl Settings {
    pub fn validate(&self) -> crate::error::Result<()> {
        let t = &self.training;
        if !(t.test_size > 0.0 && t.test_size < 1.0) {
            return Err(Error::InvalidConfig(format!("training.test_size must be in (0, 1), got {}", t.test_size)));
        }
        if t.cv_folds == 1 {
            return Err(Error::InvalidConfig("training.cv_folds must be 0 (disabled) or >= 2".to_string()));
        }
        if t.candidates.is_empty() {
            return Err(Error::InvalidConfig("training.candidates must name at least one algorithm".to_string()));
        }
        if t.random_forest.n_estimators == 0 || t.gradient_boosting.n_estimators == 0 {
            return Err(Error::InvalidConfig("ensembles need at least one estimator".to_string()));
        }
        if self.inference.sentinel.is_empty() {
            return Err(Error::InvalidConfig("inference.sentinel must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Environment variable naming the directory that holds `config.toml`.
pub const HOME_ENV: &str = "PRAKRITI_HOME";

/// Directory [`Config::load`] reads `config.toml` from.
pub fn locate_base_dir() -> PathBuf {
    let home = env::var_os(HOME_ENV).filter(|v| !v.is_empty()).map(PathBuf::from);
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let exe = env::current_exe().ok();
    find_base_dir(home, &cwd, exe.as_deref())
}

fn find_base_dir(home: Option<PathBuf>, cwd: &Path, exe: Option<&Path>) -> PathBuf {
    if let Some(home) = home {
        return home;
    }
    if cwd.join("config.toml").is_file() {
        return cwd.to_path_buf();
    }
    exe.and_then(Path::parent)
        .and_then(|dir| dir.ancestors().find(|d| d.join("config.toml").is_file()))
        .map_or_else(|| cwd.to_path_buf(), Path::to_path_buf)
}

pub struct Config {
    figment: Figment,
    base_dir: PathBuf,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> { Self::load_from(&locate_base_dir()) }

    /// Load with config files looked up in `base_dir`; relative paths resolve against it too.
    pub fn load_from(base_dir: &Path) -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(base_dir.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(base_dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base_dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base_dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("PRAKRITI_").ignore(&["home"]).split("__"));

        let config = Self { figment, base_dir: base_dir.to_path_buf() };
        config.validate_for_env(&env_name)?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        self.figment.extract().map_err(|e| anyhow::anyhow!("Failed to extract settings: {}", e))
    }

    /// Resolve a configured path against the config base directory.
    pub fn resolve(&self, raw: &str) -> PathBuf { resolve_with_base(&self.base_dir, raw) }

    fn validate_for_env(&self, env: &str) -> anyhow::Result<()> {
        let settings = self.settings()?;
        settings.validate()?;
        match env {
            "prod" | "production" => {
                if settings.training.candidates.len() < Algorithm::ALL.len() {
                    tracing::warn!(candidates = settings.training.candidates.len(), "production run trains a reduced candidate set");
                }
            }
            "dev" | "development" | "test" | "testing" => {}
            _ => {}
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}

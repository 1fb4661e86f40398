use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use prakriti_core::config::Config;
use prakriti_core::logging::init_logging;
use prakriti_predict::demo::run_demo;
use prakriti_predict::{ErrorResponse, PredictionResponse, Predictor};

#[derive(Parser)]
#[command(name = "prakriti-predict", about = "Predict a dosha from a JSON object of survey answers")]
struct Cli {
    /// JSON object of feature answers; runs the demo when omitted.
    features: Option<String>,

    /// Artifact directory; overrides `artifacts.model_dir`.
    #[arg(long)]
    model_dir: Option<PathBuf>,
}

fn load_predictor(model_dir: Option<PathBuf>) -> anyhow::Result<Predictor> {
    let config = Config::load()?;
    let settings = config.settings()?;
    let dir = model_dir.unwrap_or_else(|| config.resolve(&settings.artifacts.model_dir));
    Predictor::load_with(&dir, &settings.inference)
}

fn predict(raw: &str, model_dir: Option<PathBuf>) -> anyhow::Result<String> {
    let predictor = load_predictor(model_dir)?;
    let result = predictor.predict_json(raw)?;
    serde_json::to_string(&PredictionResponse::from(result)).context("serializing prediction")
}

fn fail(err: &anyhow::Error) -> ExitCode {
    let doc = ErrorResponse::from_error(err);
    match serde_json::to_string(&doc) {
        Ok(json) => eprintln!("{json}"),
        Err(_) => eprintln!("{{\"error\": {:?}, \"message\": {:?}}}", doc.error, doc.message),
    }
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => return fail(&anyhow::Error::new(e).context("invalid arguments")),
        Err(e) => { let _ = e.print(); return ExitCode::SUCCESS; }
    };
    match cli.features {
        Some(raw) => {
            init_logging("warn");
            match predict(&raw, cli.model_dir) {
                Ok(json) => { println!("{json}"); ExitCode::SUCCESS }
                Err(e) => fail(&e),
            }
        }
        None => {
            init_logging("info");
            let run = load_predictor(cli.model_dir).and_then(|p| run_demo(&p, &mut std::io::stdout().lock()));
            match run {
                Ok(_) => ExitCode::SUCCESS,
                Err(e) => { eprintln!("❌ Demo failed: {e:#}"); ExitCode::FAILURE }
            }
        }
    }
}

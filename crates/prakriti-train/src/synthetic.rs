//! Seeded synthetic survey data for smoke runs and pipeline tests.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use prakriti_core::dataset::Dataset;
use prakriti_core::profile::{DOSHA_CLASSES, SURVEY_OPTIONS};
use prakriti_core::Result;

/// Probability that an answer follows the row's dosha.
pub const SIGNAL: f64 = 0.8;

/// `rows` survey responses with dosha labels balanced round-robin.
///
/// Each answer is the dosha-leaning option with probability [`SIGNAL`] and a
/// uniformly random option otherwise.
pub fn generate(rows: usize, seed: u64) -> Result<Dataset> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let feature_names = SURVEY_OPTIONS.iter().map(|(name, _)| (*name).to_string()).collect();
    let mut data = Vec::with_capacity(rows);
    let mut targets = Vec::with_capacity(rows);
    for i in 0..rows {
        let dosha = i % DOSHA_CLASSES.len();
        let row: Vec<String> = SURVEY_OPTIONS
            .iter()
            .map(|(_, options)| {
                let pick = if rng.gen_bool(SIGNAL) { dosha } else { rng.gen_range(0..options.len()) };
                options[pick].to_string()
            })
            .collect();
        data.push(row);
        targets.push(DOSHA_CLASSES[dosha].to_string());
    }
    Dataset::new(feature_names, data, targets)
}

//! Training pipeline: encode, split, fit candidates, select, evaluate, persist.

pub mod evaluation;
pub mod synthetic;
pub mod trainer;

pub use evaluation::{CandidateResult, EvaluationReport};
pub use trainer::{TrainOptions, Trainer, TrainingOutcome};

//! FixTheGap trainer
//!
//! Fits the linear salary model on a labeled CSV and produces the artifact
//! directory consumed by the prediction service.

pub mod dataset;
pub mod errors;
pub mod ols;
pub mod trainer;

use std::path::Path;

pub use dataset::{Dataset, DatasetStats, TrainingRow, REQUIRED_COLUMNS};
pub use errors::TrainerError;
pub use ols::OlsFit;
pub use trainer::{LinearTrainer, TrainingOutcome};

/// Train a model directly from a CSV file.
pub fn train_model_from_csv(path: &Path) -> Result<TrainingOutcome, TrainerError> {
    let dataset = Dataset::from_csv(path)?;
    LinearTrainer::new().train(&dataset)
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

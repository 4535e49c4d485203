//! FixTheGap model layer
//!
//! Everything the trainer writes and the service reads:
//! - `params`: linear regression coefficients and prediction
//! - `encoder`: categorical label encoders
//! - `artifacts`: the on-disk artifact directory
//! - `predict`: salary estimation and the simulated gender adjustment
//! - `reference`: reference market salaries used as lookup fallback
//! - `serialization`: canonical JSON writing

pub mod artifacts;
pub mod encoder;
pub mod errors;
pub mod params;
pub mod predict;
pub mod reference;
pub mod serialization;

pub use artifacts::{ModelArtifacts, GENDER_ENCODER_FILE, PARAMS_FILE, ROLE_ENCODER_FILE};
pub use encoder::{normalize_label, LabelEncoder};
pub use errors::{ModelError, Result};
pub use params::{LinearModelParams, FEATURE_COUNT, FEATURE_NAMES};
pub use predict::{gender_adjusted, round2, SalaryEstimate, ADJUSTED_GENDER, GENDER_GAP_FACTOR};
pub use reference::{ReferenceDataset, SalaryRecord, Sample, REFERENCE_CURRENCY};
pub use serialization::canonical_json_string;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

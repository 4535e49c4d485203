//! Linear salary model trainer
//!
//! Encodes the categorical columns, lays out the design matrix in the
//! serving feature order and fits it with ordinary least squares.

use fixthegap_model::{LabelEncoder, LinearModelParams, ModelArtifacts, FEATURE_COUNT};
use tracing::debug;

use crate::dataset::Dataset;
use crate::errors::TrainerError;
use crate::ols;

/// Trained artifacts plus fit diagnostics
#[derive(Clone, Debug)]
pub struct TrainingOutcome {
    pub artifacts: ModelArtifacts,
    /// In-sample coefficient of determination
    pub r_squared: f64,
}

/// Linear trainer
#[derive(Clone, Debug, Default)]
pub struct LinearTrainer;

impl LinearTrainer {
    pub fn new() -> Self {
        Self
    }

    /// Fit encoders and regression parameters on `dataset`
    pub fn train(&self, dataset: &Dataset) -> Result<TrainingOutcome, TrainerError> {
        if dataset.is_empty() {
            return Err(TrainerError::Dataset("dataset is empty".to_string()));
        }

        let gender = LabelEncoder::fit(dataset.rows.iter().map(|r| r.gender.as_str()));
        let role = LabelEncoder::fit(dataset.rows.iter().map(|r| r.role.as_str()));
        debug!("Gender classes: {:?}", gender.classes());
        debug!("Role classes: {:?}", role.classes());

        let design = self.design_matrix(dataset, &gender, &role)?;
        let targets = dataset.salaries();

        let fit = ols::fit(&design, &targets)?;
        let r_squared = fit.r_squared(&design, &targets);

        let artifacts = ModelArtifacts::new(
            LinearModelParams::new(fit.coef, fit.intercept),
            gender,
            role,
        );
        artifacts.validate()?;

        Ok(TrainingOutcome {
            artifacts,
            r_squared,
        })
    }

    /// Rows of `[experience, role index, gender index]`
    fn design_matrix(
        &self,
        dataset: &Dataset,
        gender: &LabelEncoder,
        role: &LabelEncoder,
    ) -> Result<Vec<Vec<f64>>, TrainerError> {
        dataset
            .rows
            .iter()
            .map(|row| {
                let role_idx = role.encode(&row.role).ok_or_else(|| {
                    TrainerError::Training(format!("role '{}' missing from encoder", row.role))
                })?;
                let gender_idx = gender.encode(&row.gender).ok_or_else(|| {
                    TrainerError::Training(format!("gender '{}' missing from encoder", row.gender))
                })?;

                let features = vec![row.experience, role_idx as f64, gender_idx as f64];
                debug_assert_eq!(features.len(), FEATURE_COUNT);
                Ok(features)
            })
            .collect()
    }
}

//! Linear regression parameters

use crate::errors::{ModelError, Result};
use serde::{Deserialize, Serialize};

/// Feature order expected by the model: `[experience, role index, gender index]`
pub const FEATURE_NAMES: [&str; 3] = ["experience", "role_encoded", "gender_encoded"];

/// Number of input features
pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// Coefficients, intercept and feature order of a fitted linear model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModelParams {
    /// One coefficient per feature, in `features` order
    pub coef: Vec<f64>,
    /// Intercept term
    pub intercept: f64,
    /// Feature names
    pub features: Vec<String>,
}

impl LinearModelParams {
    pub fn new(coef: Vec<f64>, intercept: f64) -> Self {
        Self {
            coef,
            intercept,
            features: FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
        }
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Validate the parameter structure
    pub fn validate(&self) -> Result<()> {
        if self.coef.len() != self.features.len() {
            return Err(ModelError::InvalidParameters(format!(
                "{} coefficients for {} features",
                self.coef.len(),
                self.features.len()
            )));
        }

        if self.features.len() != FEATURE_COUNT {
            return Err(ModelError::InvalidParameters(format!(
                "expected {} features {:?}, got {:?}",
                FEATURE_COUNT, FEATURE_NAMES, self.features
            )));
        }

        if let Some(idx) = self.coef.iter().position(|c| !c.is_finite()) {
            return Err(ModelError::InvalidParameters(format!(
                "coefficient {idx} is not finite"
            )));
        }

        if !self.intercept.is_finite() {
            return Err(ModelError::InvalidParameters(
                "intercept is not finite".to_string(),
            ));
        }

        Ok(())
    }

    /// `intercept + dot(coef, x)`
    pub fn predict(&self, x: &[f64]) -> Result<f64> {
        if x.len() != self.coef.len() {
            return Err(ModelError::InvalidInput(format!(
                "expected {} features, got {}",
                self.coef.len(),
                x.len()
            )));
        }

        let dot: f64 = self.coef.iter().zip(x).map(|(c, v)| c * v).sum();
        Ok(self.intercept + dot)
    }
}

//! Salary estimation from model artifacts

use crate::artifacts::ModelArtifacts;
use crate::encoder::{normalize_label, LabelEncoder};
use crate::errors::{ModelError, Result};
use crate::params::FEATURE_COUNT;
use serde::Serialize;

/// Gender whose estimate receives the simulated markdown
pub const ADJUSTED_GENDER: &str = "female";

/// Simulated pay ratio applied to [`ADJUSTED_GENDER`] (a fixed 10% gap)
pub const GENDER_GAP_FACTOR: f64 = 0.9;

/// Round to two decimal places.
///
/// Values too large to scale by 100 carry no cents and are returned as-is.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if scaled.is_finite() {
        scaled.round() / 100.0
    } else {
        value
    }
}

/// Apply the simulated gender gap to an already rounded prediction.
pub fn gender_adjusted(predicted: f64, gender: &str) -> f64 {
    if normalize_label(gender) == ADJUSTED_GENDER {
        round2(predicted * GENDER_GAP_FACTOR)
    } else {
        predicted
    }
}

/// Model output for one (gender, role, experience) triple
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryEstimate {
    /// Canonical gender label
    pub gender: String,
    /// Canonical role label
    pub role: String,
    pub experience: f64,
    /// Input vector handed to the model
    pub features: [f64; FEATURE_COUNT],
    pub predicted_salary: f64,
    pub gender_adjusted_salary: f64,
    pub pay_gap: f64,
}

fn canonical<'a>(encoder: &'a LabelEncoder, feature: &str, label: &str) -> Result<&'a str> {
    encoder
        .canonical(label)
        .ok_or_else(|| ModelError::UnknownLabel {
            feature: feature.to_string(),
            label: label.trim().to_string(),
            allowed: encoder.classes().to_vec(),
        })
}

fn encode(encoder: &LabelEncoder, feature: &str, label: &str) -> Result<usize> {
    encoder
        .encode(label)
        .ok_or_else(|| ModelError::UnknownLabel {
            feature: feature.to_string(),
            label: label.to_string(),
            allowed: encoder.classes().to_vec(),
        })
}

impl ModelArtifacts {
    /// Stored gender label matching `gender`, case-insensitively
    pub fn canonical_gender(&self, gender: &str) -> Result<&str> {
        canonical(&self.gender, "gender", gender)
    }

    /// Stored role label matching `role`, case-insensitively
    pub fn canonical_role(&self, role: &str) -> Result<&str> {
        canonical(&self.role, "role", role)
    }

    /// Build `[experience, role index, gender index]` from canonical labels.
    pub fn feature_vector(
        &self,
        gender: &str,
        role: &str,
        experience: f64,
    ) -> Result<[f64; FEATURE_COUNT]> {
        let gender_idx = encode(&self.gender, "gender", gender)?;
        let role_idx = encode(&self.role, "role", role)?;
        Ok([experience, role_idx as f64, gender_idx as f64])
    }

    /// Predict a salary and its gender-adjusted counterpart.
    pub fn estimate(&self, gender: &str, role: &str, experience: f64) -> Result<SalaryEstimate> {
        if !experience.is_finite() {
            return Err(ModelError::InvalidInput(format!(
                "experience must be a finite number, got {experience}"
            )));
        }

        let gender_label = self.canonical_gender(gender)?;
        let role_label = self.canonical_role(role)?;

        let features = self.feature_vector(gender_label, role_label, experience)?;
        let raw = self.params.predict(&features)?;
        if !raw.is_finite() {
            return Err(ModelError::InvalidInput(format!(
                "experience {experience} is out of range for this model"
            )));
        }
        let predicted_salary = round2(raw);
        let gender_adjusted_salary = gender_adjusted(predicted_salary, gender);
        let pay_gap = round2(predicted_salary - gender_adjusted_salary);

        Ok(SalaryEstimate {
            gender: gender_label.to_string(),
            role: role_label.to_string(),
            experience,
            features,
            predicted_salary,
            gender_adjusted_salary,
            pay_gap,
        })
    }
}

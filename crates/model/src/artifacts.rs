//! On-disk model artifact store
//!
//! A model directory holds three JSON files: the regression parameters and
//! one class list per categorical feature.

use crate::encoder::LabelEncoder;
use crate::errors::{ModelError, Result};
use crate::params::LinearModelParams;
use crate::serialization::canonical_json_string;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Regression parameters file name
pub const PARAMS_FILE: &str = "linear_model_params.json";
/// Gender encoder file name
pub const GENDER_ENCODER_FILE: &str = "gender_encoder.json";
/// Role encoder file name
pub const ROLE_ENCODER_FILE: &str = "role_encoder.json";

/// Fitted parameters together with the encoders used to build the inputs
#[derive(Debug, Clone, PartialEq)]
pub struct ModelArtifacts {
    pub params: LinearModelParams,
    pub gender: LabelEncoder,
    pub role: LabelEncoder,
}

impl ModelArtifacts {
    pub fn new(params: LinearModelParams, gender: LabelEncoder, role: LabelEncoder) -> Self {
        Self {
            params,
            gender,
            role,
        }
    }

    /// Load and validate the artifacts stored in `dir`.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        debug!("Loading model artifacts from {}", dir.display());

        let artifacts = Self {
            params: read_json(&dir.join(PARAMS_FILE))?,
            gender: read_json(&dir.join(GENDER_ENCODER_FILE))?,
            role: read_json(&dir.join(ROLE_ENCODER_FILE))?,
        };
        artifacts.validate()?;

        info!(
            "Loaded model from {} ({} genders, {} roles)",
            dir.display(),
            artifacts.gender.len(),
            artifacts.role.len()
        );

        Ok(artifacts)
    }

    /// Write the artifacts into `dir`, creating it if needed.
    ///
    /// Returns the written file paths.
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        self.validate()?;
        fs::create_dir_all(dir).map_err(|e| ModelError::io(dir, e))?;

        let files = [
            (dir.join(PARAMS_FILE), canonical_json_string(&self.params)?),
            (dir.join(GENDER_ENCODER_FILE), canonical_json_string(&self.gender)?),
            (dir.join(ROLE_ENCODER_FILE), canonical_json_string(&self.role)?),
        ];

        let mut written = Vec::with_capacity(files.len());
        for (path, contents) in files {
            fs::write(&path, contents).map_err(|e| ModelError::io(&path, e))?;
            debug!("Wrote {}", path.display());
            written.push(path);
        }

        Ok(written)
    }

    /// Validate parameters and encoders
    pub fn validate(&self) -> Result<()> {
        self.params.validate()?;

        self.gender
            .check()
            .map_err(|reason| ModelError::InvalidEncoder {
                feature: "gender".to_string(),
                reason,
            })?;
        self.role
            .check()
            .map_err(|reason| ModelError::InvalidEncoder {
                feature: "role".to_string(),
                reason,
            })?;

        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| ModelError::io(path, e))?;
    Ok(serde_json::from_str(&content)?)
}

//! Reference market salaries
//!
//! Loaded once from a CSV export of a public salary survey. Only the job
//! title, residence and USD salary columns are used.

use crate::encoder::normalize_label;
use crate::errors::{ModelError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Currency of [`SalaryRecord::salary_in_usd`]
pub const REFERENCE_CURRENCY: &str = "USD";

/// Columns that must be present in the CSV header
pub const REQUIRED_COLUMNS: [&str; 3] = ["job_title", "employee_residence", "salary_in_usd"];

/// One reference salary row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRecord {
    pub job_title: String,
    pub employee_residence: String,
    pub salary_in_usd: f64,
}

/// A row picked by [`ReferenceDataset::sample`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample<'a> {
    pub record: &'a SalaryRecord,
    /// Whether the row matched the requested role and location
    pub matched: bool,
}

/// Immutable in-memory reference dataset
#[derive(Debug, Clone)]
pub struct ReferenceDataset {
    records: Vec<SalaryRecord>,
}

impl ReferenceDataset {
    /// Load from a CSV file with a header row
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ModelError::io(path, e))?;
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(file);

        let headers = reader.headers()?.clone();
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|col| !headers.iter().any(|h| h == *col))
            .collect();
        if !missing.is_empty() {
            return Err(ModelError::Dataset(format!(
                "{} is missing required columns: {}",
                path.display(),
                missing.join(", ")
            )));
        }

        let mut records = Vec::new();
        for row in reader.deserialize() {
            let record: SalaryRecord = row?;
            records.push(record);
        }

        let dataset = Self::from_records(records)?;
        info!(
            "Loaded {} reference salary rows from {}",
            dataset.len(),
            path.display()
        );
        Ok(dataset)
    }

    /// Build from records already in memory
    pub fn from_records(records: Vec<SalaryRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(ModelError::Dataset(
                "reference dataset is empty".to_string(),
            ));
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[SalaryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows whose job title and residence equal `role` and `location`
    /// after lowercasing and trimming both sides.
    pub fn matching(&self, role: &str, location: &str) -> Vec<&SalaryRecord> {
        let role = normalize_label(role);
        let location = normalize_label(location);
        self.records
            .iter()
            .filter(|r| {
                normalize_label(&r.job_title) == role
                    && normalize_label(&r.employee_residence) == location
            })
            .collect()
    }

    /// Pick a matching row uniformly at random, or any row when nothing matches.
    pub fn sample<R: Rng + ?Sized>(&self, role: &str, location: &str, rng: &mut R) -> Sample<'_> {
        let matches = self.matching(role, location);
        if let Some(record) = matches.choose(rng).copied() {
            return Sample {
                record,
                matched: true,
            };
        }

        // `from_records` guarantees at least one row
        let record = self.records.choose(rng).unwrap_or(&self.records[0]);
        Sample {
            record,
            matched: false,
        }
    }
}

//! Labeled training data loading
//!
//! Reads a CSV with a header row containing `experience`, `role`, `gender`
//! and `salary`. Extra columns are ignored.

use crate::errors::TrainerError;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;

/// Columns that must be present in the training CSV
pub const REQUIRED_COLUMNS: [&str; 4] = ["experience", "role", "gender", "salary"];

/// One labeled employee row
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TrainingRow {
    pub experience: f64,
    pub role: String,
    pub gender: String,
    pub salary: f64,
}

/// Summary numbers reported before training
#[derive(Clone, Debug, PartialEq)]
pub struct DatasetStats {
    pub rows: usize,
    pub roles: usize,
    pub genders: usize,
    pub salary_min: f64,
    pub salary_mean: f64,
    pub salary_max: f64,
}

/// Training dataset held fully in memory
#[derive(Clone, Debug)]
pub struct Dataset {
    pub rows: Vec<TrainingRow>,
}

impl Dataset {
    /// Load dataset from CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self, TrainerError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            TrainerError::Dataset(format!("failed to open {}: {e}", path.display()))
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(file);

        let headers = reader
            .headers()
            .map_err(|e| TrainerError::Dataset(format!("failed to read header: {e}")))?
            .clone();
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|col| !headers.iter().any(|h| h == *col))
            .collect();
        if !missing.is_empty() {
            return Err(TrainerError::Dataset(format!(
                "missing required columns: {}",
                missing.join(", ")
            )));
        }

        let mut rows = Vec::new();
        for (idx, row) in reader.deserialize::<TrainingRow>().enumerate() {
            // Header is line 1
            let row = row.map_err(|e| TrainerError::Dataset(format!("line {}: {e}", idx + 2)))?;
            rows.push(row);
        }

        Self::from_rows(rows)
    }

    /// Build from rows already in memory, rejecting empty or non-finite data
    pub fn from_rows(rows: Vec<TrainingRow>) -> Result<Self, TrainerError> {
        if rows.is_empty() {
            return Err(TrainerError::Dataset("dataset is empty".to_string()));
        }

        for (idx, row) in rows.iter().enumerate() {
            if !row.experience.is_finite() || !row.salary.is_finite() {
                return Err(TrainerError::Dataset(format!(
                    "row {}: experience and salary must be finite",
                    idx + 1
                )));
            }
            if row.role.trim().is_empty() || row.gender.trim().is_empty() {
                return Err(TrainerError::Dataset(format!(
                    "row {}: role and gender must not be blank",
                    idx + 1
                )));
            }
        }

        Ok(Self { rows })
    }

    /// Get number of samples
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if dataset is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn salaries(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.salary).collect()
    }

    pub fn stats(&self) -> DatasetStats {
        let roles: BTreeSet<&str> = self.rows.iter().map(|r| r.role.as_str()).collect();
        let genders: BTreeSet<&str> = self.rows.iter().map(|r| r.gender.as_str()).collect();

        let salaries = self.salaries();
        let salary_min = salaries.iter().copied().fold(f64::INFINITY, f64::min);
        let salary_max = salaries.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let salary_mean = salaries.iter().sum::<f64>() / salaries.len() as f64;

        DatasetStats {
            rows: self.rows.len(),
            roles: roles.len(),
            genders: genders.len(),
            salary_min,
            salary_mean,
            salary_max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_csv() {
        let file = write_csv(&[
            "experience,role,gender,salary",
            "1,Data Analyst,Female,40000",
            "5,Data Scientist,Male,90000",
            "3, Data Scientist ,Female,70000",
        ]);
        let dataset = Dataset::from_csv(file.path()).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.rows[2].role, "Data Scientist");
        assert_eq!(dataset.rows[1].experience, 5.0);
    }

    #[test]
    fn test_column_order_and_extra_columns() {
        let file = write_csv(&[
            "id,salary,gender,role,experience",
            "1,40000,Female,Data Analyst,2",
        ]);
        let dataset = Dataset::from_csv(file.path()).unwrap();
        assert_eq!(dataset.rows[0].salary, 40000.0);
        assert_eq!(dataset.rows[0].experience, 2.0);
    }

    #[test]
    fn test_missing_columns() {
        let file = write_csv(&["experience,role,salary", "1,Data Analyst,40000"]);
        let err = Dataset::from_csv(file.path()).unwrap_err();
        assert!(err.to_string().contains("gender"));
    }

    #[test]
    fn test_bad_value_reports_line() {
        let file = write_csv(&[
            "experience,role,gender,salary",
            "1,Data Analyst,Female,40000",
            "x,Data Analyst,Female,40000",
        ]);
        let err = Dataset::from_csv(file.path()).unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_empty_dataset() {
        let file = write_csv(&["experience,role,gender,salary"]);
        assert!(Dataset::from_csv(file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(Dataset::from_csv("/nonexistent/salaries.csv").is_err());
    }

    #[test]
    fn test_stats() {
        let dataset = Dataset::from_rows(vec![
            TrainingRow {
                experience: 1.0,
                role: "A".into(),
                gender: "Female".into(),
                salary: 10.0,
            },
            TrainingRow {
                experience: 2.0,
                role: "B".into(),
                gender: "Male".into(),
                salary: 30.0,
            },
            TrainingRow {
                experience: 3.0,
                role: "A".into(),
                gender: "Male".into(),
                salary: 20.0,
            },
        ])
        .unwrap();

        let stats = dataset.stats();
        assert_eq!(stats.rows, 3);
        assert_eq!(stats.roles, 2);
        assert_eq!(stats.genders, 2);
        assert_eq!(stats.salary_min, 10.0);
        assert_eq!(stats.salary_max, 30.0);
        assert_eq!(stats.salary_mean, 20.0);
    }
}

#![allow(dead_code)]

use fixthegap_model::{
    LabelEncoder, LinearModelParams, ModelArtifacts, ReferenceDataset, SalaryRecord,
};
use fixthegap_service::{MarketDataResolver, MarketLookup, PredictionService};
use std::sync::Arc;

/// salary = 30000 + 1000 * experience + 500 * role + 2000 * gender
pub fn artifacts() -> ModelArtifacts {
    ModelArtifacts::new(
        LinearModelParams::new(vec![1000.0, 500.0, 2000.0], 30000.0),
        LabelEncoder::fit(["Male", "Female"]),
        LabelEncoder::fit(["Data Scientist", "Data Analyst"]),
    )
}

pub fn reference() -> Arc<ReferenceDataset> {
    let record = |title: &str, residence: &str, salary: f64| SalaryRecord {
        job_title: title.to_string(),
        employee_residence: residence.to_string(),
        salary_in_usd: salary,
    };
    Arc::new(
        ReferenceDataset::from_records(vec![
            record("Data Scientist", "India", 30000.0),
            record("Data Analyst", "India", 12000.0),
            record("Data Scientist", "US", 150000.0),
        ])
        .unwrap(),
    )
}

pub fn fallback_service() -> PredictionService {
    PredictionService::new(
        Arc::new(artifacts()),
        MarketDataResolver::fallback_only(reference()),
    )
}

pub fn service_with(live: Arc<dyn MarketLookup>) -> PredictionService {
    PredictionService::new(
        Arc::new(artifacts()),
        MarketDataResolver::new(Some(live), reference()),
    )
}

//! Startup loading from the model directory and reference CSV on disk.

mod common;

use common::artifacts;
use fixthegap_service::{MarketConfig, PredictQuery, PredictionService, ServiceConfig};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_reference(path: &Path) {
    fs::write(
        path,
        "work_year,job_title,salary_in_usd,employee_residence\n\
         2023,Data Scientist,30000,India\n\
         2023,Data Analyst,12000,India\n",
    )
    .unwrap();
}

fn config_in(dir: &TempDir) -> ServiceConfig {
    ServiceConfig {
        model_dir: dir.path().join("models"),
        reference_data: dir.path().join("ds_salaries.csv"),
        market: MarketConfig {
            enabled: false,
            ..MarketConfig::default()
        },
        ..ServiceConfig::default()
    }
}

#[tokio::test]
async fn test_from_config_loads_artifacts_and_reference() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    artifacts().save(&config.model_dir).unwrap();
    write_reference(&config.reference_data);

    let service = PredictionService::from_config(&config).unwrap();
    assert_eq!(service.model(), &artifacts());

    let health = service.health();
    assert_eq!(health.reference_rows, 2);
    assert!(!health.market_lookup_enabled);

    let response = service
        .predict(&PredictQuery {
            gender: "Male".to_string(),
            role: "Data Analyst".to_string(),
            experience: 1.0,
            location: None,
        })
        .await
        .unwrap();
    assert_eq!(response.market_data.average_salary, 12000.0);
}

#[test]
fn test_missing_model_dir_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    write_reference(&config.reference_data);

    let err = PredictionService::from_config(&config).err().unwrap();
    assert!(!err.is_validation());
    assert!(err.to_string().contains("models"));
}

#[test]
fn test_missing_reference_columns_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    artifacts().save(&config.model_dir).unwrap();
    fs::write(&config.reference_data, "job_title,salary\nData Scientist,1\n").unwrap();

    let err = PredictionService::from_config(&config).err().unwrap();
    assert!(err.to_string().contains("employee_residence"));
}

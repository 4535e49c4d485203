//! Service type definitions

use fixthegap_model::{SalaryRecord, REFERENCE_CURRENCY};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Location assumed when a request does not name one
pub const DEFAULT_LOCATION: &str = "India";

/// Provenance tag for live lookup results
pub const LIVE_SOURCE: &str = "Tavily API";

/// Provenance tag for reference dataset results
pub const FALLBACK_SOURCE: &str = "Kaggle Dataset";

/// Chart labels, in `ChartData::values` order
pub const CHART_LABELS: [&str; 3] = ["Predicted", "Gender Adjusted", "Market Average"];

/// Service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Directory with the trained model artifacts
    pub model_dir: PathBuf,
    /// Reference salary CSV used by the market fallback
    pub reference_data: PathBuf,
    /// Market lookup configuration
    pub market: MarketConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            model_dir: PathBuf::from("models"),
            reference_data: PathBuf::from("data/ds_salaries.csv"),
            market: MarketConfig::default(),
        }
    }
}

/// Live market lookup configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Turn the live lookup off entirely
    pub enabled: bool,
    /// Lookup endpoint; `None` disables the live lookup
    pub api_endpoint: Option<String>,
    /// API key; loaded from secrets, never from config files
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_endpoint: None,
            api_key: None,
            timeout_seconds: 5,
        }
    }
}

impl MarketConfig {
    /// Whether a live lookup will be attempted
    pub fn live_lookup_enabled(&self) -> bool {
        self.enabled && self.api_endpoint.is_some() && self.api_key.is_some()
    }
}

/// `GET /predict` query parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictQuery {
    pub gender: String,
    pub role: String,
    pub experience: f64,
    #[serde(default)]
    pub location: Option<String>,
}

impl PredictQuery {
    /// Requested location, or [`DEFAULT_LOCATION`] when missing or blank
    pub fn location(&self) -> &str {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|loc| !loc.is_empty())
            .unwrap_or(DEFAULT_LOCATION)
    }
}

/// Market salary for a role and location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
    pub job_title: String,
    pub location: String,
    pub average_salary: f64,
    pub currency: String,
    #[serde(default = "default_live_source")]
    pub source: String,
    /// Any further fields returned by the live lookup, passed through as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_live_source() -> String {
    LIVE_SOURCE.to_string()
}

impl MarketData {
    /// Market data built from a reference dataset row
    pub fn from_reference(record: &SalaryRecord) -> Self {
        Self {
            job_title: record.job_title.clone(),
            location: record.employee_residence.clone(),
            average_salary: record.salary_in_usd,
            currency: REFERENCE_CURRENCY.to_string(),
            source: FALLBACK_SOURCE.to_string(),
            extra: Map::new(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == FALLBACK_SOURCE
    }
}

/// Chart-ready series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartData {
    pub fn new(predicted: f64, adjusted: f64, market_average: f64) -> Self {
        Self {
            labels: CHART_LABELS.iter().map(|l| l.to_string()).collect(),
            values: vec![predicted, adjusted, market_average],
        }
    }
}

/// `GET /predict` success payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub gender: String,
    pub role: String,
    pub experience: f64,
    pub location: String,
    pub predicted_salary: f64,
    pub gender_adjusted_salary: f64,
    pub pay_gap: f64,
    /// Serialized under the name the frontend reads
    #[serde(rename = "tavily_data")]
    pub market_data: MarketData,
    pub chart_data: ChartData,
}

/// Error payload: `{"error": ...}` plus allowed values for unknown labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<String>>,
}

/// `GET /health` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub version: String,
    pub model_features: Vec<String>,
    pub reference_rows: usize,
    pub market_lookup_enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_location_defaults() {
        let mut query = PredictQuery {
            gender: "Male".into(),
            role: "Data Scientist".into(),
            experience: 5.0,
            location: None,
        };
        assert_eq!(query.location(), "India");

        query.location = Some("   ".into());
        assert_eq!(query.location(), "India");

        query.location = Some(" US ".into());
        assert_eq!(query.location(), "US");
    }

    #[test]
    fn test_live_payload_passthrough() {
        let payload = json!({
            "job_title": "Data Scientist",
            "location": "India",
            "average_salary": 1850000.0,
            "currency": "INR",
            "sample_size": 42
        });

        let data: MarketData = serde_json::from_value(payload).unwrap();
        assert_eq!(data.source, LIVE_SOURCE);
        assert!(!data.is_fallback());
        assert_eq!(data.extra.get("sample_size"), Some(&json!(42)));

        let back = serde_json::to_value(&data).unwrap();
        assert_eq!(back["sample_size"], json!(42));
        assert_eq!(back["source"], json!(LIVE_SOURCE));
    }

    #[test]
    fn test_malformed_payload_rejected() {
        let payload = json!({ "job_title": "Data Scientist", "average_salary": "lots" });
        assert!(serde_json::from_value::<MarketData>(payload).is_err());
    }

    #[test]
    fn test_response_field_names() {
        let response = PredictionResponse {
            gender: "Male".into(),
            role: "Data Scientist".into(),
            experience: 5.0,
            location: "India".into(),
            predicted_salary: 100.0,
            gender_adjusted_salary: 100.0,
            pay_gap: 0.0,
            market_data: MarketData::from_reference(&SalaryRecord {
                job_title: "Data Scientist".into(),
                employee_residence: "India".into(),
                salary_in_usd: 30000.0,
            }),
            chart_data: ChartData::new(100.0, 100.0, 30000.0),
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["tavily_data"]["source"], json!("Kaggle Dataset"));
        assert_eq!(value["tavily_data"]["currency"], json!("USD"));
        assert_eq!(
            value["chart_data"]["labels"],
            json!(["Predicted", "Gender Adjusted", "Market Average"])
        );
        assert_eq!(value["chart_data"]["values"], json!([100.0, 100.0, 30000.0]));
    }

    #[test]
    fn test_error_response_omits_empty_allowed_values() {
        let value = serde_json::to_value(ErrorResponse {
            error: "boom".into(),
            allowed_values: None,
        })
        .unwrap();
        assert_eq!(value, json!({ "error": "boom" }));
    }
}

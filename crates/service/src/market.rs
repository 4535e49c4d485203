//! Market salary lookup with reference dataset fallback

use crate::errors::ServiceError;
use crate::types::{MarketConfig, MarketData};
use async_trait::async_trait;
use fixthegap_model::ReferenceDataset;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Source of live market salary data
#[async_trait]
pub trait MarketLookup: Send + Sync {
    async fn lookup(&self, role: &str, location: &str) -> Result<MarketData, ServiceError>;
}

/// Market lookup over HTTP
pub struct HttpMarketLookup {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpMarketLookup {
    /// Create a client with the configured request timeout
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    /// Build from config; `None` when the live lookup is disabled
    pub fn from_config(config: &MarketConfig) -> Result<Option<Self>, ServiceError> {
        if !config.live_lookup_enabled() {
            return Ok(None);
        }

        match (&config.api_endpoint, &config.api_key) {
            (Some(endpoint), Some(api_key)) => Ok(Some(Self::new(
                endpoint.clone(),
                api_key.clone(),
                Duration::from_secs(config.timeout_seconds),
            )?)),
            _ => Ok(None),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl MarketLookup for HttpMarketLookup {
    async fn lookup(&self, role: &str, location: &str) -> Result<MarketData, ServiceError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("role", role), ("location", location)])
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ServiceError::MarketLookup(format!(
                "API request failed: {} - {}",
                status, error_text
            )));
        }

        let data: MarketData = response.json().await?;
        if !data.average_salary.is_finite() {
            return Err(ServiceError::MarketLookup(
                "average_salary is not a finite number".to_string(),
            ));
        }

        Ok(data)
    }
}

/// Resolves market data for a role and location.
///
/// The live lookup is tried once per call; any failure falls back to a
/// random reference dataset row.
#[derive(Clone)]
pub struct MarketDataResolver {
    live: Option<Arc<dyn MarketLookup>>,
    reference: Arc<ReferenceDataset>,
}

impl MarketDataResolver {
    pub fn new(live: Option<Arc<dyn MarketLookup>>, reference: Arc<ReferenceDataset>) -> Self {
        Self { live, reference }
    }

    /// Resolver that only ever uses the reference dataset
    pub fn fallback_only(reference: Arc<ReferenceDataset>) -> Self {
        Self::new(None, reference)
    }

    /// Build from config, logging whether the live lookup is active
    pub fn from_config(
        config: &MarketConfig,
        reference: Arc<ReferenceDataset>,
    ) -> Result<Self, ServiceError> {
        let live = HttpMarketLookup::from_config(config)?;
        match &live {
            Some(lookup) => info!("Live market lookup enabled: {}", lookup.endpoint()),
            None if !config.enabled => info!("Live market lookup disabled by configuration"),
            None if config.api_endpoint.is_none() => {
                warn!("No market API endpoint configured; using reference dataset only")
            }
            None => warn!("No market API key configured; using reference dataset only"),
        }

        Ok(Self::new(
            live.map(|lookup| Arc::new(lookup) as Arc<dyn MarketLookup>),
            reference,
        ))
    }

    pub fn live_lookup_enabled(&self) -> bool {
        self.live.is_some()
    }

    pub fn reference(&self) -> &ReferenceDataset {
        &self.reference
    }

    /// Market data for `role` in `location`. Never fails.
    pub async fn resolve(&self, role: &str, location: &str) -> MarketData {
        if let Some(live) = &self.live {
            match live.lookup(role, location).await {
                Ok(data) => {
                    debug!("Live market data for {} in {}", role, location);
                    return data;
                }
                Err(e) => warn!("Market lookup failed, using reference data: {}", e),
            }
        }

        self.fallback(role, location)
    }

    /// Random reference row for `role` in `location`, or any row when none match
    pub fn fallback(&self, role: &str, location: &str) -> MarketData {
        let mut rng = rand::thread_rng();
        let sample = self.reference.sample(role, location, &mut rng);
        if !sample.matched {
            debug!(
                "No reference rows for {} in {}; sampled from full dataset",
                role, location
            );
        }
        MarketData::from_reference(sample.record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FALLBACK_SOURCE;
    use fixthegap_model::SalaryRecord;

    struct FailingLookup;

    #[async_trait]
    impl MarketLookup for FailingLookup {
        async fn lookup(&self, _role: &str, _location: &str) -> Result<MarketData, ServiceError> {
            Err(ServiceError::Timeout)
        }
    }

    fn reference() -> Arc<ReferenceDataset> {
        let record = |title: &str, residence: &str, salary: f64| SalaryRecord {
            job_title: title.to_string(),
            employee_residence: residence.to_string(),
            salary_in_usd: salary,
        };
        Arc::new(
            ReferenceDataset::from_records(vec![
                record("Data Scientist", "IN", 30000.0),
                record("Data Scientist", "US", 150000.0),
                record("Data Engineer", "US", 140000.0),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_fallback_prefers_matching_rows() {
        let resolver = MarketDataResolver::fallback_only(reference());
        for _ in 0..20 {
            let data = resolver.fallback(" data scientist ", "us");
            assert_eq!(data.average_salary, 150000.0);
            assert_eq!(data.source, FALLBACK_SOURCE);
            assert_eq!(data.currency, "USD");
        }
    }

    #[test]
    fn test_fallback_without_match_uses_any_row() {
        let resolver = MarketDataResolver::fallback_only(reference());
        let data = resolver.fallback("Astronaut", "India");
        assert!([30000.0, 150000.0, 140000.0].contains(&data.average_salary));
        assert!(data.is_fallback());
    }

    #[tokio::test]
    async fn test_failed_lookup_falls_back() {
        let resolver = MarketDataResolver::new(Some(Arc::new(FailingLookup)), reference());
        assert!(resolver.live_lookup_enabled());

        let data = resolver.resolve("Data Engineer", "US").await;
        assert_eq!(data.source, FALLBACK_SOURCE);
        assert_eq!(data.average_salary, 140000.0);
    }

    #[test]
    fn test_no_key_disables_live_lookup() {
        let config = MarketConfig {
            api_endpoint: Some("http://127.0.0.1:1/salary".to_string()),
            ..MarketConfig::default()
        };
        let resolver = MarketDataResolver::from_config(&config, reference()).unwrap();
        assert!(!resolver.live_lookup_enabled());
    }
}

//! Prediction service

use crate::errors::ServiceError;
use crate::market::MarketDataResolver;
use crate::types::{ChartData, HealthReport, PredictQuery, PredictionResponse, ServiceConfig};
use fixthegap_model::{ModelArtifacts, ReferenceDataset};
use std::sync::Arc;
use tracing::debug;

/// Salary prediction service.
///
/// Holds the model and reference data loaded at startup; shared read-only
/// across request handlers.
#[derive(Clone)]
pub struct PredictionService {
    model: Arc<ModelArtifacts>,
    resolver: MarketDataResolver,
}

impl PredictionService {
    pub fn new(model: Arc<ModelArtifacts>, resolver: MarketDataResolver) -> Self {
        Self { model, resolver }
    }

    /// Load artifacts and reference data named by `config`
    pub fn from_config(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let model = ModelArtifacts::load(&config.model_dir)?;
        let reference = ReferenceDataset::from_csv(&config.reference_data)?;

        let resolver = MarketDataResolver::from_config(&config.market, Arc::new(reference))?;
        Ok(Self::new(Arc::new(model), resolver))
    }

    pub fn model(&self) -> &ModelArtifacts {
        &self.model
    }

    pub fn resolver(&self) -> &MarketDataResolver {
        &self.resolver
    }

    /// Predict a salary and compare it with market data
    pub async fn predict(&self, query: &PredictQuery) -> Result<PredictionResponse, ServiceError> {
        let estimate = self
            .model
            .estimate(&query.gender, &query.role, query.experience)?;
        let location = query.location();

        debug!(
            "Prediction for {} / {} / {}: {}",
            estimate.gender, estimate.role, estimate.experience, estimate.predicted_salary
        );

        // The lookup uses the role as the caller typed it
        let market_data = self.resolver.resolve(query.role.trim(), location).await;
        let chart_data = ChartData::new(
            estimate.predicted_salary,
            estimate.gender_adjusted_salary,
            market_data.average_salary,
        );

        Ok(PredictionResponse {
            gender: estimate.gender,
            role: estimate.role,
            experience: estimate.experience,
            location: location.to_string(),
            predicted_salary: estimate.predicted_salary,
            gender_adjusted_salary: estimate.gender_adjusted_salary,
            pay_gap: estimate.pay_gap,
            market_data,
            chart_data,
        })
    }

    pub fn health(&self) -> HealthReport {
        HealthReport {
            status: "ok".to_string(),
            version: crate::VERSION.to_string(),
            model_features: self.model.params.features.clone(),
            reference_rows: self.resolver.reference().len(),
            market_lookup_enabled: self.resolver.live_lookup_enabled(),
        }
    }
}

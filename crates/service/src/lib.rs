//! FixTheGap prediction service
//!
//! Serves salary predictions from the trained linear model and compares them
//! with market salary data:
//! - `config`: environment-aware configuration and secrets
//! - `market`: live market lookup with reference dataset fallback
//! - `service`: the prediction flow
//! - `routes`: warp HTTP routes

pub mod config;
pub mod errors;
pub mod market;
pub mod routes;
pub mod service;
pub mod types;

pub use config::{ConfigManager, Environment};
pub use errors::ServiceError;
pub use market::{HttpMarketLookup, MarketDataResolver, MarketLookup};
pub use routes::routes;
pub use service::PredictionService;
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

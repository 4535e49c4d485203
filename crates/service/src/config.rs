//! Configuration management
//!
//! Resolution order: `config/<environment>.toml` (or built-in defaults when
//! absent), then environment variable overrides, then secrets.

use crate::{MarketConfig, ServiceConfig, ServiceError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Prefix for secrets passed as environment variables
const SECRET_ENV_PREFIX: &str = "FIXTHEGAP_SECRET_";

/// Secret holding the market lookup API key
pub const MARKET_API_KEY_SECRET: &str = "tavily_api_key";

/// Configuration manager
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: ServiceConfig,
    environment: Environment,
    secrets: HashMap<String, String>,
}

/// Environment type
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Staging,
    Production,
    Testing,
}

impl Environment {
    /// Parse an environment name
    pub fn parse(value: &str) -> Result<Self, ServiceError> {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "staging" | "stage" => Ok(Environment::Staging),
            "testing" | "test" => Ok(Environment::Testing),
            "development" | "dev" => Ok(Environment::Development),
            other => Err(ServiceError::ConfigError(format!(
                "Unknown environment: {other}"
            ))),
        }
    }

    /// Config file path for this environment
    pub fn config_path(&self) -> &'static str {
        match self {
            Environment::Production => "config/production.toml",
            Environment::Staging => "config/staging.toml",
            Environment::Testing => "config/testing.toml",
            Environment::Development => "config/development.toml",
        }
    }

    /// Secrets file path for this environment
    pub fn secrets_path(&self) -> &'static str {
        match self {
            Environment::Production => "/run/secrets/fixthegap-secrets",
            Environment::Staging => "secrets/staging.env",
            Environment::Testing => "secrets/testing.env",
            Environment::Development => ".env",
        }
    }
}

impl ConfigManager {
    /// Build the configuration from files and the process environment
    pub fn new() -> Result<Self, ServiceError> {
        let environment = Self::detect_environment()?;
        let mut config = Self::load_config(&environment)?;
        let mut secrets = Self::load_secrets(&environment)?;

        Self::apply_env_overrides(&mut config)?;
        Self::apply_secret_overrides(&mut config, &mut secrets);

        Ok(Self {
            config,
            environment,
            secrets,
        })
    }

    /// Build from already resolved parts
    pub fn from_parts(
        config: ServiceConfig,
        environment: Environment,
        secrets: HashMap<String, String>,
    ) -> Self {
        let mut config = config;
        let mut secrets = secrets;
        Self::apply_secret_overrides_with(&mut config, &mut secrets, |_| None);
        Self {
            config,
            environment,
            secrets,
        }
    }

    pub fn get_config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn get_environment(&self) -> &Environment {
        &self.environment
    }

    pub fn get_secret(&self, key: &str) -> Option<&String> {
        self.secrets.get(key)
    }

    fn detect_environment() -> Result<Environment, ServiceError> {
        let env_str = env::var("FIXTHEGAP_ENV")
            .or_else(|_| env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "development".to_string());

        Environment::parse(&env_str)
    }

    fn load_config(environment: &Environment) -> Result<ServiceConfig, ServiceError> {
        let config_path = environment.config_path();

        if Path::new(config_path).exists() {
            debug!("Loading configuration from {}", config_path);
            Self::load_config_from_file(config_path)
        } else {
            debug!("{} not found, using defaults", config_path);
            Ok(ServiceConfig::default())
        }
    }

    /// Load configuration from a TOML file
    pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> Result<ServiceConfig, ServiceError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ServiceError::Io(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        Self::parse_config(&content)
    }

    /// Parse TOML configuration text
    pub fn parse_config(content: &str) -> Result<ServiceConfig, ServiceError> {
        let config: ConfigFile = toml::from_str(content).map_err(|e| {
            ServiceError::SerializationError(format!("Failed to parse config file: {e}"))
        })?;

        Ok(config.into())
    }

    /// Load secrets from `FIXTHEGAP_SECRET_*` variables and the secrets file
    fn load_secrets(environment: &Environment) -> Result<HashMap<String, String>, ServiceError> {
        let mut secrets = HashMap::new();

        for (key, value) in env::vars() {
            if let Some(secret_key) = key.strip_prefix(SECRET_ENV_PREFIX) {
                secrets.insert(secret_key.to_lowercase(), value);
            }
        }

        let secret_file = environment.secrets_path();
        if Path::new(secret_file).exists() {
            let content = fs::read_to_string(secret_file)
                .map_err(|e| ServiceError::Io(format!("Failed to read secrets file: {e}")))?;
            for (key, value) in Self::parse_secrets(&content) {
                secrets.entry(key).or_insert(value);
            }
        }

        Ok(secrets)
    }

    /// Parse `KEY=value` lines; blank lines and `#` comments are skipped.
    pub fn parse_secrets(content: &str) -> HashMap<String, String> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| {
                let value = value.trim().trim_matches('"').trim_matches('\'');
                (key.trim().to_lowercase(), value.to_string())
            })
            .collect()
    }

    fn apply_env_overrides(config: &mut ServiceConfig) -> Result<(), ServiceError> {
        Self::apply_overrides_with(config, |key| env::var(key).ok())
    }

    /// Apply overrides from any key/value source
    pub fn apply_overrides_with<F>(config: &mut ServiceConfig, lookup: F) -> Result<(), ServiceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(value) = get("FIXTHEGAP_HOST") {
            config.host = value;
        }

        if let Some(value) = get("FIXTHEGAP_PORT").or_else(|| get("PORT")) {
            config.port = value.parse().map_err(|_| {
                ServiceError::ConfigError(format!("Invalid port: {value}"))
            })?;
        }

        if let Some(value) = get("FIXTHEGAP_MODEL_DIR") {
            config.model_dir = PathBuf::from(value);
        }

        if let Some(value) = get("FIXTHEGAP_REFERENCE_DATA") {
            config.reference_data = PathBuf::from(value);
        }

        if let Some(value) = get("MARKET_LOOKUP_ENABLED") {
            match Self::parse_bool(&value) {
                Some(parsed) => config.market.enabled = parsed,
                None => warn!("Ignoring invalid MARKET_LOOKUP_ENABLED value: {}", value),
            }
        }

        if let Some(value) = get("MARKET_API_ENDPOINT") {
            config.market.api_endpoint = Some(value);
        }

        if let Some(value) = get("MARKET_TIMEOUT_SECS") {
            match value.parse::<u64>() {
                Ok(parsed) if parsed > 0 => config.market.timeout_seconds = parsed,
                _ => warn!("Ignoring invalid MARKET_TIMEOUT_SECS value: {}", value),
            }
        }

        Ok(())
    }

    fn apply_secret_overrides(config: &mut ServiceConfig, secrets: &mut HashMap<String, String>) {
        Self::apply_secret_overrides_with(config, secrets, |key| env::var(key).ok());
    }

    fn apply_secret_overrides_with<F>(
        config: &mut ServiceConfig,
        secrets: &mut HashMap<String, String>,
        lookup: F,
    ) where
        F: Fn(&str) -> Option<String>,
    {
        let env_api_key = lookup("TAVILY_API_KEY")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let secret_api_key = secrets
            .get(MARKET_API_KEY_SECRET)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        if let Some(api_key) = env_api_key.or(secret_api_key) {
            config.market.api_key = Some(api_key.clone());
            secrets.insert(MARKET_API_KEY_SECRET.to_string(), api_key);
        } else {
            config.market.api_key = None;
        }
    }

    fn parse_bool(value: &str) -> Option<bool> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("true")
            || value.eq_ignore_ascii_case("yes")
            || value.eq_ignore_ascii_case("y")
            || value == "1"
        {
            Some(true)
        } else if value.eq_ignore_ascii_case("false")
            || value.eq_ignore_ascii_case("no")
            || value.eq_ignore_ascii_case("n")
            || value == "0"
        {
            Some(false)
        } else {
            None
        }
    }
}

/// Configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    server: ServerSection,
    #[serde(default)]
    model: ModelSection,
    #[serde(default)]
    market: MarketSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct ServerSection {
    host: String,
    port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        let defaults = ServiceConfig::default();
        Self {
            host: defaults.host,
            port: defaults.port,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct ModelSection {
    model_dir: PathBuf,
    reference_data: PathBuf,
}

impl Default for ModelSection {
    fn default() -> Self {
        let defaults = ServiceConfig::default();
        Self {
            model_dir: defaults.model_dir,
            reference_data: defaults.reference_data,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct MarketSection {
    enabled: bool,
    api_endpoint: Option<String>,
    timeout_seconds: u64,
}

impl Default for MarketSection {
    fn default() -> Self {
        let defaults = MarketConfig::default();
        Self {
            enabled: defaults.enabled,
            api_endpoint: defaults.api_endpoint,
            timeout_seconds: defaults.timeout_seconds,
        }
    }
}

impl From<ConfigFile> for ServiceConfig {
    fn from(config: ConfigFile) -> Self {
        ServiceConfig {
            host: config.server.host,
            port: config.server.port,
            model_dir: config.model.model_dir,
            reference_data: config.model.reference_data,
            market: MarketConfig {
                enabled: config.market.enabled,
                api_endpoint: config
                    .market
                    .api_endpoint
                    .filter(|endpoint| !endpoint.trim().is_empty()),
                api_key: None, // Loaded from secrets
                timeout_seconds: config.market.timeout_seconds.max(1),
            },
        }
    }
}

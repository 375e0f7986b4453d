use crate::error::AppError;
use config::{Config as Cfg, Environment, File};
use serde::Deserialize;

/// Settings shared by every service: listener port and observability.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP collector endpoint. Trace export is disabled when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

impl Config {
    /// Load from an optional `configuration` file, then the process
    /// environment (`PORT`, `LOG_LEVEL`, `OTLP_ENDPOINT`).
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        Self::from_environment(Environment::default())
    }

    /// Layer `environment` over the optional `configuration` file. Empty
    /// variables are skipped so `PORT=` falls back to the default.
    pub fn from_environment(environment: Environment) -> Result<Self, AppError> {
        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(environment.try_parsing(true).ignore_empty(true))
            .build()?;

        let mut config: Self = config.try_deserialize()?;
        config.otlp_endpoint = config.otlp_endpoint.filter(|e| !e.is_empty());
        Ok(config)
    }
}

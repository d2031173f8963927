use config::{Config, Environment};
use serde::Deserialize;
use std::str::FromStr;
use thiserror::Error;

const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    /// One of `trace`, `debug`, `info`, `warn`, `error`.
    pub log_level: String,
    /// Emit logs as JSON lines instead of plain text.
    pub log_json: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration loading failed: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid log level {0:?}")]
    InvalidLogLevel(String),
}

impl AppConfig {
    fn validate(self) -> Result<Self, ConfigError> {
        tracing::Level::from_str(&self.log_level)
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))?;

        Ok(self)
    }
}

/// Loads the configuration: built-in defaults, overridden by `BANK_*`
/// environment variables (`BANK_LOG_LEVEL`, `BANK_LOG_JSON`).
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_from(Environment::with_prefix("BANK"))
}

fn load_from(environment: Environment) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(environment.try_parsing(true))
        .build()?;

    config.try_deserialize::<AppConfig>()?.validate()
}

/// Install the global `tracing` subscriber. `RUST_LOG` takes precedence over
/// `level` when it's set.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("bank_ledger={}", level);
    let filter_directive = std::env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    // Logs go to stderr, stdout carries the accounts.
    let builder = fmt()
        .with_env_filter(EnvFilter::new(filter_directive))
        .with_writer(std::io::stderr);
    if json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
}

//! Configuration loading from environment.

use std::env;
use std::time::Duration;

pub const DEFAULT_GATEWAY_BASE_URL: &str = "https://api.tosspayments.com/v1/payments/";

/// Application configuration.
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub gateway_base_url: String,
    pub gateway_secret_key: String,
    pub gateway_timeout: Option<Duration>,
    pub success_url: String,
    pub fail_url: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| anyhow::anyhow!("{} environment variable is required", key))
        };

        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()?;

        let gateway_timeout = match lookup("GATEWAY_TIMEOUT_SECS") {
            Some(secs) => Some(Duration::from_secs(secs.parse().map_err(|e| {
                anyhow::anyhow!("GATEWAY_TIMEOUT_SECS must be a number of seconds: {}", e)
            })?)),
            None => None,
        };

        Ok(Self {
            port,
            database_url: required("DATABASE_URL")?,
            gateway_base_url: lookup("GATEWAY_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GATEWAY_BASE_URL.to_string()),
            gateway_secret_key: required("GATEWAY_SECRET_KEY")?,
            gateway_timeout,
            success_url: required("PAYMENT_SUCCESS_URL")?,
            fail_url: required("PAYMENT_FAIL_URL")?,
        })
    }
}

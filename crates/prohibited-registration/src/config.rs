//! Configuration for the registration-attempt service.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// Service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Audit storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Slack alert configuration
    #[serde(default)]
    pub alert: AlertConfig,

    /// Topic subscription feeding the queue route
    #[serde(default)]
    pub queue: QueueConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// Postgres connection URL. Absent means audit rows are skipped.
    #[serde(default, deserialize_with = "non_empty")]
    pub connection_string: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertConfig {
    /// Slack incoming-webhook URL. Absent means alerts are skipped.
    #[serde(default, deserialize_with = "non_empty")]
    pub webhook_url: Option<String>,

    /// Timeout of the shared outbound HTTP client
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueueConfig {
    #[serde(default = "default_topic_name")]
    pub topic_name: String,

    #[serde(default = "default_subscription_name")]
    pub subscription_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default implementations
impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout: default_timeout(),
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            topic_name: default_topic_name(),
            subscription_name: default_subscription_name(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_topic_name() -> String {
    "prohibited-registered-country".into()
}

fn default_subscription_name() -> String {
    "audit".into()
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".into()
}

/// Treat blank strings the same as a missing value.
fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Nested keys use `__` as separator, e.g. `ALERT__WEBHOOK_URL`.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_source(config::Environment::default().separator("__"))
    }

    fn from_source<S>(source: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .add_source(source)
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

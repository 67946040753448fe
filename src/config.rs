// src/config.rs

//! Manages server configuration: loading, defaults, and validation.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;
use url::Url;

/// Configuration for authentication: credential files and token issuance.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AuthConfig {
    /// Path to the TOML file holding user records.
    #[serde(default = "default_users_file")]
    pub users_file: String,
    /// Path to the TOML file holding group records.
    #[serde(default = "default_groups_file")]
    pub groups_file: String,
    /// Path to a file whose contents are the token-signing secret.
    #[serde(default = "default_secret_file")]
    pub token_secret_file: String,
    /// How long an issued access token stays valid.
    #[serde(with = "humantime_serde", default = "default_token_ttl")]
    pub token_ttl: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            users_file: default_users_file(),
            groups_file: default_groups_file(),
            token_secret_file: default_secret_file(),
            token_ttl: default_token_ttl(),
        }
    }
}

fn default_users_file() -> String {
    "users.toml".to_string()
}
fn default_groups_file() -> String {
    "groups.toml".to_string()
}
fn default_secret_file() -> String {
    "token_secret".to_string()
}
fn default_token_ttl() -> Duration {
    Duration::from_secs(30 * 60)
}

/// Which resource gateway implementation serves provisioning calls.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderMode {
    /// In-process simulated provider. Development and tests only.
    #[default]
    Memory,
    /// Remote provider REST endpoint.
    Http,
}

/// Configuration for the cloud provider gateway.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProviderConfig {
    #[serde(default)]
    pub mode: ProviderMode,
    /// Base URL of the provider endpoint. Required in `http` mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<Url>,
    /// Upper bound on any single provisioning call, including the provider's
    /// wait for the resource to reach a terminal state.
    #[serde(with = "humantime_serde", default = "default_wait_timeout")]
    pub wait_timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            mode: ProviderMode::default(),
            base_url: None,
            wait_timeout: default_wait_timeout(),
        }
    }
}

fn default_wait_timeout() -> Duration {
    Duration::from_secs(120)
}

/// Configuration for the Prometheus metrics exporter.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MetricsConfig {
    /// If true, an HTTP server will be started to expose Prometheus metrics.
    #[serde(default)]
    pub enabled: bool,
    /// The port for the Prometheus metrics server.
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
        }
    }
}

fn default_metrics_port() -> u16 {
    8878
}

/// The validated server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            auth: AuthConfig::default(),
            provider: ProviderConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new `Config` instance by reading and parsing a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML from '{path}'"))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration to ensure logical consistency.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(anyhow!("port cannot be 0"));
        }
        if self.host.trim().is_empty() {
            return Err(anyhow!("host cannot be empty"));
        }
        if self.auth.token_ttl.is_zero() {
            return Err(anyhow!("auth.token_ttl cannot be 0"));
        }
        if self.provider.mode == ProviderMode::Http && self.provider.base_url.is_none() {
            return Err(anyhow!(
                "provider.base_url is required when provider.mode is 'http'"
            ));
        }
        if self.provider.wait_timeout.is_zero() {
            return Err(anyhow!("provider.wait_timeout cannot be 0"));
        }
        if self.metrics.enabled {
            if self.metrics.port == 0 {
                return Err(anyhow!("metrics.port cannot be 0"));
            }
            if self.metrics.port == self.port {
                return Err(anyhow!(
                    "metrics.port cannot be the same as the main server port"
                ));
            }
        }
        Ok(())
    }

    /// Reads the token-signing secret from the configured file.
    pub fn load_token_secret(&self) -> Result<Vec<u8>> {
        let secret = fs::read(&self.auth.token_secret_file).with_context(|| {
            format!(
                "Failed to read token secret file at '{}'",
                self.auth.token_secret_file
            )
        })?;
        let trimmed = secret.trim_ascii().to_vec();
        if trimmed.is_empty() {
            return Err(anyhow!(
                "token secret file '{}' is empty",
                self.auth.token_secret_file
            ));
        }
        Ok(trimmed)
    }
}

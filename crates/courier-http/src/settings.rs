//! Serializable settings: dispatch defaults and the reqwest client setup

use std::{collections::HashMap, path::Path, time::Duration};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::{
    config::{DispatchConfig, DispatchConfigBuilder},
    error::{HttpError, Result},
};

/// Environment prefix for [`DispatchSettings::load`]
pub const ENV_PREFIX: &str = "COURIER";

/// The plain-data part of a [`DispatchConfig`]
///
/// Hooks are code, so they are attached to the builder returned by
/// [`DispatchSettings::into_builder`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DispatchSettings {
    /// Bearer token; empty disables the Authorization header
    #[serde(default)]
    pub token: String,

    /// Timeout for GET/POST/PUT/DELETE in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Fixed delay between retries; absent disables retry
    #[serde(default)]
    pub retry_delay_ms: Option<u64>,

    /// Total attempt cap; absent retries until the caller gives up
    #[serde(default)]
    pub max_attempts: Option<u32>,

    /// Log curl reconstructions of POST/PUT requests
    #[serde(default)]
    pub create_curl: bool,

    /// Headers sent instead of the bearer token
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            token: String::new(),
            timeout_ms: default_timeout_ms(),
            retry_delay_ms: None,
            max_attempts: None,
            create_curl: false,
            headers: None,
        }
    }
}

impl DispatchSettings {
    /// Load from an optional TOML file, then `COURIER_*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    pub fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path.to_path_buf()).required(false));
        }
        builder = builder.add_source(Environment::with_prefix(env_prefix).try_parsing(true));

        let settings: Self = builder
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(|e| HttpError::Settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        let settings: Self = Config::builder()
            .add_source(File::from_str(source, config::FileFormat::Toml))
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(|e| HttpError::Settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            return Err(HttpError::Settings(
                "timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.max_attempts == Some(0) {
            return Err(HttpError::Settings(
                "max_attempts must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_delay(&self) -> Option<Duration> {
        self.retry_delay_ms.map(Duration::from_millis)
    }

    /// Seed a [`DispatchConfig`] builder with these values
    pub fn into_builder(self) -> DispatchConfigBuilder {
        let mut builder = DispatchConfig::builder(self.token.clone(), self.timeout())
            .create_curl(self.create_curl);
        if let Some(delay) = self.retry_delay() {
            builder = builder.retry_delay(delay);
        }
        if let Some(attempts) = self.max_attempts {
            builder = builder.max_attempts(attempts);
        }
        if let Some(headers) = self.headers {
            builder = builder.custom_headers(headers);
        }
        builder
    }
}

/// Configuration for the production reqwest transport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Connection timeout
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: Duration,

    /// HTTP/HTTPS proxy URL
    #[serde(default)]
    pub proxy: Option<String>,

    /// Custom user agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum redirects to follow (0 = no redirects)
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Enable connection pooling
    #[serde(default = "default_pool_enabled")]
    pub pool_enabled: bool,

    /// Pool idle timeout
    #[serde(default = "default_pool_idle_timeout")]
    pub pool_idle_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: default_connect_timeout(),
            proxy: None,
            user_agent: default_user_agent(),
            max_redirects: default_max_redirects(),
            pool_enabled: default_pool_enabled(),
            pool_idle_timeout: default_pool_idle_timeout(),
        }
    }
}

impl TransportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Short connect timeout, no pooling; suited to tests and one-shot tools
    pub fn fast() -> Self {
        Self {
            connect_timeout: Duration::from_secs(2),
            pool_enabled: false,
            ..Default::default()
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set proxy URL
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

// Default value functions for serde
fn default_timeout_ms() -> u64 {
    30_000
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_user_agent() -> String {
    format!("courier/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_redirects() -> usize {
    10
}

fn default_pool_enabled() -> bool {
    true
}

fn default_pool_idle_timeout() -> Duration {
    Duration::from_secs(90)
}

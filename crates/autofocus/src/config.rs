//! Client configuration

use crate::error::{Error, Result};
use crate::poller::PollPolicy;
use config::{constants as config_constants, create_strategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://autofocus.paloaltonetworks.com/api/v0.9";
pub const DEFAULT_PAGE_SIZE: u32 = 50;

#[derive(Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Shared secret sent as `apiKey` in every request body
    pub api_key: Option<String>,
    pub base_url: String,
    /// Number of hits requested per search page
    pub page_size: u32,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub poll: PollConfig,
}

/// How result polling waits and when it gives up
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct PollConfig {
    pub interval_ms: u64,
    pub max_attempts: Option<u32>,
    pub max_wait_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            connect_timeout_ms: 5_000,
            request_timeout_ms: 30_000,
            poll: PollConfig::default(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        let policy = PollPolicy::default();
        Self {
            interval_ms: policy.interval.as_millis() as u64,
            max_attempts: policy.max_attempts,
            max_wait_secs: policy.max_wait.map(|d| d.as_secs()),
        }
    }
}

impl PollConfig {
    pub fn policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(self.interval_ms),
            max_attempts: self.max_attempts,
            max_wait: self.max_wait_secs.map(Duration::from_secs),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("has_api_key", &self.api_key.is_some())
            .field("base_url", &self.base_url)
            .field("page_size", &self.page_size)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("poll", &self.poll)
            .finish()
    }
}

const EXAMPLE_CONFIG: &str = r#"# AutoFocus client configuration
#
# Created on first run. The AUTOFOCUS_API_KEY environment variable
# takes precedence over `api-key`.

# api-key = "your-api-key"

# base-url = "https://autofocus.paloaltonetworks.com/api/v0.9"
# page-size = 50
# connect-timeout-ms = 5000
# request-timeout-ms = 30000

[poll]
# Delay between two polls of a search cookie
# interval-ms = 250
# max-attempts = 1200
# max-wait-secs = 600
"#;

impl ClientConfig {
    pub fn load_str(config_str: &str) -> Result<ClientConfig> {
        let config: ClientConfig = toml::from_str(config_str)?;
        Ok(config)
    }

    /// Load from the platform config directory (or `AUTOFOCUS_CONFIG`),
    /// then apply the `AUTOFOCUS_API_KEY` override.
    pub fn load() -> Result<ClientConfig> {
        let strategy = create_strategy()
            .map_err(|e| Error::Config(format!("Home dir not found: {e}")))?;
        let config_path = config::client_config_path(&strategy);

        let config = Self::load_from(&config_path)?;
        Ok(config.with_api_key_override(std::env::var(config_constants::API_KEY_ENV).ok()))
    }

    /// Read the file at `config_path`, writing an example file if it is missing.
    pub fn load_from(config_path: &Path) -> Result<ClientConfig> {
        match std::fs::read_to_string(config_path) {
            Ok(user_config_str) => Self::load_str(&user_config_str),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Self::create_example_config(config_path)?;
                Self::load_str("")
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn with_api_key_override(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        self
    }

    fn create_example_config(config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(config_path, EXAMPLE_CONFIG)?;
        tracing::info!("Created example configuration at {:?}", config_path);
        Ok(())
    }
}

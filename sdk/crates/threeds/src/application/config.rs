//! Application Configuration
//!
//! Configuration for the 3DS flow. Values are read from the environment by
//! [`FlowConfig::from_env`]; anything unset keeps its default.

use std::env;
use std::time::Duration;

use kernel::error::app_error::{AppError, AppResult, ResultExt};
use kernel::error::kind::ErrorKind;
use platform::client::HttpClientConfig;

use crate::domain::value_objects::EngineLogLevel;

/// Fixed engine challenge timeout in minutes
pub const CHALLENGE_TIMEOUT_MINUTES: u32 = 5;

/// Default path segment of the configuration endpoint, relative to the authorize URL
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// 3DS flow configuration
#[derive(Debug, Clone)]
pub struct FlowConfig {
    /// Total HTTP request timeout
    pub http_timeout: Duration,
    /// HTTP connect timeout
    pub connect_timeout: Duration,
    /// User-Agent for the 3DS endpoints
    pub user_agent: String,
    /// Path segment replacing the last segment of the authorize URL to reach the config endpoint
    pub config_path: String,
    /// Extra time after the engine timeout before the adapter gives up on a silent engine
    pub challenge_grace: Duration,
    /// Vendor engine log level
    pub engine_log_level: EngineLogLevel,
    /// Locale identifier for the challenge UI, engine default when `None`
    pub locale: Option<String>,
}

impl Default for FlowConfig {
    fn default() -> Self {
        let http = HttpClientConfig::default();
        Self {
            http_timeout: http.timeout,
            connect_timeout: http.connect_timeout,
            user_agent: http.user_agent,
            config_path: DEFAULT_CONFIG_PATH.to_string(),
            challenge_grace: Duration::from_secs(30),
            engine_log_level: EngineLogLevel::default(),
            locale: None,
        }
    }
}

impl FlowConfig {
    /// Load configuration from `THREEDS_*` environment variables
    ///
    /// ## Returns
    /// * `Err(AppError)` of kind `InvalidConfiguration` if a variable is set but malformed
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(secs) = read_secs("THREEDS_HTTP_TIMEOUT_SECS")? {
            config.http_timeout = secs;
        }
        if let Some(secs) = read_secs("THREEDS_CONNECT_TIMEOUT_SECS")? {
            config.connect_timeout = secs;
        }
        if let Some(secs) = read_secs("THREEDS_CHALLENGE_GRACE_SECS")? {
            config.challenge_grace = secs;
        }
        if let Ok(path) = env::var("THREEDS_CONFIG_PATH") {
            config.config_path = path.trim().trim_matches('/').to_string();
        }
        if let Ok(level) = env::var("THREEDS_ENGINE_LOG_LEVEL") {
            config.engine_log_level = level.parse().map_app_err(
                ErrorKind::InvalidConfiguration,
                "THREEDS_ENGINE_LOG_LEVEL must be one of off, error, warn, info, debug",
            )?;
        }
        if let Ok(locale) = env::var("THREEDS_LOCALE") {
            let locale = locale.trim();
            config.locale = (!locale.is_empty()).then(|| locale.to_string());
        }

        if config.http_timeout.is_zero() {
            return Err(AppError::invalid_configuration(
                "THREEDS_HTTP_TIMEOUT_SECS must be greater than zero",
            ));
        }

        Ok(config)
    }

    /// HTTP client settings derived from this config
    pub fn http_client(&self) -> HttpClientConfig {
        HttpClientConfig {
            timeout: self.http_timeout,
            connect_timeout: self.connect_timeout,
            user_agent: self.user_agent.clone(),
        }
    }

    /// How long the adapter waits for a challenge outcome
    pub fn challenge_deadline(&self) -> Duration {
        Duration::from_secs(u64::from(CHALLENGE_TIMEOUT_MINUTES) * 60) + self.challenge_grace
    }
}

fn read_secs(key: &'static str) -> AppResult<Option<Duration>> {
    match env::var(key) {
        Ok(value) => {
            let secs = value
                .trim()
                .parse::<u64>()
                .map_app_err(ErrorKind::InvalidConfiguration, format!("{key} must be a number of seconds"))?;
            Ok(Some(Duration::from_secs(secs)))
        }
        Err(_) => Ok(None),
    }
}

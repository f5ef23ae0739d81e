use std::env;
use std::time::Duration;

use crate::dashboard::TimeRange;

#[derive(Debug, Clone)]
pub struct Config {
    // Dashboard backend
    pub dashboard_url: String,
    pub session_id: String,

    // Polling
    pub poll_interval_ms: u64,
    pub initial_time_range: TimeRange,

    // Third-party services
    pub geocoder_base_url: String,
    pub weather_base_url: String,

    // HTTP settings
    pub http_timeout_seconds: u64,
    pub http_user_agent: String,

    // Caching
    pub geocode_cache_ttl_seconds: u64,
    pub geocode_cache_max_entries: u64,

    // Logging
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if required environment variables are not set,
    /// or `ConfigError::Invalid` if a value is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let poll_interval_ms = lookup("POLL_INTERVAL_MS")
            .unwrap_or_else(|| "1000".to_string())
            .parse()
            .unwrap_or(1000);
        if poll_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "POLL_INTERVAL_MS",
                value: "0".to_string(),
            });
        }

        let range_raw = lookup("INITIAL_TIME_RANGE").unwrap_or_else(|| "week".to_string());
        let initial_time_range = range_raw.parse().map_err(|_| ConfigError::Invalid {
            key: "INITIAL_TIME_RANGE",
            value: range_raw.clone(),
        })?;

        Ok(Self {
            // Dashboard backend
            dashboard_url: lookup("DASHBOARD_URL")
                .unwrap_or_else(|| "http://localhost:8000".to_string())
                .trim_end_matches('/')
                .to_string(),
            session_id: lookup("DASHBOARD_SESSION_ID")
                .ok_or(ConfigError::Missing("DASHBOARD_SESSION_ID"))?,

            // Polling
            poll_interval_ms,
            initial_time_range,

            // Third-party services
            geocoder_base_url: lookup("GEOCODER_BASE_URL")
                .unwrap_or_else(|| "https://nominatim.openstreetmap.org".to_string())
                .trim_end_matches('/')
                .to_string(),
            weather_base_url: lookup("WEATHER_BASE_URL")
                .unwrap_or_else(|| "https://api.weather.gov".to_string())
                .trim_end_matches('/')
                .to_string(),

            // HTTP settings
            http_timeout_seconds: lookup("HTTP_TIMEOUT_SECONDS")
                .unwrap_or_else(|| "30".to_string())
                .parse()
                .unwrap_or(30),
            http_user_agent: lookup("HTTP_USER_AGENT")
                .unwrap_or_else(|| concat!("telemetry-dash/", env!("CARGO_PKG_VERSION")).to_string()),

            // Caching
            geocode_cache_ttl_seconds: lookup("GEOCODE_CACHE_TTL_SECONDS")
                .unwrap_or_else(|| "3600".to_string())
                .parse()
                .unwrap_or(3600),
            geocode_cache_max_entries: lookup("GEOCODE_CACHE_MAX_ENTRIES")
                .unwrap_or_else(|| "256".to_string())
                .parse()
                .unwrap_or(256),

            // Logging
            log_json: lookup("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json")),
        })
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

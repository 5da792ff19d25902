use std::{env, fmt::Display, str::FromStr, time::Duration};

use dotenvy::dotenv;
use tracing::warn;

use crate::dashboard::DEFAULT_FRESHNESS_WINDOW;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub api_prefix: String,
    /// How long a dashboard snapshot is served without a new request.
    pub freshness_window: Duration,
    /// `None` leaves requests running until the transport settles.
    pub request_timeout: Option<Duration>,
    pub log_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            api_prefix: "/api".to_string(),
            freshness_window: DEFAULT_FRESHNESS_WINDOW,
            request_timeout: None,
            log_dir: "logs".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();
        let defaults = Self::default();

        Self {
            api_url: env::var("HRMS_API_URL").unwrap_or(defaults.api_url),
            api_prefix: env::var("HRMS_API_PREFIX").unwrap_or(defaults.api_prefix),
            freshness_window: Duration::from_secs(parse_or(
                "HRMS_FRESHNESS_SECS",
                defaults.freshness_window.as_secs(),
            )),
            request_timeout: env::var("HRMS_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|raw| parse_value::<u64>("HRMS_REQUEST_TIMEOUT_SECS", &raw))
                .map(Duration::from_secs),
            log_dir: env::var("HRMS_LOG_DIR").unwrap_or(defaults.log_dir),
        }
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T
where
    T::Err: Display,
{
    env::var(key)
        .ok()
        .and_then(|raw| parse_value(key, &raw))
        .unwrap_or(default)
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Option<T>
where
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e| warn!("Invalid {key} value {raw:?}: {e}, using default"))
        .ok()
}

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::error::Error;
use crate::external::retry::RetryPolicy;

const DEFAULT_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_GOOGLE_MAPS_API_BASE: &str = "https://maps.googleapis.com";
const DEFAULT_VIACEP_API_BASE: &str = "https://viacep.com.br";
const DEFAULT_FEED_INTERVAL_SECS: u64 = 10;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub google_maps_api_base: String,
    pub google_maps_api_key: Option<String>,
    pub viacep_api_base: String,
    pub feed_interval: Duration,
    pub http_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            google_maps_api_base: DEFAULT_GOOGLE_MAPS_API_BASE.into(),
            google_maps_api_key: None,
            viacep_api_base: DEFAULT_VIACEP_API_BASE.into(),
            feed_interval: Duration::from_secs(DEFAULT_FEED_INTERVAL_SECS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
        }
    }
}

impl Config {
    /// Reads the process environment, after loading a `.env` file if one exists.
    #[tracing::instrument(name = "Config::from_env")]
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let addr = parse_or(&lookup, "PILOTAI_ADDR", DEFAULT_ADDR.parse().ok())?;
        let feed_interval_secs =
            parse_or(&lookup, "FEED_INTERVAL_SECS", Some(DEFAULT_FEED_INTERVAL_SECS))?;
        let http_timeout_secs =
            parse_or(&lookup, "HTTP_TIMEOUT_SECS", Some(DEFAULT_HTTP_TIMEOUT_SECS))?;
        let max_attempts = parse_or(
            &lookup,
            "HTTP_MAX_ATTEMPTS",
            Some(defaults.retry.max_attempts),
        )?;
        let backoff_ms = parse_or(
            &lookup,
            "HTTP_BACKOFF_MS",
            Some(defaults.retry.base_delay.as_millis() as u64),
        )?;

        if feed_interval_secs == 0 || max_attempts == 0 {
            tracing::error!("feed interval and attempt count must be positive");
            return Err(Error::configuration_error());
        }

        Ok(Self {
            addr,
            google_maps_api_base: lookup("GOOGLE_MAPS_API_BASE")
                .unwrap_or(defaults.google_maps_api_base),
            google_maps_api_key: lookup("GOOGLE_MAPS_API_KEY").filter(|key| !key.is_empty()),
            viacep_api_base: lookup("VIACEP_API_BASE").unwrap_or(defaults.viacep_api_base),
            feed_interval: Duration::from_secs(feed_interval_secs),
            http_timeout: Duration::from_secs(http_timeout_secs),
            retry: RetryPolicy {
                max_attempts,
                base_delay: Duration::from_millis(backoff_ms),
                ..defaults.retry
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: Option<T>) -> Result<T, Error>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            tracing::error!(key, raw = raw.as_str(), "unparseable configuration value");
            Error::configuration_error()
        }),
        None => default.ok_or_else(Error::configuration_error),
    }
}

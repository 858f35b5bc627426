//! Runtime configuration, read from environment variables.
//!
//! `BOT_TOKEN` and `GROUP_CHAT_ID` are required. Everything else falls back
//! to the defaults in [`crate::constants`].

use crate::{
    constants::{
        BINANCE_API_URL, DEFAULT_SYMBOL, INITIAL_BACKOFF_MS, MAX_BACKOFF_MS, MAX_RETRY_ATTEMPTS,
        REFRESH_INTERVAL_SECS, REQUEST_TIMEOUT_SECS,
    },
    error::ConfigError,
    ticker::RetryPolicy,
};
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub group_chat_id: i64,
    pub symbol: String,
    pub ticker_base_url: String,
    pub telegram_api_url: Option<reqwest::Url>,
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub fetch_max_attempts: u32,
    pub fetch_retry_delay_secs: u64,
}

impl Config {
    /// Loads from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads using `lookup` to resolve variable names. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bot_token = get("BOT_TOKEN").ok_or(ConfigError::Missing("BOT_TOKEN"))?;
        let group_chat_id = get("GROUP_CHAT_ID")
            .ok_or(ConfigError::Missing("GROUP_CHAT_ID"))
            .and_then(|v| parse_var("GROUP_CHAT_ID", &v))?;

        let telegram_api_url = get("TELEGRAM_API_URL")
            .map(|v| {
                reqwest::Url::parse(&v).map_err(|e| ConfigError::invalid("TELEGRAM_API_URL", v, e))
            })
            .transpose()?;

        let poll_interval_secs =
            optional_var(&get, "POLL_INTERVAL_SECS", REFRESH_INTERVAL_SECS)?;
        let request_timeout_secs =
            optional_var(&get, "REQUEST_TIMEOUT_SECS", REQUEST_TIMEOUT_SECS)?;
        let fetch_max_attempts = optional_var(&get, "FETCH_MAX_ATTEMPTS", MAX_RETRY_ATTEMPTS)?;
        let fetch_retry_delay_secs =
            optional_var(&get, "FETCH_RETRY_DELAY_SECS", INITIAL_BACKOFF_MS / 1000)?;

        require_positive("POLL_INTERVAL_SECS", poll_interval_secs)?;
        require_positive("REQUEST_TIMEOUT_SECS", request_timeout_secs)?;
        require_positive("FETCH_MAX_ATTEMPTS", fetch_max_attempts as u64)?;

        Ok(Self {
            bot_token,
            group_chat_id,
            symbol: get("TICKER_SYMBOL").unwrap_or_else(|| DEFAULT_SYMBOL.to_string()),
            ticker_base_url: get("TICKER_BASE_URL").unwrap_or_else(|| BINANCE_API_URL.to_string()),
            telegram_api_url,
            poll_interval_secs,
            request_timeout_secs,
            fetch_max_attempts,
            fetch_retry_delay_secs,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        let initial_backoff = Duration::from_secs(self.fetch_retry_delay_secs);
        RetryPolicy {
            max_attempts: self.fetch_max_attempts,
            initial_backoff,
            max_backoff: initial_backoff.max(Duration::from_millis(MAX_BACKOFF_MS)),
        }
    }
}

fn parse_var<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| ConfigError::invalid(var, raw, e))
}

fn optional_var<T, G>(get: &G, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(var) {
        Some(raw) => parse_var(var, &raw),
        None => Ok(default),
    }
}

fn require_positive(var: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::invalid(var, "0", "must be greater than zero"));
    }
    Ok(())
}

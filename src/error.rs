//! Error types for the price ticker bot

use thiserror::Error;

/// Errors raised while reading configuration from the environment
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is absent or empty
    #[error("{0} environment variable is not set")]
    Missing(&'static str),

    /// A variable is present but its value cannot be used
    #[error("Invalid {var} value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    /// Creates an Invalid error
    pub fn invalid(var: &'static str, value: impl Into<String>, reason: impl ToString) -> Self {
        Self::Invalid {
            var,
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}

/// Errors that can occur when fetching a price sample
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network request failed (connect, timeout, body read)
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Ticker endpoint answered with a non-success status
    #[error("Ticker request failed with status code: {0}")]
    BadStatus(u16),

    /// Response body or one of its numeric fields could not be decoded
    #[error("Invalid response: {0}")]
    Parse(String),
}

impl FetchError {
    /// Creates a Parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Whether another attempt could plausibly succeed.
    ///
    /// Only transport failures and 5xx answers are retried. 4xx covers bad
    /// symbols and rate limits (429/418), and a malformed body stays
    /// malformed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::BadStatus(code) => (500..=599).contains(code),
            Self::Parse(_) => false,
        }
    }
}

/// Errors raised by the messaging transport
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// sendMessage failed
    #[error("Failed to send message: {0}")]
    Send(String),

    /// deleteMessage failed
    #[error("Failed to delete message {message_id}: {reason}")]
    Delete { message_id: i32, reason: String },
}

impl PublishError {
    /// Creates a Send error
    pub fn send(reason: impl ToString) -> Self {
        Self::Send(reason.to_string())
    }

    /// Creates a Delete error
    pub fn delete(message_id: i32, reason: impl ToString) -> Self {
        Self::Delete {
            message_id,
            reason: reason.to_string(),
        }
    }
}

/// Fatal errors during startup. Any of these terminates the process.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to get initial price: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to send initial price message: {0}")]
    Publish(#[from] PublishError),
}

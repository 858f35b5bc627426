//! Constants for the price ticker bot
//!
//! Compile-time defaults. Every value here can be overridden through the
//! environment, see [`crate::config::Config`].

/// How often to poll the ticker endpoint (in seconds)
pub const REFRESH_INTERVAL_SECS: u64 = 30;

/// HTTP request timeout when fetching prices (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Maximum number of fetch attempts per tick, including the first one
pub const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Initial backoff delay between fetch attempts (in milliseconds)
pub const INITIAL_BACKOFF_MS: u64 = 5_000;

/// Maximum backoff delay between fetch attempts (in milliseconds)
pub const MAX_BACKOFF_MS: u64 = 30_000;

/// Ticker symbol polled by default
pub const DEFAULT_SYMBOL: &str = "BTCUSDT";

/// Binance REST API base URL
pub const BINANCE_API_URL: &str = "https://api.binance.com";

/// Binance endpoint for 24h rolling ticker statistics
pub const BINANCE_TICKER_24H_ENDPOINT: &str = "/api/v3/ticker/24hr";

/// Width of one marker step, in percent of 24h change
pub const MARKER_STEP_PERCENT: f64 = 2.5;

/// Upper bound on the number of markers appended to a message
pub const MAX_MARKERS: usize = 3;

/// User agent for HTTP requests
pub const USER_AGENT: &str = "price-ticker-bot/0.1.0";

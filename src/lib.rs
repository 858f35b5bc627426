//! # Price Ticker Bot
//!
//! Keeps a single "live" Telegram message in sync with a crypto price
//! ticker. Every poll interval the latest 24h ticker is fetched; when the
//! price or percent change differs from what the chat shows, a new message
//! is sent and the old one deleted.
//!
//! ## Architecture
//!
//! ```text
//! PriceTicker (interval loop, retry)
//!     ↓
//! PriceFetcher (Binance 24h ticker)
//!     ↓
//! format_price_message
//!     ↓
//! MessagePublisher (DisplayState, send-new then delete-old)
//!     ↓
//! MessageTransport (Telegram)
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use price_ticker_bot::{
//!     BinanceProvider, Config, MessagePublisher, PriceTicker, TelegramTransport,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! let fetcher = BinanceProvider::new(
//!     &config.ticker_base_url,
//!     config.symbol.clone(),
//!     config.request_timeout(),
//! )?;
//! let transport = TelegramTransport::from_token(&config.bot_token, None);
//! let publisher = MessagePublisher::new(Arc::new(transport), config.group_chat_id);
//!
//! let mut ticker = PriceTicker::new(Arc::new(fetcher), publisher)
//!     .with_poll_interval(config.poll_interval())
//!     .with_retry_policy(config.retry_policy());
//! ticker.start().await?;
//! ticker.run().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Only [`PriceTicker::start`] returns errors worth exiting over. After
//! startup, fetch and send failures are logged and the next tick tries
//! again; a failed delete of the previous message is logged and ignored.

pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod provider;
pub mod providers;
pub mod publisher;
pub mod ticker;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{ConfigError, FetchError, PublishError, StartupError};
pub use format::format_price_message;
pub use provider::PriceFetcher;
pub use providers::BinanceProvider;
pub use publisher::{MessagePublisher, PublishOutcome};
pub use ticker::{PriceTicker, RetryPolicy, TickOutcome};
pub use transport::{MessageTransport, TelegramTransport, TextFormat};
pub use types::{DisplayPhase, DisplayState, MessageHandle, PriceSample};

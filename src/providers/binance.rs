//! Binance 24h ticker provider implementation

use crate::{
    constants::{BINANCE_TICKER_24H_ENDPOINT, USER_AGENT},
    error::FetchError,
    provider::PriceFetcher,
    types::PriceSample,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Binance API response for `/api/v3/ticker/24hr`
///
/// Numeric fields arrive as decimal strings. Only the fields we use are
/// declared; the rest of the payload is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BinanceTicker {
    last_price: String,
    price_change: String,
    price_change_percent: String,
}

/// Binance price provider
pub struct BinanceProvider {
    client: Client,
    url: String,
    symbol: String,
}

impl BinanceProvider {
    /// Creates a new Binance provider
    ///
    /// # Arguments
    /// * `base_url` - API root, e.g. `https://api.binance.com`
    /// * `symbol` - Trading pair, e.g. `BTCUSDT`
    /// * `timeout` - Per-request timeout
    pub fn new(
        base_url: &str,
        symbol: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchError::Transport)?;

        let symbol = symbol.into();
        let url = Self::build_url(base_url, &symbol);

        Ok(Self {
            client,
            url,
            symbol,
        })
    }

    /// Builds the ticker URL for a symbol
    fn build_url(base_url: &str, symbol: &str) -> String {
        format!(
            "{}{}?symbol={}",
            base_url.trim_end_matches('/'),
            BINANCE_TICKER_24H_ENDPOINT,
            symbol
        )
    }

    /// Parses the Binance response into a price sample
    fn parse_response(response: BinanceTicker) -> Result<PriceSample, FetchError> {
        let price = parse_decimal("lastPrice", &response.last_price)?;
        let percent_change = parse_decimal("priceChangePercent", &response.price_change_percent)?;
        let price_change = parse_decimal("priceChange", &response.price_change)?;

        Ok(PriceSample::with_price_change(
            price,
            percent_change,
            price_change,
        ))
    }
}

fn parse_decimal(field: &str, raw: &str) -> Result<f64, FetchError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(FetchError::parse(format!(
            "{} is not a decimal: {:?}",
            field, raw
        ))),
    }
}

#[async_trait]
impl PriceFetcher for BinanceProvider {
    async fn fetch(&self) -> Result<PriceSample, FetchError> {
        tracing::debug!(url = %self.url, "Fetching ticker from Binance");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus(status.as_u16()));
        }

        let response_text = response.text().await.map_err(FetchError::Transport)?;

        let ticker: BinanceTicker = serde_json::from_str(&response_text).map_err(|e| {
            FetchError::parse(format!(
                "Failed to parse Binance response: {}. Response: {}",
                e, response_text
            ))
        })?;

        let sample = Self::parse_response(ticker)?;

        tracing::info!(
            symbol = %self.symbol,
            price = sample.price,
            percent_change = sample.percent_change_24h,
            "Price: ${:.2}",
            sample.price
        );

        Ok(sample)
    }

    fn provider_name(&self) -> &'static str {
        "binance"
    }
}

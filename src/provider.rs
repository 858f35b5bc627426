//! Provider abstraction for fetching price samples from external APIs

use crate::{error::FetchError, types::PriceSample};
use async_trait::async_trait;

/// Trait for price sources
///
/// Implementations issue a single request per call. Retrying is the
/// caller's business.
#[async_trait]
pub trait PriceFetcher: Send + Sync {
    /// Fetches the current price sample
    ///
    /// # Returns
    /// A fresh sample, or the reason the fetch failed
    async fn fetch(&self) -> Result<PriceSample, FetchError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}

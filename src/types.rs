//! Types for the price ticker bot

use chrono::{DateTime, Utc};

/// One poll of the ticker endpoint
#[derive(Debug, Clone)]
pub struct PriceSample {
    /// Last traded price in quote currency
    pub price: f64,

    /// 24h price change percentage
    pub percent_change_24h: f64,

    /// 24h absolute price change. Carried along, not displayed.
    pub price_change: f64,

    /// When the sample was fetched
    pub fetched_at: DateTime<Utc>,
}

impl PriceSample {
    /// Create a new sample stamped with the current time
    pub fn new(price: f64, percent_change_24h: f64) -> Self {
        Self::with_price_change(price, percent_change_24h, 0.0)
    }

    /// Create a new sample including the absolute 24h change
    pub fn with_price_change(price: f64, percent_change_24h: f64, price_change: f64) -> Self {
        Self {
            price,
            percent_change_24h,
            price_change,
            fetched_at: Utc::now(),
        }
    }

    /// Exact equality on price and percent change.
    ///
    /// No tolerance is applied: values that differ only by representation
    /// artifacts still count as a change.
    pub fn same_quote(&self, other: &PriceSample) -> bool {
        self.price == other.price && self.percent_change_24h == other.percent_change_24h
    }

    /// Render this sample as chat text
    pub fn render(&self) -> String {
        crate::format::format_price_message(self.price, self.percent_change_24h)
    }
}

/// Identifier the messaging transport returned for a sent message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageHandle(pub i32);

impl std::fmt::Display for MessageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle phase of the displayed message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPhase {
    /// Nothing published yet
    Uninitialized,
    /// A message is live in the chat
    Published,
}

/// The message currently shown in the chat and the sample behind it
///
/// Both fields are set together on the first successful publish and never
/// go back to `None`.
#[derive(Debug, Clone, Default)]
pub struct DisplayState {
    last_message: Option<MessageHandle>,
    last_sample: Option<PriceSample>,
}

impl DisplayState {
    /// Creates an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase
    pub fn phase(&self) -> DisplayPhase {
        match self.last_message {
            Some(_) => DisplayPhase::Published,
            None => DisplayPhase::Uninitialized,
        }
    }

    /// Handle of the live message
    pub fn last_message(&self) -> Option<MessageHandle> {
        self.last_message
    }

    /// Sample shown by the live message
    pub fn last_sample(&self) -> Option<&PriceSample> {
        self.last_sample.as_ref()
    }

    pub fn last_price(&self) -> Option<f64> {
        self.last_sample.as_ref().map(|s| s.price)
    }

    pub fn last_percent_change(&self) -> Option<f64> {
        self.last_sample.as_ref().map(|s| s.percent_change_24h)
    }

    /// True when `sample` shows the same quote as the live message
    pub fn is_unchanged(&self, sample: &PriceSample) -> bool {
        self.last_sample
            .as_ref()
            .is_some_and(|last| last.same_quote(sample))
    }

    /// Records a freshly published message, returning the one it replaces
    pub(crate) fn record(
        &mut self,
        handle: MessageHandle,
        sample: PriceSample,
    ) -> Option<MessageHandle> {
        self.last_sample = Some(sample);
        self.last_message.replace(handle)
    }
}

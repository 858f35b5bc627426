//! Chat text rendering for price samples

use crate::constants::{MARKER_STEP_PERCENT, MAX_MARKERS};

/// Decorative glyph appended to a price message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Price went up (or stayed flat)
    Rocket,
    /// Price went down
    Salt,
}

impl Marker {
    /// Picks the marker for a 24h percent change
    pub fn for_change(percent_change: f64) -> Self {
        if percent_change < 0.0 {
            Marker::Salt
        } else {
            Marker::Rocket
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Marker::Rocket => "🚀",
            Marker::Salt => "🧂",
        }
    }
}

/// Number of markers for a percent change: one per full 2.5% step, at most 3
pub fn marker_count(percent_change: f64) -> usize {
    let steps = (percent_change.abs() / MARKER_STEP_PERCENT).floor();
    // NaN saturates to 0
    (steps as usize).min(MAX_MARKERS)
}

/// Renders `"$<price> (<+/-percent>%) <markers>"`
///
/// The space before the markers is always present, even with zero markers.
///
/// # Example
/// ```
/// use price_ticker_bot::format::format_price_message;
///
/// assert_eq!(format_price_message(100.0, 5.0), "$100.00 (+5.00%) 🚀🚀");
/// assert_eq!(format_price_message(100.0, -1.0), "$100.00 (-1.00%) ");
/// ```
pub fn format_price_message(price: f64, percent_change: f64) -> String {
    let markers = Marker::for_change(percent_change)
        .glyph()
        .repeat(marker_count(percent_change));
    format!("${:.2} ({:+.2}%) {}", price, percent_change, markers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_count_thresholds() {
        assert_eq!(marker_count(0.0), 0);
        assert_eq!(marker_count(2.4), 0);
        assert_eq!(marker_count(2.5), 1);
        assert_eq!(marker_count(5.0), 2);
        assert_eq!(marker_count(7.5), 3);
        assert_eq!(marker_count(7.6), 3);
        assert_eq!(marker_count(42.0), 3);
    }

    #[test]
    fn test_marker_count_uses_magnitude() {
        assert_eq!(marker_count(-1.0), 0);
        assert_eq!(marker_count(-2.5), 1);
        assert_eq!(marker_count(-6.0), 2);
        assert_eq!(marker_count(-100.0), 3);
    }

    #[test]
    fn test_marker_count_nan() {
        assert_eq!(marker_count(f64::NAN), 0);
    }

    #[test]
    fn test_marker_kind() {
        assert_eq!(Marker::for_change(-0.01), Marker::Salt);
        assert_eq!(Marker::for_change(0.0), Marker::Rocket);
        assert_eq!(Marker::for_change(3.0), Marker::Rocket);
    }

    #[test]
    fn test_format_positive() {
        assert_eq!(format_price_message(100.0, 5.0), "$100.00 (+5.00%) 🚀🚀");
        assert_eq!(
            format_price_message(64123.456, 7.6),
            "$64123.46 (+7.60%) 🚀🚀🚀"
        );
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(format_price_message(100.0, -1.0), "$100.00 (-1.00%) ");
        assert_eq!(format_price_message(100.0, -6.0), "$100.00 (-6.00%) 🧂🧂");
    }

    #[test]
    fn test_format_flat() {
        assert_eq!(format_price_message(0.5, 0.0), "$0.50 (+0.00%) ");
    }
}

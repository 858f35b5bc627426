//! Price provider implementations

pub mod binance;

pub use binance::BinanceProvider;

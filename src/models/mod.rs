//! Data models for the generator and the presenter
//!
//! Goods and their base prices, plus the price series handed from the
//! generator to the chart presenter.

pub mod chart;
pub mod good;

// Re-export commonly used types for convenience
pub use chart::{PricePoint, PriceSeries};
pub use good::Good;

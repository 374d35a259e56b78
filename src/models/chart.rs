//! Price series models

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single instant with one price per good, in the owning series' good order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub prices: Vec<f64>,
}

/// Ordered price points sharing one good set, oldest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    goods: Vec<String>,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from points carrying one price per good at strictly
    /// increasing timestamps
    pub fn new(goods: Vec<String>, points: Vec<PricePoint>) -> Self {
        debug_assert!(
            points.iter().all(|p| p.prices.len() == goods.len()),
            "every point needs one price per good"
        );
        debug_assert!(
            points.windows(2).all(|w| w[0].timestamp < w[1].timestamp),
            "timestamps must strictly increase"
        );

        PriceSeries { goods, points }
    }

    pub fn goods(&self) -> &[String] {
        &self.goods
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

//! Commodity models

use serde::{Deserialize, Serialize};

/// Goods and base prices used when no other set is injected
pub const DEFAULT_GOODS: [(&str, f64); 4] = [
    ("Steel", 110.0),
    ("Copper", 95.0),
    ("Plastics", 60.0),
    ("Textiles", 45.0),
];

/// A named commodity and the price its walk starts from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Good {
    pub name: String,
    pub base_price: f64,
}

impl Good {
    pub fn new(name: impl Into<String>, base_price: f64) -> Self {
        Good {
            name: name.into(),
            base_price,
        }
    }

    /// The fixed demo set: Steel, Copper, Plastics, Textiles
    pub fn defaults() -> Vec<Good> {
        DEFAULT_GOODS
            .iter()
            .map(|&(name, base_price)| Good::new(name, base_price))
            .collect()
    }
}

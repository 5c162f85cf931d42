use serde::{Deserialize, Serialize};

/// Current state of a retail product page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetailSnapshot {
    /// Price as listed on the page, kept verbatim for the sheet (`"£12.99"`).
    pub listed_price: Option<String>,
    /// Numeric price parsed from the listing, in the retail currency.
    pub price: Option<f64>,
    pub available: bool,
}

impl RetailSnapshot {
    pub fn new(listed_price: Option<String>, price: Option<f64>, available: bool) -> Self {
        Self {
            listed_price,
            price,
            available,
        }
    }

    /// Snapshot with a plain numeric price.
    pub fn priced(price: f64, available: bool) -> Self {
        Self::new(Some(price.to_string()), Some(price), available)
    }
}

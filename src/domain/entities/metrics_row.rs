use serde::{Deserialize, Serialize};

/// Normalised numeric view of a [`ProductRecord`](super::product_record::ProductRecord).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRow {
    pub title: String,
    pub buy_box_price: f64,
    pub units_sold_last_month: Option<i64>,
    pub rank_drops_30d: i64,
    pub weight_kg: f64,
    /// `None` when the provider has no referral fee; distinct from 0%.
    pub referral_fee_pct: Option<f64>,
    /// `None` when the provider has no fulfillment fee; rendered as `-`.
    pub fulfillment_fee: Option<f64>,
    pub stock_units: i64,
    /// `stock / units sold`; `None` when nothing sold last month.
    pub saturation_score: Option<f64>,
    pub avg_buy_box_30: f64,
    pub avg_buy_box_90: f64,
    pub avg_buy_box_180: f64,
    pub fba_offer_count: usize,
    pub live_fba_offer_count: usize,
}

impl MetricsRow {
    /// Referral fee as an amount of the buy-box price. A missing percentage counts as 0.
    pub fn referral_fee_amount(&self) -> f64 {
        self.referral_fee_pct.unwrap_or(0.0) / 100.0 * self.buy_box_price
    }

    pub fn fulfillment_fee_or_zero(&self) -> f64 {
        self.fulfillment_fee.unwrap_or(0.0)
    }

    pub fn historical_prices(&self) -> [f64; 3] {
        [self.avg_buy_box_30, self.avg_buy_box_90, self.avg_buy_box_180]
    }
}

/// Saturation is stock over last month's sales. Zero or unknown sales leave
/// it undefined rather than infinite.
pub fn saturation_score(stock_units: i64, units_sold: Option<i64>) -> Option<f64> {
    match units_sold {
        Some(sold) if sold > 0 => Some(stock_units as f64 / sold as f64),
        _ => None,
    }
}

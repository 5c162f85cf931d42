use serde::Serialize;

/// Derived pricing analytics for one row. Ratios are `None` when their
/// denominator is zero; such rows are never recommended for purchase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitabilityResult {
    /// Retail price as listed, `-` when the page had none.
    pub current_price: String,
    pub landed_cost: f64,
    pub referral_fee_amount: f64,
    pub profit: f64,
    pub roi_pct: Option<f64>,
    pub available: bool,
    /// Local time, `yyyy-MM-dd HH:mm`.
    pub timestamp: String,
    pub mean_historical_price: f64,
    pub std_dev: f64,
    pub upper_bound_price: f64,
    pub lower_bound_price: f64,
    pub upper_bound_roi: Option<f64>,
    pub lower_bound_roi: Option<f64>,
    pub purchase_recommended: bool,
    pub recommended_quantity: f64,
    pub lower_bound_probability_pct: f64,
    pub upper_bound_probability_pct: f64,
}

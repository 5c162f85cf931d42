//! Data-sheet output layout, columns C..AF.

use crate::domain::entities::metrics_row::MetricsRow;
use crate::domain::entities::profitability::ProfitabilityResult;
use crate::domain::values::price_stats::PriceStats;

pub const COL_CURRENT_PRICE: u32 = 3;
pub const COL_PROFIT: u32 = 4;
pub const COL_ROI: u32 = 5;
pub const COL_AVAILABILITY: u32 = 6;
pub const COL_TIMESTAMP: u32 = 7;
pub const COL_FBA_OFFERS: u32 = 8;
pub const COL_LIVE_FBA_OFFERS: u32 = 9;
pub const COL_TITLE: u32 = 10;
pub const COL_BUY_BOX: u32 = 11;
pub const COL_UNITS_SOLD: u32 = 12;
pub const COL_RANK_DROPS: u32 = 13;
pub const COL_WEIGHT: u32 = 14;
pub const COL_REFERRAL_PCT: u32 = 15;
pub const COL_REFERRAL_AMOUNT: u32 = 16;
pub const COL_FULFILLMENT_FEE: u32 = 17;
pub const COL_STOCK: u32 = 18;
pub const COL_SATURATION: u32 = 19;
pub const COL_DECISION: u32 = 20;
pub const COL_QUANTITY: u32 = 21;
pub const COL_AVG_30: u32 = 22;
pub const COL_AVG_90: u32 = 23;
pub const COL_AVG_180: u32 = 24;
pub const COL_MEAN: u32 = 25;
pub const COL_STD_DEV: u32 = 26;
pub const COL_UPPER_PRICE: u32 = 27;
pub const COL_LOWER_PRICE: u32 = 28;
pub const COL_LOWER_ROI: u32 = 29;
pub const COL_UPPER_ROI: u32 = 30;
pub const COL_LOWER_PROBABILITY: u32 = 31;
pub const COL_UPPER_PROBABILITY: u32 = 32;

pub const FIRST_OUTPUT_COL: u32 = COL_CURRENT_PRICE;
pub const LAST_OUTPUT_COL: u32 = COL_UPPER_PROBABILITY;

/// Sheet text for a not-computable value.
pub const NOT_COMPUTABLE: &str = "-";

fn bool_cell(value: bool) -> String {
    if value { "TRUE" } else { "FALSE" }.to_string()
}

fn opt2(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| NOT_COMPUTABLE.to_string())
}

/// Plain number without trailing zeros (`7.5`, `30`).
fn num(value: f64) -> String {
    value.to_string()
}

/// Cells that only depend on the product record.
pub fn product_cells(metrics: &MetricsRow) -> Vec<(u32, String)> {
    let stats = PriceStats::from_samples(&metrics.historical_prices()).unwrap_or(PriceStats {
        mean: 0.0,
        std_dev: 0.0,
    });
    vec![
        (COL_FBA_OFFERS, metrics.fba_offer_count.to_string()),
        (COL_LIVE_FBA_OFFERS, metrics.live_fba_offer_count.to_string()),
        (COL_TITLE, metrics.title.clone()),
        (COL_BUY_BOX, format!("${:.2}", metrics.buy_box_price)),
        (
            COL_UNITS_SOLD,
            metrics
                .units_sold_last_month
                .map(|u| u.to_string())
                .unwrap_or_default(),
        ),
        (COL_RANK_DROPS, metrics.rank_drops_30d.to_string()),
        (COL_WEIGHT, num(metrics.weight_kg)),
        (
            COL_REFERRAL_PCT,
            metrics
                .referral_fee_pct
                .map(|p| format!("{p:.2}"))
                .unwrap_or_else(|| "N/A".to_string()),
        ),
        (COL_REFERRAL_AMOUNT, format!("${:.2}", metrics.referral_fee_amount())),
        (COL_FULFILLMENT_FEE, num(metrics.fulfillment_fee_or_zero())),
        (COL_STOCK, metrics.stock_units.to_string()),
        (COL_SATURATION, opt2(metrics.saturation_score)),
        (COL_AVG_30, num(metrics.avg_buy_box_30)),
        (COL_AVG_90, num(metrics.avg_buy_box_90)),
        (COL_AVG_180, num(metrics.avg_buy_box_180)),
        (COL_MEAN, format!("{:.2}", stats.mean)),
        (COL_STD_DEV, format!("{:.2}", stats.std_dev)),
        (COL_UPPER_PRICE, format!("{:.2}", stats.upper_bound())),
        (COL_LOWER_PRICE, format!("{:.2}", stats.lower_bound())),
    ]
}

/// Cells for a fully evaluated row: product cells plus everything priced
/// against the retail snapshot.
pub fn result_cells(metrics: &MetricsRow, result: &ProfitabilityResult) -> Vec<(u32, String)> {
    let mut cells = product_cells(metrics);
    cells.extend([
        (COL_CURRENT_PRICE, result.current_price.clone()),
        (COL_PROFIT, format!("{:.2}", result.profit)),
        (
            COL_ROI,
            result
                .roi_pct
                .map(|r| format!("{r:.2}%"))
                .unwrap_or_else(|| NOT_COMPUTABLE.to_string()),
        ),
        (COL_AVAILABILITY, bool_cell(result.available)),
        (COL_TIMESTAMP, result.timestamp.clone()),
        (COL_DECISION, bool_cell(result.purchase_recommended)),
        (COL_QUANTITY, num(result.recommended_quantity)),
        (COL_LOWER_ROI, opt2(result.lower_bound_roi)),
        (COL_UPPER_ROI, opt2(result.upper_bound_roi)),
        (
            COL_LOWER_PROBABILITY,
            format!("{:.2}", result.lower_bound_probability_pct),
        ),
        (
            COL_UPPER_PROBABILITY,
            format!("{:.2}", result.upper_bound_probability_pct),
        ),
    ]);
    cells.sort_by_key(|(col, _)| *col);
    cells
}

//! Product metrics extraction: provider record in, normalised [`MetricsRow`] out.

use crate::domain::entities::metrics_row::{saturation_score, MetricsRow};
use crate::domain::entities::product_record::ProductRecord;
use crate::domain::values::money::{minor_to_major, round2};

/// Divisor turning the provider's package weight into the sheet's weight unit.
const WEIGHT_DIVISOR: f64 = 100.0;

/// Pick the record for `identifier` from a provider response. Falls back to
/// the first record when none carries the identifier.
pub fn select_record<'a>(records: &'a [ProductRecord], identifier: &str) -> Option<&'a ProductRecord> {
    records
        .iter()
        .find(|r| r.identifier.eq_ignore_ascii_case(identifier))
        .or_else(|| records.first())
}

/// Normalise a provider record. `None` in, `None` out: a product the provider
/// does not know yields no row rather than an error.
pub fn extract_metrics(record: Option<&ProductRecord>) -> Option<MetricsRow> {
    let record = record?;

    let stock_units = record
        .stock_per_condition_3rd_fba
        .get(1)
        .copied()
        .filter(|s| *s > 0)
        .unwrap_or(0);
    let units_sold = record.monthly_sold.filter(|s| *s >= 0);

    Some(MetricsRow {
        title: record
            .title
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "-".to_string()),
        buy_box_price: minor_to_major(record.buy_box_price).unwrap_or(0.0),
        units_sold_last_month: units_sold,
        rank_drops_30d: record.sales_rank_drops_30.filter(|d| *d > 0).unwrap_or(0),
        weight_kg: record
            .package_weight
            .filter(|w| *w > 0)
            .map(|w| w as f64 / WEIGHT_DIVISOR)
            .unwrap_or(0.0),
        referral_fee_pct: record.referral_fee_percentage.map(round2),
        fulfillment_fee: minor_to_major(record.pick_and_pack_fee),
        stock_units,
        saturation_score: saturation_score(stock_units, units_sold),
        avg_buy_box_30: buy_box_average(&record.avg_30),
        avg_buy_box_90: buy_box_average(&record.avg_90),
        avg_buy_box_180: buy_box_average(&record.avg_180),
        fba_offer_count: record.fba_offer_count(),
        live_fba_offer_count: record.live_fba_offer_count(),
    })
}

/// Index 1 of a provider average-price array is the buy-box component.
fn buy_box_average(averages: &[i64]) -> f64 {
    minor_to_major(averages.get(1).copied()).unwrap_or(0.0)
}

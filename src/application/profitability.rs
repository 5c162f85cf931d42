//! Profitability engine.
//!
//! Combines a product's [`MetricsRow`] with a retail snapshot and the run
//! parameters into profit, ROI, a ±2σ historical price band with bound ROIs,
//! a purchase decision and an order quantity.
//!
//! Ratios whose denominator is zero (or would be negative) are reported as
//! `None` and block the purchase decision instead of propagating NaN or
//! infinity.

use crate::domain::entities::metrics_row::MetricsRow;
use crate::domain::entities::profitability::ProfitabilityResult;
use crate::domain::entities::retail_snapshot::RetailSnapshot;
use crate::domain::values::money::round2;
use crate::domain::values::price_stats::PriceStats;
use crate::domain::values::run_params::RunParameters;
use chrono::{DateTime, TimeZone};

/// Fixed per-unit handling cost added to the landed cost.
pub const HANDLING_FEE: f64 = 1.04;
/// Shipping cost per weight unit.
pub const WEIGHT_FEE_PER_KG: f64 = 0.01;

/// Minimum ROI percentage for a purchase.
pub const MIN_ROI_PCT: f64 = 30.0;
/// Minimum lower-bound ROI for a purchase. Bound ROIs are plain multiples of
/// the landed cost, not percentages.
pub const MIN_LOWER_BOUND_ROI: f64 = 20.0;
/// Saturation must stay below this for a purchase.
pub const MAX_SATURATION: f64 = 1.0;
/// Order scale applied when the lower-bound ROI is weak.
pub const PARTIAL_ORDER_SCALE: f64 = 0.25;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// `numerator / denominator`, or `None` for a non-positive denominator.
fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator > 0.0 && numerator.is_finite() {
        Some(numerator / denominator)
    } else {
        None
    }
}

fn ratio_pct(numerator: f64, denominator: f64) -> Option<f64> {
    ratio(numerator, denominator).map(|r| 100.0 * r)
}

pub fn evaluate<Tz>(
    metrics: &MetricsRow,
    snapshot: &RetailSnapshot,
    params: &RunParameters,
    now: DateTime<Tz>,
) -> ProfitabilityResult
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let retail_price = snapshot.price.filter(|p| p.is_finite()).unwrap_or(0.0);
    let landed_cost = retail_price * params.exchange_rate;
    let referral_fee_amount = metrics.referral_fee_amount();
    let fulfillment_fee = metrics.fulfillment_fee_or_zero();
    let weight_fee = metrics.weight_kg * WEIGHT_FEE_PER_KG;

    let profit = metrics.buy_box_price
        - landed_cost
        - HANDLING_FEE
        - weight_fee
        - referral_fee_amount
        - fulfillment_fee;
    let roi_pct = ratio_pct(profit, landed_cost + HANDLING_FEE + weight_fee);

    let stats = PriceStats::from_samples(&metrics.historical_prices()).unwrap_or(PriceStats {
        mean: 0.0,
        std_dev: 0.0,
    });
    let upper_bound_price = stats.upper_bound();
    let lower_bound_price = stats.lower_bound();

    // Bound ROIs price the band edges against the run's own weight and prep fees,
    // as a multiple of landed cost.
    let bound_costs = referral_fee_amount
        + fulfillment_fee
        + landed_cost
        + metrics.weight_kg * params.weight_fee_factor
        + params.prep_fee;
    let upper_bound_roi = ratio(upper_bound_price - bound_costs, landed_cost);
    let lower_bound_roi = ratio(lower_bound_price - bound_costs, landed_cost);

    let purchase_recommended = purchase_decision(
        metrics.saturation_score,
        roi_pct,
        snapshot.available,
        lower_bound_roi,
    );

    let base_quantity = metrics
        .units_sold_last_month
        .map(|sold| (sold - metrics.stock_units).max(0))
        .unwrap_or(0) as f64;
    let weak_lower_bound = lower_bound_roi
        .is_some_and(|r| round2(r) < MIN_LOWER_BOUND_ROI);
    let recommended_quantity = if !purchase_recommended && weak_lower_bound {
        base_quantity * PARTIAL_ORDER_SCALE
    } else {
        base_quantity
    };

    ProfitabilityResult {
        current_price: snapshot
            .listed_price
            .clone()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| "-".to_string()),
        landed_cost,
        referral_fee_amount,
        profit,
        roi_pct,
        available: snapshot.available,
        timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
        mean_historical_price: round2(stats.mean),
        std_dev: round2(stats.std_dev),
        upper_bound_price: round2(upper_bound_price),
        lower_bound_price: round2(lower_bound_price),
        upper_bound_roi,
        lower_bound_roi,
        purchase_recommended,
        recommended_quantity,
        lower_bound_probability_pct: round2(stats.cdf(lower_bound_price) * 100.0),
        upper_bound_probability_pct: round2(stats.cdf(upper_bound_price) * 100.0),
    }
}

/// All of: unsaturated, ROI above 30%, in stock, lower-bound ROI (2dp) above 20.
/// Any undefined input fails the decision.
pub fn purchase_decision(
    saturation: Option<f64>,
    roi_pct: Option<f64>,
    available: bool,
    lower_bound_roi: Option<f64>,
) -> bool {
    let unsaturated = saturation.is_some_and(|s| s < MAX_SATURATION);
    let profitable = roi_pct.is_some_and(|r| r > MIN_ROI_PCT);
    let safe_floor = lower_bound_roi.is_some_and(|r| round2(r) > MIN_LOWER_BOUND_ROI);
    unsaturated && profitable && available && safe_floor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::extract::extract_metrics;
    use crate::domain::entities::product_record::ProductRecord;
    use chrono::Utc;

    fn metrics() -> MetricsRow {
        MetricsRow {
            title: "Garlic Press".into(),
            buy_box_price: 30.0,
            units_sold_last_month: Some(40),
            rank_drops_30d: 12,
            weight_kg: 2.0,
            referral_fee_pct: Some(15.0),
            fulfillment_fee: Some(3.0),
            stock_units: 10,
            saturation_score: Some(0.25),
            avg_buy_box_30: 30.0,
            avg_buy_box_90: 30.0,
            avg_buy_box_180: 30.0,
            fba_offer_count: 2,
            live_fba_offer_count: 1,
        }
    }

    fn params() -> RunParameters {
        RunParameters {
            domain_id: 1,
            exchange_rate: 1.0,
            weight_fee_factor: 0.0,
            prep_fee: 0.0,
        }
    }

    #[test]
    fn test_profit_and_roi() {
        let result = evaluate(&metrics(), &RetailSnapshot::priced(10.0, true), &params(), Utc::now());
        // 30 - 10 - 1.04 - 0.02 - 4.5 - 3
        assert!((result.profit - 11.44).abs() < 1e-9);
        // 11.44 / 11.06
        let roi = result.roi_pct.unwrap();
        assert!((roi - 103.435_804).abs() < 1e-4);
        assert_eq!(result.current_price, "10");
    }

    #[test]
    fn test_zero_retail_price_profit_identity() {
        let mut record = ProductRecord::new("B01ABCDEF0");
        record.buy_box_price = Some(2999);
        record.package_weight = Some(180);
        record.referral_fee_percentage = Some(15.0);
        record.pick_and_pack_fee = Some(322);
        record.monthly_sold = Some(40);
        record.avg_30 = vec![-1, 3100];
        let m = extract_metrics(Some(&record)).unwrap();

        let result = evaluate(&m, &RetailSnapshot::priced(0.0, true), &params(), Utc::now());
        let expected = m.buy_box_price
            - HANDLING_FEE
            - m.weight_kg * WEIGHT_FEE_PER_KG
            - m.referral_fee_amount()
            - m.fulfillment_fee_or_zero();
        assert_eq!(result.profit, expected);
        // 29.99 - 1.04 - 0.018 - 4.4985 - 3.22
        assert!((result.profit - 21.2135).abs() < 1e-9);
        // zero landed cost leaves bound ROIs undefined
        assert_eq!(result.lower_bound_roi, None);
        assert_eq!(result.upper_bound_roi, None);
        assert!(!result.purchase_recommended);
        // an undefined floor does not shrink the order
        assert_eq!(result.recommended_quantity, 40.0);
    }

    #[test]
    fn test_flat_history_band() {
        let result = evaluate(&metrics(), &RetailSnapshot::priced(10.0, true), &params(), Utc::now());
        assert_eq!(result.mean_historical_price, 30.0);
        assert_eq!(result.std_dev, 0.0);
        assert_eq!(result.upper_bound_price, 30.0);
        assert_eq!(result.lower_bound_price, 30.0);
        assert_eq!(result.lower_bound_probability_pct, 50.0);
        assert_eq!(result.upper_bound_probability_pct, 50.0);
    }

    #[test]
    fn test_spread_history_band() {
        let mut m = metrics();
        m.avg_buy_box_30 = 100.0;
        m.avg_buy_box_90 = 150.0;
        m.avg_buy_box_180 = 200.0;
        let result = evaluate(&m, &RetailSnapshot::priced(10.0, true), &params(), Utc::now());
        assert_eq!(result.mean_historical_price, 150.0);
        assert_eq!(result.std_dev, 40.82);
        assert_eq!(result.upper_bound_price, 231.65);
        assert_eq!(result.lower_bound_price, 68.35);
        assert_eq!(result.lower_bound_probability_pct, 2.28);
        assert_eq!(result.upper_bound_probability_pct, 97.72);
    }

    #[test]
    fn test_bound_roi_uses_run_fees() {
        let mut m = metrics();
        m.avg_buy_box_30 = 40.0;
        m.avg_buy_box_90 = 40.0;
        m.avg_buy_box_180 = 40.0;
        let p = RunParameters {
            domain_id: 1,
            exchange_rate: 2.0,
            weight_fee_factor: 0.5,
            prep_fee: 1.0,
        };
        let result = evaluate(&m, &RetailSnapshot::priced(5.0, true), &p, Utc::now());
        // landed 10; costs = 4.5 + 3 + 10 + 1 + 1 = 19.5; (40 - 19.5) / 10
        let lower = result.lower_bound_roi.unwrap();
        assert!((lower - 2.05).abs() < 1e-9);
        assert_eq!(result.upper_bound_roi, result.lower_bound_roi);
        assert_eq!(result.landed_cost, 10.0);
    }

    #[test]
    fn test_purchase_recommended_when_all_conditions_hold() {
        let mut m = metrics();
        m.avg_buy_box_30 = 40.0;
        m.avg_buy_box_90 = 40.0;
        m.avg_buy_box_180 = 40.0;
        // landed 1; lower ROI = (40 - 4.5 - 3 - 1) / 1 = 31.5
        let result = evaluate(&m, &RetailSnapshot::priced(1.0, true), &params(), Utc::now());
        assert!((result.lower_bound_roi.unwrap() - 31.5).abs() < 1e-9);
        assert!(result.purchase_recommended);
        assert_eq!(result.recommended_quantity, 30.0);
    }

    #[test]
    fn test_bound_roi_is_a_multiple_not_a_percentage() {
        let m = MetricsRow {
            referral_fee_pct: None,
            fulfillment_fee: None,
            avg_buy_box_30: 13.0,
            avg_buy_box_90: 13.0,
            avg_buy_box_180: 13.0,
            ..metrics()
        };
        let result = evaluate(&m, &RetailSnapshot::priced(10.0, true), &params(), Utc::now());
        // (13 - 10) / 10
        assert!((result.lower_bound_roi.unwrap() - 0.3).abs() < 1e-9);
        // ROI clears 30% but a 0.3x floor is far below 20x
        assert!(result.roi_pct.unwrap() > MIN_ROI_PCT);
        assert!(!result.purchase_recommended);
    }

    #[test]
    fn test_unavailable_never_recommended() {
        assert!(!purchase_decision(Some(0.1), Some(50.0), false, Some(30.0)));
        assert!(purchase_decision(Some(0.1), Some(50.0), true, Some(30.0)));
    }

    #[test]
    fn test_decision_rejects_undefined_inputs() {
        assert!(!purchase_decision(None, Some(50.0), true, Some(30.0)));
        assert!(!purchase_decision(Some(0.1), None, true, Some(30.0)));
        assert!(!purchase_decision(Some(0.1), Some(50.0), true, None));
        assert!(!purchase_decision(Some(1.0), Some(50.0), true, Some(30.0)));
        // 20.004 rounds to 20.00, which is not above the floor
        assert!(!purchase_decision(Some(0.1), Some(50.0), true, Some(20.004)));
    }

    #[test]
    fn test_quantity_never_negative() {
        let mut m = metrics();
        m.units_sold_last_month = Some(5);
        m.stock_units = 20;
        m.saturation_score = Some(4.0);
        let result = evaluate(&m, &RetailSnapshot::priced(10.0, true), &params(), Utc::now());
        assert_eq!(result.recommended_quantity, 0.0);
    }

    #[test]
    fn test_weak_lower_bound_scales_quantity() {
        // flat 15 history, retail 10: lower ROI = (15 - 4.5 - 3 - 10) / 10 = -0.25
        let mut m = metrics();
        m.avg_buy_box_30 = 15.0;
        m.avg_buy_box_90 = 15.0;
        m.avg_buy_box_180 = 15.0;
        let result = evaluate(&m, &RetailSnapshot::priced(10.0, true), &params(), Utc::now());
        assert!(!result.purchase_recommended);
        assert!(result.lower_bound_roi.unwrap() < 20.0);
        assert_eq!(result.recommended_quantity, 30.0 * PARTIAL_ORDER_SCALE);
    }

    #[test]
    fn test_missing_price_renders_dash() {
        let snapshot = RetailSnapshot::new(None, None, true);
        let result = evaluate(&metrics(), &snapshot, &params(), Utc::now());
        assert_eq!(result.current_price, "-");
        assert_eq!(result.landed_cost, 0.0);
        assert!(result.roi_pct.is_some());
    }

    #[test]
    fn test_timestamp_format() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 0).unwrap();
        let result = evaluate(&metrics(), &RetailSnapshot::priced(10.0, true), &params(), now);
        assert_eq!(result.timestamp, "2024-03-09 07:05");
    }
}

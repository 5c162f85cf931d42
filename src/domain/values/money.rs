//! Currency helpers.
//!
//! The price-data provider reports every amount in minor units (cents) and
//! uses `-1` for "no data". Zero is treated the same way, since a listing
//! never has a real buy-box price of nothing.

/// Round to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Convert a provider amount in minor units to major units, rounded to 2dp.
///
/// Returns `None` for absent, zero, or negative ("no data") amounts.
pub fn minor_to_major(minor: Option<i64>) -> Option<f64> {
    match minor {
        Some(m) if m > 0 => Some(round2(m as f64 / 100.0)),
        _ => None,
    }
}

/// Strip everything except digits and dots, then parse (`"£12.99"` -> `12.99`).
pub fn parse_price_text(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse::<f64>().ok()
}

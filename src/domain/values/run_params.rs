use serde::Serialize;

/// Run-level parameters read from the setup sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunParameters {
    /// Marketplace domain id for the price-data provider.
    pub domain_id: u32,
    /// Retail currency -> marketplace currency.
    pub exchange_rate: f64,
    /// Per-kg weight fee used for the confidence-band ROIs.
    pub weight_fee_factor: f64,
    /// Flat prep fee used for the confidence-band ROIs.
    pub prep_fee: f64,
}

impl Default for RunParameters {
    fn default() -> Self {
        Self {
            domain_id: 1,
            exchange_rate: 1.0,
            weight_fee_factor: 0.0,
            prep_fee: 0.0,
        }
    }
}

/// Provider credentials from the setup sheet's key/value rows.
#[derive(Clone, Default)]
pub struct Credentials {
    pub api_url: String,
    pub username: String,
    pub password: String,
    pub keepa_api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_url", &self.api_url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("keepa_api_key", &"***")
            .finish()
    }
}

/// Extract the domain id from region text: the first run of digits
/// (`"Domain 3 (DE)"` -> 3).
pub fn parse_domain_id(region: &str) -> Option<u32> {
    let digits: String = region
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

use serde::{Deserialize, Serialize};

/// One offer on a listing, as far as fulfillment is concerned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Offer {
    pub is_fba: bool,
}

/// A product snapshot from the price-data provider.
///
/// Amounts are in minor currency units exactly as the provider reports them,
/// including its `-1` "no data" marker. Normalisation happens in the metrics
/// extractor, not here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductRecord {
    pub identifier: String,
    pub title: Option<String>,
    /// Package weight in grams.
    pub package_weight: Option<i64>,
    pub referral_fee_percentage: Option<f64>,
    pub monthly_sold: Option<i64>,
    pub buy_box_price: Option<i64>,
    pub sales_rank_drops_30: Option<i64>,
    /// Average price arrays per price type; index 1 is the buy-box component.
    pub avg_30: Vec<i64>,
    pub avg_90: Vec<i64>,
    pub avg_180: Vec<i64>,
    /// Stock per condition for third-party FBA offers; index 1 is "new".
    pub stock_per_condition_3rd_fba: Vec<i64>,
    pub pick_and_pack_fee: Option<i64>,
    pub offers: Vec<Offer>,
    /// Indexes into `offers` for the offers that are currently live.
    pub live_offers_order: Vec<usize>,
}

impl ProductRecord {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    pub fn fba_offer_count(&self) -> usize {
        self.offers.iter().filter(|o| o.is_fba).count()
    }

    /// FBA offers among the live ones. Out-of-range indexes are ignored.
    pub fn live_fba_offer_count(&self) -> usize {
        self.live_offers_order
            .iter()
            .filter_map(|&i| self.offers.get(i))
            .filter(|o| o.is_fba)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offer_counts() {
        let mut record = ProductRecord::new("B000TEST01");
        record.offers = vec![
            Offer { is_fba: true },
            Offer { is_fba: false },
            Offer { is_fba: true },
        ];
        record.live_offers_order = vec![1, 2, 7];

        assert_eq!(record.fba_offer_count(), 2);
        assert_eq!(record.live_fba_offer_count(), 1);
    }

    #[test]
    fn test_no_offers() {
        let record = ProductRecord::new("B000TEST02");
        assert_eq!(record.fba_offer_count(), 0);
        assert_eq!(record.live_fba_offer_count(), 0);
    }
}

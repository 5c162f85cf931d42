use crate::domain::entities::product_record::{Offer, ProductRecord};
use crate::domain::error::DomainError;
use crate::domain::ports::price_data::PriceDataSource;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.keepa.com";

/// Keepa product API client.
///
/// Requests stats, buy-box history, stock and the first 20 offers for every
/// product so the extractor has everything it needs from one call.
pub struct KeepaClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl KeepaClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, DomainError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the client at another host (a mock server in tests).
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: &str,
    ) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .user_agent("buybox/0.1")
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| DomainError::Provider(format!("HTTP client: {e}")))?;
        Ok(Self {
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, DomainError> {
        let resp = self
            .client
            .get(format!("{}/{path}", self.base_url))
            .query(&[("key", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .map_err(|e| DomainError::Provider(format!("Keepa {path}: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Provider(format!(
                "Keepa {path} returned {status}: {body}"
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| DomainError::Provider(format!("Keepa {path}: {e}")))?;
        serde_json::from_str(&body).map_err(|e| DomainError::Parse(format!("Keepa {path}: {e}")))
    }
}

#[derive(Debug, serde::Deserialize)]
struct ProductResponse {
    #[serde(default)]
    products: Option<Vec<KeepaProduct>>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeepaProduct {
    #[serde(default)]
    asin: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    package_weight: Option<i64>,
    #[serde(default)]
    referral_fee_percentage: Option<f64>,
    #[serde(default)]
    monthly_sold: Option<i64>,
    #[serde(default)]
    stats: Option<KeepaStats>,
    #[serde(default)]
    fba_fees: Option<KeepaFbaFees>,
    #[serde(default)]
    offers: Option<Vec<KeepaOffer>>,
    #[serde(default)]
    live_offers_order: Option<Vec<usize>>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeepaStats {
    #[serde(default)]
    buy_box_price: Option<i64>,
    #[serde(default)]
    sales_rank_drops30: Option<i64>,
    #[serde(default)]
    avg30: Option<Vec<i64>>,
    #[serde(default)]
    avg90: Option<Vec<i64>>,
    #[serde(default)]
    avg180: Option<Vec<i64>>,
    #[serde(default, rename = "stockPerCondition3rdFBA")]
    stock_per_condition_3rd_fba: Option<Vec<i64>>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeepaFbaFees {
    #[serde(default)]
    pick_and_pack_fee: Option<i64>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeepaOffer {
    #[serde(default, rename = "isFBA")]
    is_fba: bool,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    tokens_left: i64,
}

impl From<KeepaProduct> for ProductRecord {
    fn from(p: KeepaProduct) -> Self {
        let stats = p.stats.unwrap_or_default();
        ProductRecord {
            identifier: p.asin,
            title: p.title,
            package_weight: p.package_weight,
            referral_fee_percentage: p.referral_fee_percentage,
            monthly_sold: p.monthly_sold,
            buy_box_price: stats.buy_box_price,
            sales_rank_drops_30: stats.sales_rank_drops30,
            avg_30: stats.avg30.unwrap_or_default(),
            avg_90: stats.avg90.unwrap_or_default(),
            avg_180: stats.avg180.unwrap_or_default(),
            stock_per_condition_3rd_fba: stats.stock_per_condition_3rd_fba.unwrap_or_default(),
            pick_and_pack_fee: p.fba_fees.and_then(|f| f.pick_and_pack_fee),
            offers: p
                .offers
                .unwrap_or_default()
                .into_iter()
                .map(|o| Offer { is_fba: o.is_fba })
                .collect(),
            live_offers_order: p.live_offers_order.unwrap_or_default(),
        }
    }
}

#[async_trait]
impl PriceDataSource for KeepaClient {
    fn name(&self) -> &str {
        "keepa"
    }

    async fn fetch_products(
        &self,
        identifiers: &[String],
        domain_id: u32,
    ) -> Result<Vec<ProductRecord>, DomainError> {
        if identifiers.is_empty() {
            return Ok(vec![]);
        }
        let asins = identifiers.join(",");
        let domain = domain_id.to_string();
        debug!(asins = %asins, domain = domain_id, "Calling Keepa product API");

        let data: ProductResponse = self
            .get_json(
                "product",
                &[
                    ("domain", domain.as_str()),
                    ("asin", asins.as_str()),
                    ("stats", "1"),
                    ("buybox", "1"),
                    ("stock", "1"),
                    ("offers", "20"),
                ],
            )
            .await?;

        Ok(data
            .products
            .unwrap_or_default()
            .into_iter()
            .map(ProductRecord::from)
            .collect())
    }

    async fn tokens_left(&self) -> Result<i64, DomainError> {
        let data: TokenResponse = self.get_json("token", &[]).await?;
        Ok(data.tokens_left)
    }
}

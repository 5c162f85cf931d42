use crate::domain::entities::product_record::ProductRecord;
use crate::domain::error::DomainError;
use async_trait::async_trait;

/// Read-only product-data provider.
#[async_trait]
pub trait PriceDataSource: Send + Sync {
    /// Name of this provider (e.g., "keepa").
    fn name(&self) -> &str;

    /// Fetch product records for a batch of identifiers in one marketplace domain.
    /// An empty result means the provider knows none of them.
    async fn fetch_products(
        &self,
        identifiers: &[String],
        domain_id: u32,
    ) -> Result<Vec<ProductRecord>, DomainError>;

    /// Remaining request quota.
    async fn tokens_left(&self) -> Result<i64, DomainError>;
}

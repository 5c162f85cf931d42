use crate::domain::entities::retail_snapshot::RetailSnapshot;
use crate::domain::error::DomainError;
use async_trait::async_trait;

/// Scrapes a retail product page for its current price and availability.
#[async_trait]
pub trait RetailPageSource: Send + Sync {
    fn name(&self) -> &str;

    /// `Ok(None)` when the page parsed but carried no product content.
    async fn fetch_snapshot(&self, url: &str) -> Result<Option<RetailSnapshot>, DomainError>;
}

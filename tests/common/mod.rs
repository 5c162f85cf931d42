//! Shared test helpers.
#![allow(dead_code)]

use async_trait::async_trait;
use buybox::domain::entities::product_record::ProductRecord;
use buybox::domain::entities::retail_snapshot::RetailSnapshot;
use buybox::domain::error::DomainError;
use buybox::domain::ports::price_data::PriceDataSource;
use buybox::domain::ports::retail_page::RetailPageSource;
use buybox::BuyBox;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn setup() -> BuyBox {
    BuyBox::new(":memory:").unwrap()
}

/// Store with run parameters and credentials filled in.
pub fn configured() -> BuyBox {
    let bb = setup();
    bb.set_setup("A1", "Domain 1 (US)").unwrap();
    bb.set_setup("B8", "0.5").unwrap();
    bb.set_setup("B9", "0.2").unwrap();
    bb.set_setup("B10", "1.25").unwrap();
    bb.set_setup("keepaApiKey", "test-key").unwrap();
    bb
}

pub fn product(asin: &str) -> ProductRecord {
    ProductRecord {
        identifier: asin.to_string(),
        title: Some(format!("Product {asin}")),
        package_weight: Some(150),
        referral_fee_percentage: Some(15.0),
        monthly_sold: Some(60),
        buy_box_price: Some(3999),
        sales_rank_drops_30: Some(25),
        avg_30: vec![-1, 4000],
        avg_90: vec![-1, 4100],
        avg_180: vec![-1, 4200],
        stock_per_condition_3rd_fba: vec![0, 12],
        pick_and_pack_fee: Some(350),
        ..ProductRecord::default()
    }
}

#[derive(Default)]
pub struct StubPriceData {
    pub records: HashMap<String, ProductRecord>,
    pub failing: Vec<String>,
    pub calls: Mutex<Vec<String>>,
    pub token_calls: AtomicUsize,
    pub failing_tokens: bool,
}

impl StubPriceData {
    pub fn with(records: Vec<ProductRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|r| (r.identifier.clone(), r))
                .collect(),
            ..Self::default()
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceDataSource for StubPriceData {
    fn name(&self) -> &str {
        "stub-price-data"
    }

    async fn fetch_products(
        &self,
        identifiers: &[String],
        _domain_id: u32,
    ) -> Result<Vec<ProductRecord>, DomainError> {
        self.calls.lock().unwrap().extend(identifiers.iter().cloned());
        if identifiers.iter().any(|id| self.failing.contains(id)) {
            return Err(DomainError::Provider("503 Service Unavailable".into()));
        }
        Ok(identifiers
            .iter()
            .filter_map(|id| self.records.get(id).cloned())
            .collect())
    }

    async fn tokens_left(&self) -> Result<i64, DomainError> {
        let n = self.token_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_tokens {
            return Err(DomainError::Provider("token endpoint timed out".into()));
        }
        Ok(1000 - n as i64)
    }
}

#[derive(Default)]
pub struct StubRetail {
    pub pages: HashMap<String, RetailSnapshot>,
    pub failing: Vec<String>,
}

impl StubRetail {
    pub fn with(pages: Vec<(&str, RetailSnapshot)>) -> Self {
        Self {
            pages: pages
                .into_iter()
                .map(|(url, snap)| (url.to_string(), snap))
                .collect(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl RetailPageSource for StubRetail {
    fn name(&self) -> &str {
        "stub-retail"
    }

    async fn fetch_snapshot(&self, url: &str) -> Result<Option<RetailSnapshot>, DomainError> {
        if self.failing.iter().any(|u| u == url) {
            return Err(DomainError::Parse("unexpected end of JSON".into()));
        }
        Ok(self.pages.get(url).cloned())
    }
}

//! HTTP-level tests for the Keepa and Oxylabs clients against wiremock.

use buybox::domain::error::DomainError;
use buybox::domain::ports::price_data::PriceDataSource;
use buybox::domain::ports::retail_page::RetailPageSource;
use buybox::infrastructure::providers::keepa::KeepaClient;
use buybox::infrastructure::providers::oxylabs::OxylabsClient;
use wiremock::matchers::{basic_auth, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn keepa(base_url: &str) -> KeepaClient {
    KeepaClient::with_base_url("test-key", base_url).unwrap()
}

fn oxylabs(endpoint: &str) -> OxylabsClient {
    OxylabsClient::with_endpoint("user", "pass", endpoint).unwrap()
}

#[tokio::test]
async fn test_keepa_product_request_and_mapping() {
    let server = MockServer::start().await;
    let body = serde_json::json!({
        "tokensLeft": 880,
        "products": [{
            "asin": "B0AAAAAAAA",
            "title": "Cast Iron Skillet",
            "packageWeight": 2300,
            "referralFeePercentage": 15.0,
            "monthlySold": 200,
            "stats": {
                "buyBoxPrice": 2999,
                "salesRankDrops30": 41,
                "avg30": [-1, 3050],
                "avg90": [-1, 3100],
                "avg180": [-1, 2950],
                "stockPerCondition3rdFBA": [0, 35]
            },
            "fbaFees": { "pickAndPackFee": 612 },
            "offers": [{ "isFBA": true }, { "isFBA": true }, { "isFBA": false }],
            "liveOffersOrder": [0, 2]
        }]
    });

    Mock::given(method("GET"))
        .and(path("/product"))
        .and(query_param("key", "test-key"))
        .and(query_param("domain", "3"))
        .and(query_param("asin", "B0AAAAAAAA"))
        .and(query_param("stats", "1"))
        .and(query_param("offers", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let records = keepa(&server.uri())
        .fetch_products(&["B0AAAAAAAA".to_string()], 3)
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.title.as_deref(), Some("Cast Iron Skillet"));
    assert_eq!(record.buy_box_price, Some(2999));
    assert_eq!(record.avg_180, vec![-1, 2950]);
    assert_eq!(record.pick_and_pack_fee, Some(612));
    assert_eq!(record.fba_offer_count(), 2);
    assert_eq!(record.live_fba_offer_count(), 1);
}

#[tokio::test]
async fn test_keepa_missing_products_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/product"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "tokensLeft": 5 })))
        .mount(&server)
        .await;

    let records = keepa(&server.uri())
        .fetch_products(&["B0ZZZZZZZZ".to_string()], 1)
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_keepa_error_status_is_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/product"))
        .respond_with(ResponseTemplate::new(429).set_body_string("out of tokens"))
        .mount(&server)
        .await;

    let err = keepa(&server.uri())
        .fetch_products(&["B0AAAAAAAA".to_string()], 1)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Provider(ref m) if m.contains("429")));
}

#[tokio::test]
async fn test_keepa_malformed_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/product"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = keepa(&server.uri())
        .fetch_products(&["B0AAAAAAAA".to_string()], 1)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Parse(_)));
}

#[tokio::test]
async fn test_keepa_empty_request_skips_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let records = keepa(&server.uri()).fetch_products(&[], 1).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_keepa_tokens_left() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/token"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "tokensLeft": 1187,
            "refillIn": 41000
        })))
        .mount(&server)
        .await;

    assert_eq!(keepa(&server.uri()).tokens_left().await.unwrap(), 1187);
}

#[tokio::test]
async fn test_oxylabs_posts_parse_query_with_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/queries"))
        .and(basic_auth("user", "pass"))
        .and(body_json(serde_json::json!({
            "source": "universal",
            "url": "https://shop.test/item/1",
            "parse": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{
                "content": { "price": "$18.49", "availability": "In stock" },
                "status_code": 200
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = oxylabs(&format!("{}/v1/queries", server.uri()))
        .fetch_snapshot("https://shop.test/item/1")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(snapshot.listed_price.as_deref(), Some("$18.49"));
    assert_eq!(snapshot.price, Some(18.49));
    assert!(snapshot.available);
}

#[tokio::test]
async fn test_oxylabs_empty_results_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "results": [] })))
        .mount(&server)
        .await;

    let snapshot = oxylabs(&server.uri())
        .fetch_snapshot("https://shop.test/gone")
        .await
        .unwrap();
    assert!(snapshot.is_none());
}

#[tokio::test]
async fn test_oxylabs_unauthorized_is_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let err = oxylabs(&server.uri())
        .fetch_snapshot("https://shop.test/item/1")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Provider(ref m) if m.contains("401")));
}

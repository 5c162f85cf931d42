use crate::domain::entities::retail_snapshot::RetailSnapshot;
use crate::domain::error::DomainError;
use crate::domain::ports::retail_page::RetailPageSource;
use crate::domain::values::money::parse_price_text;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://realtime.oxylabs.io/v1/queries";

/// Oxylabs realtime scraper, `universal` source with parsing enabled.
pub struct OxylabsClient {
    endpoint: String,
    username: String,
    password: String,
    client: reqwest::Client,
}

impl OxylabsClient {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self, DomainError> {
        Self::with_endpoint(username, password, DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(
        username: impl Into<String>,
        password: impl Into<String>,
        endpoint: &str,
    ) -> Result<Self, DomainError> {
        // Realtime scrapes render the page server-side and routinely take tens of seconds.
        let client = reqwest::Client::builder()
            .user_agent("buybox/0.1")
            .timeout(Duration::from_secs(180))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| DomainError::Provider(format!("HTTP client: {e}")))?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            username: username.into(),
            password: password.into(),
            client,
        })
    }
}

#[derive(Debug, serde::Serialize)]
struct QueryRequest<'a> {
    source: &'a str,
    url: &'a str,
    parse: bool,
}

#[derive(Debug, serde::Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<QueryResult>,
}

#[derive(Debug, serde::Deserialize)]
struct QueryResult {
    #[serde(default)]
    content: Option<Value>,
}

/// Truthiness of a loosely typed scraped field.
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Price as displayed and as a number. Strings keep their currency marks for
/// display; the number has everything but digits and dots stripped.
fn price_fields(value: Option<&Value>) -> (Option<String>, Option<f64>) {
    match value {
        Some(Value::Number(n)) => (Some(n.to_string()), n.as_f64()),
        Some(Value::String(s)) if !s.is_empty() => (Some(s.clone()), parse_price_text(s)),
        _ => (None, None),
    }
}

pub(crate) fn snapshot_from_content(content: &Value) -> RetailSnapshot {
    let (listed_price, price) = price_fields(content.get("price"));
    RetailSnapshot::new(listed_price, price, truthy(content.get("availability")))
}

#[async_trait]
impl RetailPageSource for OxylabsClient {
    fn name(&self) -> &str {
        "oxylabs"
    }

    async fn fetch_snapshot(&self, url: &str) -> Result<Option<RetailSnapshot>, DomainError> {
        let mut request = self.client.post(&self.endpoint).json(&QueryRequest {
            source: "universal",
            url,
            parse: true,
        });
        if !self.username.is_empty() {
            request = request.basic_auth(&self.username, Some(&self.password));
        }

        let resp = request
            .send()
            .await
            .map_err(|e| DomainError::Provider(format!("Oxylabs: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(DomainError::Provider(format!(
                "Oxylabs returned {status}: {body}"
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| DomainError::Provider(format!("Oxylabs: {e}")))?;
        let data: QueryResponse =
            serde_json::from_str(&body).map_err(|e| DomainError::Parse(format!("Oxylabs: {e}")))?;

        Ok(data
            .results
            .into_iter()
            .next()
            .and_then(|r| r.content)
            .filter(Value::is_object)
            .map(|content| snapshot_from_content(&content)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_price() {
        let snap = snapshot_from_content(&json!({ "price": 12.5, "availability": true }));
        assert_eq!(snap.listed_price.as_deref(), Some("12.5"));
        assert_eq!(snap.price, Some(12.5));
        assert!(snap.available);
    }

    #[test]
    fn test_text_price_and_availability() {
        let snap = snapshot_from_content(&json!({ "price": "£1,024.99", "availability": "In stock" }));
        assert_eq!(snap.listed_price.as_deref(), Some("£1,024.99"));
        assert_eq!(snap.price, Some(1024.99));
        assert!(snap.available);
    }

    #[test]
    fn test_missing_fields() {
        let snap = snapshot_from_content(&json!({}));
        assert_eq!(snap.listed_price, None);
        assert_eq!(snap.price, None);
        assert!(!snap.available);

        let snap = snapshot_from_content(&json!({ "price": "", "availability": 0 }));
        assert_eq!(snap.price, None);
        assert!(!snap.available);
    }
}

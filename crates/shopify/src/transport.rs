//! GraphQL transport.
//!
//! The client talks to Shopify through this seam so tests can substitute a
//! scripted fake and exercise retry/demux logic without the network.

use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;

use crate::config::ShopifyConfig;
use crate::error::ShopifyError;

/// Executes a GraphQL document and returns the `data` payload.
///
/// Implementations map HTTP/transport failures to [`ShopifyError`] variants;
/// top-level GraphQL `errors` become [`ShopifyError::Graphql`] (permanent).
pub trait Transport: Send + Sync {
    fn execute(
        &self,
        document: &str,
    ) -> impl Future<Output = Result<Value, ShopifyError>> + Send;
}

impl<T: Transport> Transport for &T {
    fn execute(
        &self,
        document: &str,
    ) -> impl Future<Output = Result<Value, ShopifyError>> + Send {
        (**self).execute(document)
    }
}

/// HTTP transport over a single reused `reqwest::Client`.
///
/// The access token and content headers are set once at construction; the
/// configuration is read-only for the rest of the run.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(config: &ShopifyConfig) -> Result<Self, ShopifyError> {
        let mut headers = HeaderMap::new();
        let token = HeaderValue::from_str(&config.access_token)
            .map_err(|e| ShopifyError::network(format!("invalid access token: {e}")))?;
        headers.insert("X-Shopify-Access-Token", token);
        headers.insert("Accept", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ShopifyError::network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint(),
        })
    }
}

impl Transport for HttpTransport {
    async fn execute(&self, document: &str) -> Result<Value, ShopifyError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "query": document }))
            .send()
            .await
            .map_err(|e| ShopifyError::network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ShopifyError::network(e.to_string()))?;

        if !status.is_success() {
            return Err(ShopifyError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: Value = serde_json::from_str(&body)
            .map_err(|e| ShopifyError::parse(format!("invalid JSON response: {e}")))?;

        if let Some(errors) = parsed.get("errors").filter(|e| !e.is_null()) {
            return Err(ShopifyError::Graphql(errors.to_string()));
        }

        match parsed.get("data") {
            Some(data) if !data.is_null() => Ok(data.clone()),
            _ => Err(ShopifyError::parse("response carries no data")),
        }
    }
}

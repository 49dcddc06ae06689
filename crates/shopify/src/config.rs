//! Immutable client configuration.
//!
//! Constructed once per run and passed into the client explicitly; never a
//! process-wide singleton.

use std::time::Duration;

use crate::gid;

/// Connection settings for the Shopify Admin GraphQL API.
#[derive(Debug, Clone)]
pub struct ShopifyConfig {
    /// Store domain, e.g. `example.myshopify.com`.
    pub store_domain: String,
    /// Admin API access token (sent as `X-Shopify-Access-Token`).
    pub access_token: String,
    /// Admin API version segment of the endpoint URL.
    pub api_version: String,
    /// The stock location reconciled against, numeric ID or full GID.
    pub location_id: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ShopifyConfig {
    pub fn new(
        store_domain: impl Into<String>,
        access_token: impl Into<String>,
        location_id: impl Into<String>,
    ) -> Self {
        Self {
            store_domain: store_domain.into(),
            access_token: access_token.into(),
            api_version: "2024-04".to_string(),
            location_id: location_id.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// GraphQL endpoint URL.
    pub fn endpoint(&self) -> String {
        format!(
            "https://{}/admin/api/{}/graphql.json",
            self.store_domain, self.api_version
        )
    }

    /// Numeric form of the configured location ID.
    pub fn location_numeric_id(&self) -> &str {
        gid::numeric_id(&self.location_id)
    }
}

//! Client for the website monitoring endpoints.
//!
//! Every request carries the `X-Version: 3` header and a bearer token.
//!
//! ## Example
//!
//! ```rust,no_run
//! use logicmonitor_api::WebsitesClient;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = WebsitesClient::builder()
//!         .org("acme")
//!         .token("lmb_xxx")
//!         .timeout(Duration::from_secs(30))
//!         .build()?;
//!
//!     let websites = client.list_websites().await?;
//!     for website in &websites {
//!         println!("{} ({}): {}", website.name, website.domain, website.status);
//!     }
//!
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use reqwest::{Client, Response};

use crate::{ApiError, GraphData, Website, WebsiteList};

/// API version requested through the `X-Version` header.
pub const API_VERSION: &str = "3";

/// Client for the LogicMonitor websites API.
#[derive(Debug, Clone)]
pub struct WebsitesClient {
    client: Client,
    endpoint: String,
    token: String,
}

impl WebsitesClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> WebsitesClientBuilder {
        WebsitesClientBuilder::default()
    }

    /// Base URL of the REST API, without trailing slash.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// List every website monitored by the organisation.
    pub async fn list_websites(&self) -> Result<Vec<Website>, ApiError> {
        let response = self.get(&self.websites_url(), &[]).await?;
        let response = check_status(response).await?;

        let list: WebsiteList = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        Ok(list.items)
    }

    /// Fetch the performance graph of one website for `[start, end]`, both in
    /// Unix seconds.
    pub async fn performance_data(
        &self,
        website_id: u64,
        start: i64,
        end: i64,
    ) -> Result<GraphData, ApiError> {
        let url = format!("{}/{}/graphs/performance/data", self.websites_url(), website_id);
        let response = self
            .get(&url, &[("start", start.to_string()), ("end", end.to_string())])
            .await?;
        let response = check_status(response).await?;

        let body = response.text().await?;
        GraphData::from_body(&body)
    }

    fn websites_url(&self) -> String {
        format!("{}/website/websites", self.endpoint)
    }

    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<Response, ApiError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .header("X-Version", API_VERSION)
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(response)
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Builder for WebsitesClient.
#[derive(Debug, Default)]
pub struct WebsitesClientBuilder {
    org: Option<String>,
    endpoint: Option<String>,
    token: Option<String>,
    timeout: Option<Duration>,
}

impl WebsitesClientBuilder {
    /// Set the organisation subdomain (`{org}.logicmonitor.com`).
    pub fn org(mut self, org: impl Into<String>) -> Self {
        self.org = Some(org.into());
        self
    }

    /// Override the REST base URL (default: `https://{org}.logicmonitor.com/santaba/rest`).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the bearer token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout (default: 30 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<WebsitesClient, ApiError> {
        let endpoint = match (self.endpoint, self.org) {
            (Some(endpoint), _) => endpoint.trim_end_matches('/').to_string(),
            (None, Some(org)) => default_endpoint(&org),
            (None, None) => {
                return Err(ApiError::Config(
                    "either an organisation or an endpoint is required".to_string(),
                ))
            }
        };
        let token = self
            .token
            .ok_or_else(|| ApiError::Config("a bearer token is required".to_string()))?;

        let client = Client::builder()
            .timeout(self.timeout.unwrap_or(Duration::from_secs(30)))
            .build()?;

        Ok(WebsitesClient {
            client,
            endpoint,
            token,
        })
    }
}

/// REST base URL for an organisation.
pub fn default_endpoint(org: &str) -> String {
    format!("https://{}.logicmonitor.com/santaba/rest", org)
}

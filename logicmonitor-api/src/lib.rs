//! # logicmonitor-api
//!
//! Typed client for the LogicMonitor website monitoring REST API.
//!
//! Only the two endpoints needed to pull uptime status and response-time
//! graphs are covered:
//!
//! - `GET /website/websites` - every monitored website of an organisation
//! - `GET /website/websites/{id}/graphs/performance/data` - the performance
//!   graph series for a time window
//!
//! Responses are decoded into explicit schemas. A graph response that lacks
//! the series fields is reported as [`ApiError::MalformedSeries`] together
//! with the raw body, so callers can log exactly what the API returned.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use logicmonitor_api::WebsitesClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = WebsitesClient::builder()
//!         .org("acme")
//!         .token("lmb_xxx")
//!         .build()?;
//!
//!     for website in client.list_websites().await? {
//!         let graph = client.performance_data(website.id, 1_700_000_000, 1_700_003_600).await?;
//!         println!("{}: {} samples", website.domain, graph.timestamps.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod types;
pub mod websites;

pub use error::ApiError;
pub use types::{GraphData, GraphLine, Website, WebsiteList};
pub use websites::{WebsitesClient, WebsitesClientBuilder};

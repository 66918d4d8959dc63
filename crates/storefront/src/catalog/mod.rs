//! Catalog loading from the menu endpoint.
//!
//! # Architecture
//!
//! - One `GET <api_url>?action=all_menu` per session, bounded by a hard timeout
//!   (8 seconds by default) that covers connect, headers and body
//! - The response is category-grouped; [`normalize`] flattens it into one
//!   ordered item list
//! - Any failure (timeout, transport, non-2xx, bad shape) substitutes the
//!   embedded [`fallback`] menu and marks the load as degraded
//!
//! Loading never fails: the reason for a fallback travels inside
//! [`CatalogOrigin`] so callers and tests can see it without reading logs.
//!
//! # Example
//!
//! ```rust,ignore
//! let client = CatalogClient::new(&config)?;
//! let catalog = client.load().await;
//!
//! if catalog.is_degraded() {
//!     // show the "offline/demo mode" badge
//! }
//! ```

pub mod fallback;
pub mod filter;
pub mod normalize;

use std::time::Duration;

use dapur_core::{ItemId, ItemStatus, Price};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::StorefrontConfig;

pub use filter::{ALL_CATEGORIES, CatalogFilter};

/// Errors that can occur while fetching the remote catalog.
///
/// None of these reach the shopper; they only explain why the fallback menu
/// was used.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The whole request did not finish in time.
    #[error("catalog request timed out after {0:?}")]
    Timeout(Duration),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status.
    #[error("catalog endpoint returned HTTP {0}")]
    Status(u16),

    /// Body was not the expected `{ status, data: { category: [..] } }` shape.
    #[error("malformed catalog response: {0}")]
    Malformed(String),
}

/// A purchasable item, normalized from one catalog record.
///
/// `stock` is the count at load time; remaining stock during the session is
/// tracked by the inventory ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: String,
    pub price: Price,
    pub original_price: Price,
    pub stock: i64,
    pub status: ItemStatus,
    pub image_url: String,
    /// Lower-cased category, used as the matching key.
    pub category: String,
    /// Category label exactly as the endpoint sent it.
    pub category_label: String,
}

impl CatalogItem {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Where a loaded catalog came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOrigin {
    /// Fetched and validated from the menu endpoint.
    Remote,
    /// Embedded fallback menu; `reason` is the fetch failure.
    Fallback { reason: String },
}

/// Result of a catalog load: items, category tabs, and origin.
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub items: Vec<CatalogItem>,
    /// Category tabs, starting with [`ALL_CATEGORIES`].
    pub categories: Vec<String>,
    pub origin: CatalogOrigin,
}

impl LoadedCatalog {
    /// Whether the storefront is running on the fallback menu.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        matches!(self.origin, CatalogOrigin::Fallback { .. })
    }

    /// The embedded fallback menu, tagged with the failure that caused it.
    #[must_use]
    pub fn fallback(reason: impl Into<String>) -> Self {
        let (items, categories) = fallback::menu();
        Self {
            items,
            categories,
            origin: CatalogOrigin::Fallback {
                reason: reason.into(),
            },
        }
    }
}

/// Raw envelope returned by the menu endpoint.
#[derive(Debug, Deserialize)]
struct MenuEnvelope {
    #[serde(default)]
    status: serde_json::Value,
    #[serde(default)]
    data: serde_json::Value,
}

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the catalog endpoint.
#[derive(Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &StorefrontConfig) -> Result<Self, CatalogError> {
        Ok(Self::with_timeout(
            reqwest::Client::builder().build()?,
            config.api_url.clone(),
            config.catalog_timeout,
        ))
    }

    /// Create a client over an existing `reqwest::Client`.
    #[must_use]
    pub const fn with_timeout(client: reqwest::Client, endpoint: Url, timeout: Duration) -> Self {
        Self {
            client,
            endpoint,
            timeout,
        }
    }

    /// Load the catalog, falling back to the embedded menu on any failure.
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub async fn load(&self) -> LoadedCatalog {
        match self.fetch().await {
            Ok((items, categories)) => {
                tracing::info!(items = items.len(), "Catalog loaded from endpoint");
                LoadedCatalog {
                    items,
                    categories,
                    origin: CatalogOrigin::Remote,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Catalog unavailable, using embedded fallback menu");
                LoadedCatalog::fallback(e.to_string())
            }
        }
    }

    /// Fetch and normalize the remote catalog under the hard timeout.
    ///
    /// # Errors
    ///
    /// Returns error on timeout, transport failure, non-2xx status or a
    /// response that fails the shape check.
    pub async fn fetch(&self) -> Result<(Vec<CatalogItem>, Vec<String>), CatalogError> {
        tokio::time::timeout(self.timeout, self.fetch_unbounded())
            .await
            .map_err(|_| CatalogError::Timeout(self.timeout))?
    }

    async fn fetch_unbounded(&self) -> Result<(Vec<CatalogItem>, Vec<String>), CatalogError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("action", "all_menu");

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let envelope: MenuEnvelope = serde_json::from_str(&body)
            .map_err(|e| CatalogError::Malformed(format!("not JSON: {e}")))?;

        if !normalize::is_truthy(&envelope.status) {
            return Err(CatalogError::Malformed("status flag is not set".to_string()));
        }

        let serde_json::Value::Object(data) = envelope.data else {
            return Err(CatalogError::Malformed(
                "data is not an object keyed by category".to_string(),
            ));
        };

        normalize::flatten(&data).map_err(CatalogError::Malformed)
    }
}

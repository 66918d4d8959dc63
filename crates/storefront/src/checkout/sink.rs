//! Remote order recording.
//!
//! Orders are POSTed to the same spreadsheet-backed endpoint that serves the
//! menu. The endpoint only accepts "simple" requests, so the JSON body is
//! sent as `text/plain`.

use std::future::Future;
use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use super::order::Order;
use crate::config::StorefrontConfig;

/// Errors from recording an order remotely.
#[derive(Debug, Error)]
pub enum OrderSinkError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Body could not be encoded or the response was not JSON.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Destination for finalized orders.
pub trait OrderSink: Send + Sync {
    /// Record one order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order was not accepted.
    fn submit(&self, order: &Order) -> impl Future<Output = Result<(), OrderSinkError>> + Send;
}

/// HTTP client for the order endpoint.
#[derive(Clone)]
pub struct OrderClient {
    inner: Arc<OrderClientInner>,
}

struct OrderClientInner {
    client: reqwest::Client,
    endpoint: Url,
}

impl OrderClient {
    /// Create a client posting to the configured API URL.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &StorefrontConfig) -> Result<Self, OrderSinkError> {
        // No request timeout: the handoff waits for this call to settle either way.
        let client = reqwest::Client::builder().build()?;
        Ok(Self::with_client(client, config.api_url.clone()))
    }

    #[must_use]
    pub fn with_client(client: reqwest::Client, endpoint: Url) -> Self {
        Self {
            inner: Arc::new(OrderClientInner { client, endpoint }),
        }
    }
}

impl OrderSink for OrderClient {
    #[instrument(skip(self, order), fields(lines = order.lines.len(), total = %order.grand_total))]
    async fn submit(&self, order: &Order) -> Result<(), OrderSinkError> {
        let body = serde_json::to_string(&order.payload())
            .map_err(|e| OrderSinkError::Parse(e.to_string()))?;

        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("text/plain;charset=utf-8"))
            .body(body)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OrderSinkError::Api {
                status: status.as_u16(),
                message,
            });
        }

        // The endpoint's acknowledgement carries nothing we use, but it must be JSON.
        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| OrderSinkError::Parse(e.to_string()))?;

        tracing::info!("Order recorded remotely");
        Ok(())
    }
}

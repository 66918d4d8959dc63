//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Shopper-facing refusals
//! (stock, checkout validation) keep their notice text. Each refusal is logged
//! with the request ID and left as a breadcrumb for Sentry.

use axum::{
    Json,
    extract::rejection::FormRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::checkout::CheckoutError;
use crate::shop::StockError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// A cart operation was refused.
    #[error("{0}")]
    Stock(#[from] StockError),

    /// A checkout was refused.
    #[error("{0}")]
    Checkout(#[from] CheckoutError),

    /// A submitted form could not be decoded.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl AppError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Stock(StockError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Stock(_) | Self::Checkout(CheckoutError::InProgress) => StatusCode::CONFLICT,
            Self::Checkout(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        // Handlers run inside the span the request ID middleware recorded onto
        tracing::info!(error = %message, status = status.as_u16(), "Request refused");
        add_breadcrumb(
            "refusal",
            &message,
            Some(&[("status", status.as_str())]),
        );

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("item_id", "m1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use dapur_core::ItemId;

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("missing field `nama`".to_string());
        assert_eq!(err.to_string(), "Bad request: missing field `nama`");

        let err = AppError::from(StockError::OutOfStock(ItemId::new("m1")));
        assert_eq!(err.to_string(), "Maaf ya, stok untuk menu ini sudah habis!");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(StockError::NotFound(ItemId::new("x")).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(StockError::InsufficientStock(ItemId::new("m1")).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(StockError::Inactive(ItemId::new("x1")).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(CheckoutError::InProgress.into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(CheckoutError::MissingAddress.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
    }
}

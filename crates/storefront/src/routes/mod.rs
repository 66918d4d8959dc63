//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//!
//! # Menu
//! GET  /menu?category=&q=      - Filtered menu with live stock and degraded flag
//! GET  /recommendation         - Suggestion for what to order
//!
//! # Cart
//! GET  /cart?zone=             - Cart lines and totals for a delivery zone
//! POST /cart/add               - Add one unit (form: id)
//! POST /cart/update            - Change a line by delta (form: id, delta)
//!
//! # Checkout
//! POST /checkout               - Place the order, 303 to the WhatsApp deep link
//! ```

pub mod cart;
pub mod checkout;
pub mod menu;
pub mod recommendation;

use axum::{
    Router,
    body::Body,
    http::Request,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/menu", get(menu::index))
        .route("/recommendation", get(recommendation::show))
        .nest("/cart", cart_routes())
        .route("/checkout", post(checkout::submit))
}

/// The complete application: routes, state and the middleware stack.
pub fn app(state: AppState) -> Router {
    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = tracing::field::Empty,
        )
    });

    routes()
        .with_state(state)
        // Request ID runs inside the trace span so it can record onto it
        .layer(
            ServiceBuilder::new()
                .layer(trace)
                .layer(axum::middleware::from_fn(request_id_middleware)),
        )
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

//! Integration tests for the Dapur Mommy storefront.
//!
//! Tests drive the real axum router in-process with `tower::ServiceExt`, with
//! the menu/order endpoint replaced by a `wiremock` server. Nothing needs to
//! be running beforehand.
//!
//! # Test Categories
//!
//! - `storefront_menu` - Catalog loading, fallback and filtering
//! - `storefront_cart` - Cart operations against the stock ledger
//! - `storefront_checkout` - Checkout, remote recording and WhatsApp handoff

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, StatusCode, header},
};
use dapur_storefront::config::StorefrontConfig;
use dapur_storefront::routes;
use dapur_storefront::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// WhatsApp number used by every test context.
pub const WHATSAPP_NO: &str = "60123456789";

/// A two-category menu in the endpoint's wire format.
///
/// `n2` has a single unit in stock and `x1` is inactive.
#[must_use]
pub fn menu_fixture() -> Value {
    json!({
        "status": true,
        "data": {
            "Nasi & Lauk": [
                { "id": "n1", "menu": "Nasi Goreng Kampung", "harga": 8.5, "harga_asal": 10, "stok": 5, "status": "AKTIF", "gambar": "" },
                { "id": "n2", "menu": "Mee Rebus Johor", "harga": "7.00", "harga_asal": "8.00", "stok": 1, "status": "AKTIF", "gambar": "https://cdn.example.test/mee.jpg" },
                { "id": "x1", "menu": "Nasi Dagang", "harga": 9, "harga_asal": 9, "stok": 4, "status": "TIDAK AKTIF", "gambar": "" }
            ],
            "Minuman": [
                { "id": "d1", "menu": "Air Bandung", "harga": 3, "harga_asal": 3.5, "stok": 0, "status": "AKTIF", "gambar": "" },
                { "id": "d2", "menu": "Kopi O Ais", "harga": 2.8, "harga_asal": 3, "stok": 12, "status": "AKTIF", "gambar": "" }
            ]
        }
    })
}

/// Mount the menu fixture on `server`.
pub async fn mount_menu(server: &MockServer) {
    Mock::given(method("GET"))
        .and(query_param("action", "all_menu"))
        .respond_with(ResponseTemplate::new(200).set_body_json(menu_fixture()))
        .mount(server)
        .await;
}

/// Mount a menu endpoint that always fails, forcing the fallback menu.
pub async fn mount_broken_menu(server: &MockServer) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Script error"))
        .mount(server)
        .await;
}

/// A storefront wired to a mock endpoint.
pub struct TestContext {
    pub server: MockServer,
    pub app: Router,
}

impl TestContext {
    /// Start a context whose endpoint serves [`menu_fixture`].
    pub async fn online() -> Self {
        let server = MockServer::start().await;
        mount_menu(&server).await;
        Self::boot(server).await
    }

    /// Start a context whose endpoint is broken (degraded mode).
    pub async fn offline() -> Self {
        let server = MockServer::start().await;
        mount_broken_menu(&server).await;
        Self::boot(server).await
    }

    /// Build the app against an already configured mock server.
    pub async fn boot(server: MockServer) -> Self {
        let vars: HashMap<&str, String> = HashMap::from([
            ("DAPUR_API_URL", server.uri()),
            ("DAPUR_WHATSAPP_NO", WHATSAPP_NO.to_string()),
            ("DAPUR_CATALOG_TIMEOUT_SECS", "2".to_string()),
        ]);
        let config = StorefrontConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();
        let state = AppState::bootstrap(config).await.unwrap();

        Self {
            server,
            app: routes::app(state),
        }
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.app
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn post_form(&self, uri: &str, form: &str) -> Response<Body> {
        self.app
            .clone()
            .oneshot(
                Request::post(uri)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(form.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// GET `uri`, assert 200 and parse the body as JSON.
    pub async fn get_json(&self, uri: &str) -> Value {
        let response = self.get(uri).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
        json_body(response).await
    }

    /// Add `id` to the cart `times` times, asserting each add succeeds.
    pub async fn add(&self, id: &str, times: usize) {
        for _ in 0..times {
            let response = self.post_form("/cart/add", &format!("id={id}")).await;
            assert_eq!(response.status(), StatusCode::OK, "add {id}");
        }
    }
}

/// Read a response body as JSON.
pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

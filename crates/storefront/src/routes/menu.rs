//! Menu listing.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::instrument;

use crate::catalog::CatalogFilter;
use crate::shop::MenuEntry;
use crate::state::AppState;

/// Menu page data.
#[derive(Serialize)]
pub struct MenuView<'a> {
    /// Running on the embedded fallback menu ("offline/demo mode").
    pub degraded: bool,
    pub categories: &'a [String],
    pub items: Vec<MenuEntry<'a>>,
    pub cart_count: u32,
}

/// List active items matching the category tab and search text.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>, Query(filter): Query<CatalogFilter>) -> Response {
    let session = state.session().lock().await;

    Json(MenuView {
        degraded: session.is_degraded(),
        categories: session.categories(),
        items: session.menu(&filter),
        cart_count: session.cart().item_count(),
    })
    .into_response()
}

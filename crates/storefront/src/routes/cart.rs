//! Cart route handlers.
//!
//! Each handler locks the session for one operation and answers with the
//! refreshed cart, so the client never has to re-read it.

use axum::{
    Form, Json,
    extract::{Query, State},
};
use dapur_core::{DeliveryZone, ItemId, Price};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::shop::{CartTotals, QuantityChange, ShopSession};
use crate::state::AppState;

/// One cart line as shown to the shopper.
#[derive(Debug, Serialize)]
pub struct CartLineView {
    pub id: ItemId,
    pub name: String,
    pub image_url: String,
    pub price: Price,
    pub quantity: u32,
    pub line_total: Price,
    /// Ledger stock left for the item.
    pub remaining: i64,
}

/// Cart display data.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub item_count: u32,
    pub zone: DeliveryZone,
    #[serde(flatten)]
    pub totals: CartTotals,
}

impl CartView {
    #[must_use]
    pub fn new(session: &ShopSession, zone: DeliveryZone) -> Self {
        let cart = session.cart();
        Self {
            lines: cart
                .lines()
                .iter()
                .map(|line| CartLineView {
                    id: line.item.id.clone(),
                    name: line.item.name.clone(),
                    image_url: line.item.image_url.clone(),
                    price: line.item.price,
                    quantity: line.quantity,
                    line_total: line.line_total(),
                    remaining: session.ledger().remaining(&line.item.id).unwrap_or(0),
                })
                .collect(),
            item_count: cart.item_count(),
            zone,
            totals: cart.totals(zone),
        }
    }
}

/// Query parameters for the cart view.
#[derive(Debug, Default, Deserialize)]
pub struct CartQuery {
    #[serde(default)]
    pub zone: DeliveryZone,
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub id: ItemId,
    #[serde(default)]
    pub zone: DeliveryZone,
}

/// Update quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub id: ItemId,
    pub delta: i32,
    #[serde(default)]
    pub zone: DeliveryZone,
}

/// Response to an add.
#[derive(Debug, Serialize)]
pub struct AddedResponse {
    pub quantity: u32,
    pub cart: CartView,
}

/// Response to an update.
#[derive(Debug, Serialize)]
pub struct UpdatedResponse {
    #[serde(flatten)]
    pub change: QuantityChange,
    pub cart: CartView,
}

/// Show the cart with totals for a zone.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Query(query): Query<CartQuery>) -> Json<CartView> {
    let session = state.session().lock().await;
    Json(CartView::new(&session, query.zone))
}

/// Add one unit of an item.
#[instrument(skip(state), fields(item_id = %form.id))]
pub async fn add(
    State(state): State<AppState>,
    Form(form): Form<AddToCartForm>,
) -> Result<Json<AddedResponse>> {
    let mut session = state.session().lock().await;
    let quantity = session.add_item(&form.id)?;

    add_breadcrumb("cart", "Added item", Some(&[("item_id", form.id.as_str())]));

    Ok(Json(AddedResponse {
        quantity,
        cart: CartView::new(&session, form.zone),
    }))
}

/// Change a cart line by `delta` units; reaching zero removes it.
#[instrument(skip(state), fields(item_id = %form.id, delta = form.delta))]
pub async fn update(
    State(state): State<AppState>,
    Form(form): Form<UpdateCartForm>,
) -> Result<Json<UpdatedResponse>> {
    let mut session = state.session().lock().await;
    let change = session.update_quantity(&form.id, form.delta)?;

    Ok(Json(UpdatedResponse {
        change,
        cart: CartView::new(&session, form.zone),
    }))
}

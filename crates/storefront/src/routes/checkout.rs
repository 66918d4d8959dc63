//! Checkout handler.

use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    response::Redirect,
};
use tracing::instrument;

use crate::checkout::CheckoutForm;
use crate::error::{Result, add_breadcrumb};
use crate::state::AppState;

/// Place the order and send the shopper to WhatsApp.
///
/// Answers `303 See Other` to the deep link whether or not the order was
/// recorded remotely. A form that does not decode (unknown zone or payment
/// method) is refused with `400`.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    form: std::result::Result<Form<CheckoutForm>, FormRejection>,
) -> Result<Redirect> {
    let Form(form) = form?;
    let report = state.checkout().checkout(state.session(), form).await?;

    let total = report.order.grand_total.to_string();
    add_breadcrumb(
        "checkout",
        "Order handed off to WhatsApp",
        Some(&[("total", total.as_str())]),
    );

    Ok(Redirect::to(&report.handoff.url))
}

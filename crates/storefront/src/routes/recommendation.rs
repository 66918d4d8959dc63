//! "What should I eat?" suggestion.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::shop::RECOMMENDATION_ITEM_LIMIT;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RecommendationView {
    pub text: String,
}

/// Ask for a suggestion based on what is still in stock.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<RecommendationView> {
    let names = state
        .session()
        .lock()
        .await
        .in_stock_names(RECOMMENDATION_ITEM_LIMIT);

    Json(RecommendationView {
        text: state.recommender().recommend(&names).await,
    })
}

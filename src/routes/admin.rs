use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    error::AppResult, middleware::RequestId, models::RankingUpdateResponse, routes::AppState,
    services::ranking,
};

/// Recomputes wardrobe rankings on demand
pub async fn update_rankings(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<Json<RankingUpdateResponse>> {
    tracing::info!(request_id = %request_id, "Ranking update requested");

    let response = ranking::update_rankings(state.repository.clone()).await?;

    Ok(Json(response))
}

use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{RecommendationRequest, RecommendationResponse, WeatherRecommendationRequest},
    routes::AppState,
    services::recommendations,
};

/// Handler for outfit recommendations
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    tracing::info!(
        request_id = %request_id,
        user_id = %request.user_id,
        "Processing recommendation request"
    );

    let response = recommendations::recommend_outfits(
        state.repository.clone(),
        state.engine.clone(),
        request.user_id,
        request.criteria,
        request.limit,
    )
    .await?;

    tracing::info!(
        request_id = %request_id,
        outfits = response.outfits.len(),
        "Recommendation completed"
    );

    Ok(Json(response))
}

/// Handler for recommendations driven by the weather at a location
pub async fn recommend_for_weather(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<WeatherRecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    tracing::info!(
        request_id = %request_id,
        user_id = %request.user_id,
        location = %request.location,
        "Processing weather recommendation request"
    );

    let response = recommendations::recommend_for_location(
        state.repository.clone(),
        state.engine.clone(),
        state.weather.clone(),
        request.user_id,
        &request.location,
        request.criteria,
        request.limit,
    )
    .await?;

    tracing::info!(
        request_id = %request_id,
        outfits = response.outfits.len(),
        season = ?response.season,
        "Weather recommendation completed"
    );

    Ok(Json(response))
}

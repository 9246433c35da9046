use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::WardrobeRepository,
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{outfits::OutfitEngine, weather::WeatherProvider},
};

pub mod admin;
pub mod outfits;
pub mod wardrobes;

/// Shared handler state
pub struct AppState {
    pub repository: Arc<dyn WardrobeRepository>,
    pub weather: Arc<dyn WeatherProvider>,
    pub engine: Arc<OutfitEngine>,
}

/// Creates the application router with all routes and middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/outfits/recommendations", post(outfits::recommend))
        .route(
            "/outfits/recommendations/weather",
            post(outfits::recommend_for_weather),
        )
        .route("/admin/update-rankings", post(admin::update_rankings))
        .route("/wardrobes/leaderboard", get(wardrobes::leaderboard))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

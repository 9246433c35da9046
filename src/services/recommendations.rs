use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use crate::{
    db::WardrobeRepository,
    error::{AppError, AppResult},
    models::{RecommendationCriteria, RecommendationResponse},
    services::{outfits::OutfitEngine, weather::WeatherProvider},
};

/// Shown when the wardrobe has items but none combine into an outfit
pub const NOT_ENOUGH_VARIETY: &str = "Not enough variety in your wardrobe to build an outfit";

/// Recommends outfits from a user's wardrobe
///
/// `limit` is the caller's requested count and is validated against the
/// engine settings. An empty wardrobe is an error; a wardrobe that yields no
/// outfit returns an empty list with an explanatory message.
pub async fn recommend_outfits(
    repository: Arc<dyn WardrobeRepository>,
    engine: Arc<OutfitEngine>,
    user_id: Uuid,
    criteria: RecommendationCriteria,
    limit: Option<usize>,
) -> AppResult<RecommendationResponse> {
    let start = Instant::now();
    let limit = engine.settings().resolve_limit(limit)?;

    let items = repository.wardrobe_items(user_id).await?;

    tracing::info!(
        user_id = %user_id,
        item_count = items.len(),
        occasion = ?criteria.occasion,
        limit,
        "Starting outfit recommendation"
    );

    let outfits = engine.recommend(&items, &criteria, limit)?;

    let message = outfits.is_empty().then(|| NOT_ENOUGH_VARIETY.to_string());

    tracing::info!(
        user_id = %user_id,
        candidates = outfits.len(),
        processing_time_ms = start.elapsed().as_millis(),
        "Outfit recommendation finished"
    );

    Ok(RecommendationResponse {
        outfits,
        message,
        season: criteria.effective_season(),
    })
}

/// Resolves the weather at `location`, then recommends outfits for it
///
/// The reading replaces any weather already present in `criteria`. An
/// explicit season in `criteria` still takes precedence over it.
pub async fn recommend_for_location(
    repository: Arc<dyn WardrobeRepository>,
    engine: Arc<OutfitEngine>,
    weather: Arc<dyn WeatherProvider>,
    user_id: Uuid,
    location: &str,
    mut criteria: RecommendationCriteria,
    limit: Option<usize>,
) -> AppResult<RecommendationResponse> {
    if location.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "location must not be empty".to_string(),
        ));
    }

    let reading = weather.current_weather(location).await?;

    tracing::info!(
        provider = weather.name(),
        location,
        temperature_c = reading.temperature_c,
        season = %reading.season(),
        "Resolved weather for recommendation"
    );

    criteria.weather = Some(reading);

    recommend_outfits(repository, engine, user_id, criteria, limit).await
}

//! OpenWeatherMap provider
//!
//! Uses the current-weather endpoint (`/data/2.5/weather`) in metric units.
//! Readings are cached per location for half an hour.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::WeatherReading,
    services::weather::WeatherProvider,
};
use reqwest::Client as HttpClient;
use serde::Deserialize;

const WEATHER_CACHE_TTL: u64 = 1800; // 30 minutes

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    main: MainBlock,
    #[serde(default)]
    weather: Vec<ConditionBlock>,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    main: String,
}

impl From<CurrentWeatherResponse> for WeatherReading {
    fn from(response: CurrentWeatherResponse) -> Self {
        WeatherReading {
            temperature_c: response.main.temp,
            condition: response.weather.into_iter().next().map(|c| c.main),
        }
    }
}

#[derive(Clone)]
pub struct OpenWeatherProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
}

impl OpenWeatherProvider {
    pub fn new(cache: Cache, api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    async fn fetch_current(&self, location: &str) -> AppResult<WeatherReading> {
        let url = format!("{}/data/2.5/weather", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("q", location),
                ("units", "metric"),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("Unknown location '{}'", location)));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "OpenWeatherMap returned status {}: {}",
                status, body
            )));
        }

        let body: CurrentWeatherResponse = response.json().await?;
        let reading = WeatherReading::from(body);

        tracing::debug!(
            location,
            temperature_c = reading.temperature_c,
            condition = ?reading.condition,
            "Fetched current weather"
        );

        Ok(reading)
    }
}

#[async_trait::async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, location: &str) -> AppResult<WeatherReading> {
        let location = location.trim();
        if location.is_empty() {
            return Err(AppError::InvalidInput("location must not be empty".to_string()));
        }

        cached!(
            self.cache,
            CacheKey::Weather(location.to_string()),
            WEATHER_CACHE_TTL,
            self.fetch_current(location)
        )
    }

    fn name(&self) -> &'static str {
        "openweathermap"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_redis_client;
    use crate::models::Season;

    #[test]
    fn test_parse_current_weather_response() {
        let body: CurrentWeatherResponse = serde_json::from_value(serde_json::json!({
            "coord": { "lon": 13.41, "lat": 52.52 },
            "weather": [{ "id": 800, "main": "Clear", "description": "clear sky" }],
            "main": { "temp": 26.3, "feels_like": 26.1, "humidity": 40 },
            "name": "Berlin"
        }))
        .unwrap();

        let reading = WeatherReading::from(body);
        assert_eq!(reading.temperature_c, 26.3);
        assert_eq!(reading.condition.as_deref(), Some("Clear"));
        assert_eq!(reading.season(), Season::Summer);
    }

    #[test]
    fn test_parse_response_without_conditions() {
        let body: CurrentWeatherResponse =
            serde_json::from_value(serde_json::json!({ "main": { "temp": -3.0 } })).unwrap();

        let reading = WeatherReading::from(body);
        assert_eq!(reading.condition, None);
        assert_eq!(reading.season(), Season::Winter);
    }

    #[tokio::test]
    async fn test_blank_location_is_rejected_before_any_lookup() {
        // Client::open does not connect, so no Redis is needed here
        let client = create_redis_client("redis://localhost:6379").unwrap();
        let (cache, _handle) = Cache::new(client);
        let provider = OpenWeatherProvider::new(
            cache,
            "key".to_string(),
            "https://api.openweathermap.org/".to_string(),
        );

        let result = provider.current_weather("   ").await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
        assert_eq!(provider.api_url, "https://api.openweathermap.org");
    }
}

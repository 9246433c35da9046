use crate::{error::AppResult, models::WeatherReading};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Source of current weather conditions
///
/// Implementations resolve a free-form location ("Berlin", "Austin,US") into
/// a [`WeatherReading`] the recommendation engine can turn into a season.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current conditions at `location`
    async fn current_weather(&self, location: &str) -> AppResult<WeatherReading>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

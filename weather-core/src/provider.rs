use crate::{
    Config, WeatherQuery, WeatherResult,
    error::{Error, Result},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Interface to a current-weather data source.
///
/// `weather-web` holds the provider as a trait object; tests substitute a
/// double behind the same interface.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch current conditions for the queried city.
    async fn current_weather(&self, query: &WeatherQuery) -> Result<WeatherResult>;

    /// Check whether a city name resolves to a known location.
    ///
    /// Invalid input answers `Ok(false)`; transport or provider trouble is
    /// re-raised untouched rather than swallowed into a boolean.
    async fn validate_city(&self, city: &str) -> Result<bool> {
        match self.current_weather(&WeatherQuery::new(city)).await {
            Ok(_) => Ok(true),
            Err(Error::Validation { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }
}

/// Construct the provider configured for this deployment.
pub fn provider_from_config(config: &Config) -> Box<dyn WeatherProvider> {
    Box::new(OpenWeatherProvider::new(config.openweather_api_key.clone()))
}

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::model::{WeatherQuery, WeatherResult, capitalize_first};

use super::WeatherProvider;

/// REST endpoint serving current conditions.
pub const DEFAULT_API_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Base for condition icon images.
const ICON_IMAGE_URL: &str = "http://openweathermap.org/img/wn";

const SERVICE_NAME: &str = "OpenWeatherMap";

/// Weather lookup backed by the OpenWeatherMap current-weather API.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: HttpClient,
}

impl OpenWeatherProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_API_URL.to_string(),
            http: HttpClient::new(),
        }
    }

    /// Point the provider at a different endpoint (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Swap the underlying HTTP client, e.g. to shorten the timeout.
    pub fn with_http_client(mut self, http: HttpClient) -> Self {
        self.http = http;
        self
    }

    fn endpoint(&self, query: &WeatherQuery) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/weather", self.base_url))
            .map_err(|err| Error::unknown(format!("Invalid provider URL: {err}")))?;

        url.query_pairs_mut()
            .append_pair("q", query.city.trim())
            .append_pair("units", query.unit.as_str())
            .append_pair("appid", &self.api_key);

        Ok(url)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, query: &WeatherQuery) -> Result<WeatherResult> {
        let city = query.city.trim();

        // Checked here independently of whatever the caller validated.
        if city.is_empty() {
            return Err(Error::validation_for_field("city", "City name is required"));
        }

        let url = self.endpoint(query)?;
        let data: OwCurrentResponse = match self.http.fetch_json(url).await {
            Ok(data) => data,
            // Provider 404 means the city is unknown to it.
            Err(Error::Api {
                status_code: 404, ..
            }) => {
                return Err(Error::validation_with_fields(
                    format!("City not found: {city}"),
                    BTreeMap::from([("city".to_string(), "City not found".to_string())]),
                ));
            }
            Err(err) => {
                return Err(Error::api(
                    err.message().to_string(),
                    err.status_code(),
                    SERVICE_NAME,
                ));
            }
        };

        let condition = data
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| Error::api("No weather conditions in response", 500, SERVICE_NAME))?;

        Ok(WeatherResult {
            location: capitalize_first(city),
            temperature: data.main.temp,
            description: condition.description,
            humidity: data.main.humidity,
            wind_speed: data.wind.speed,
            pressure: data.main.pressure,
            image_url: format!("{ICON_IMAGE_URL}/{}@2x.png", condition.icon),
            icon: condition.icon,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

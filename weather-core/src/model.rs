use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Temperature unit accepted by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    #[default]
    Metric,
    Imperial,
}

impl Unit {
    /// Query-string value understood by the provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Metric => "metric",
            Unit::Imperial => "imperial",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Unit {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(Unit::Metric),
            "imperial" => Ok(Unit::Imperial),
            _ => Err(Error::validation(format!(
                "Unknown unit '{value}'. Supported units: metric, imperial."
            ))),
        }
    }
}

/// One weather lookup, created per incoming request and never persisted.
#[derive(Debug, Clone)]
pub struct WeatherQuery {
    pub city: String,
    pub unit: Unit,
}

impl WeatherQuery {
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            unit: Unit::default(),
        }
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }
}

/// Current conditions as rendered to the user. Consumed once; never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    /// Queried city with only its first character capitalized.
    pub location: String,
    pub temperature: f64,
    pub description: String,
    pub icon: String,
    pub humidity: u8,
    pub wind_speed: f64,
    pub pressure: u32,
    /// Icon image derived from the provider's icon id.
    pub image_url: String,
}

/// First character ASCII-uppercased, remainder untouched.
pub(crate) fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(value.len());
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

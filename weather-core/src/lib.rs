//! Core library for the city weather web application.
//!
//! This crate defines:
//! - Configuration sourced from the process environment
//! - The error taxonomy shared by every layer
//! - A timeout-enforcing JSON HTTP client
//! - The weather provider abstraction and its OpenWeatherMap implementation
//!
//! It is used by `weather-web`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod provider;

pub use config::{Config, Environment, RateLimitConfig};
pub use error::{Error, Result};
pub use http::HttpClient;
pub use model::{Unit, WeatherQuery, WeatherResult};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};

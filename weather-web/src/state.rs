use std::sync::Arc;

use weather_core::{Config, WeatherProvider};

use crate::rate_limit::{self, RateLimiter};

/// Shared per-process state handed to every handler.
///
/// The rate limiter counters are the only mutable state crossing requests;
/// everything else is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub provider: Arc<dyn WeatherProvider>,
    pub global_limiter: Arc<RateLimiter>,
    pub weather_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Wire up state from configuration and a provider implementation.
    pub fn new(config: Config, provider: Arc<dyn WeatherProvider>) -> Self {
        let limits = config.rate_limit;
        Self {
            config: Arc::new(config),
            provider,
            global_limiter: Arc::new(RateLimiter::new(
                limits.global,
                rate_limit::WINDOW,
                rate_limit::GLOBAL_MESSAGE,
            )),
            weather_limiter: Arc::new(RateLimiter::new(
                limits.weather_api,
                rate_limit::WINDOW,
                rate_limit::WEATHER_MESSAGE,
            )),
        }
    }
}

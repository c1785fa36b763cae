use anyhow::{Context, Result};

/// Deployment mode. Production masks internal error detail from users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Anything other than "production" (case-insensitive) is development.
    fn from_var(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEFAULT_PORT: u16 = 3000;

/// Request thresholds applied per client over a 15-minute window.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Ceiling for all routes combined.
    pub global: u32,
    /// Stricter ceiling for the weather lookup routes.
    pub weather_api: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            global: 100,
            weather_api: 30,
        }
    }
}

/// Runtime configuration, read from the process environment once at startup
/// and passed by reference into every component that needs it.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: Environment,
    pub openweather_api_key: String,
    pub rate_limit: RateLimitConfig,
}

impl Config {
    /// Read and validate configuration from the process environment.
    ///
    /// Fails when `OPENWEATHER_API_KEY` is absent or any numeric variable is
    /// malformed; the caller is expected to refuse to start in that case.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Exists so tests can feed in-memory variables without touching the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let openweather_api_key = lookup("OPENWEATHER_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .context("Missing required environment variable: OPENWEATHER_API_KEY")?;

        let port = parse_var(&lookup, "PORT", DEFAULT_PORT)?;
        let environment = lookup("APP_ENV")
            .map(|value| Environment::from_var(&value))
            .unwrap_or_default();

        let defaults = RateLimitConfig::default();
        let rate_limit = RateLimitConfig {
            global: parse_var(&lookup, "RATE_LIMIT_GLOBAL", defaults.global)?,
            weather_api: parse_var(&lookup, "RATE_LIMIT_WEATHER_API", defaults.weather_api)?,
        };

        Ok(Self {
            port,
            environment,
            openweather_api_key,
            rate_limit,
        })
    }
}

fn parse_var<T>(lookup: impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {name}: {raw}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let vars: HashMap<&str, &str> = vars.iter().copied().collect();
        move |name| vars.get(name).map(|value| (*value).to_string())
    }

    #[test]
    fn missing_api_key_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("OPENWEATHER_API_KEY"));
    }

    #[test]
    fn blank_api_key_is_an_error() {
        let vars = [("OPENWEATHER_API_KEY", "   ")];
        assert!(Config::from_lookup(lookup_from(&vars)).is_err());
    }

    #[test]
    fn defaults_apply_when_only_the_key_is_set() {
        let vars = [("OPENWEATHER_API_KEY", "test-key")];
        let config = Config::from_lookup(lookup_from(&vars)).expect("config should load");

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.rate_limit.global, 100);
        assert_eq!(config.rate_limit.weather_api, 30);
    }

    #[test]
    fn defaults_keep_weather_limit_below_global() {
        let config = RateLimitConfig::default();
        assert!(config.weather_api <= config.global);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let vars = [
            ("OPENWEATHER_API_KEY", "test-key"),
            ("PORT", "8080"),
            ("APP_ENV", "production"),
            ("RATE_LIMIT_GLOBAL", "50"),
            ("RATE_LIMIT_WEATHER_API", "10"),
        ];
        let config = Config::from_lookup(lookup_from(&vars)).expect("config should load");

        assert_eq!(config.port, 8080);
        assert!(config.environment.is_production());
        assert_eq!(config.rate_limit.global, 50);
        assert_eq!(config.rate_limit.weather_api, 10);
    }

    #[test]
    fn malformed_port_is_an_error() {
        let vars = [("OPENWEATHER_API_KEY", "test-key"), ("PORT", "not-a-port")];
        let err = Config::from_lookup(lookup_from(&vars)).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn unrecognized_environment_falls_back_to_development() {
        let vars = [("OPENWEATHER_API_KEY", "test-key"), ("APP_ENV", "staging")];
        let config = Config::from_lookup(lookup_from(&vars)).expect("config should load");
        assert_eq!(config.environment, Environment::Development);
    }
}

//! Validating extractors guarding the weather routes.
//!
//! City input is checked before any handler body runs: required, trimmed
//! length in [2, 50], and an allow-list of letters, spaces, commas, periods,
//! and hyphens. A failing request never reaches the weather service.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use axum::Form;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use regex::Regex;
use serde::Deserialize;
use weather_core::{Environment, Error};

use crate::respond::{error_response, prefers_json};

static CITY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\s,.-]+$").expect("city pattern is valid"));

const MIN_LEN: usize = 2;
const MAX_LEN: usize = 50;

/// Validated `cityName` form field from `POST /`.
#[derive(Debug)]
pub struct CityForm(pub String);

/// Validated `{city}` path parameter from `GET /weather/{city}`.
#[derive(Debug)]
pub struct CityPath(pub String);

/// Rejection carrying the collected rule violations; renders the 400 itself.
#[derive(Debug)]
pub struct ValidationRejection {
    error: Error,
    wants_json: bool,
}

impl ValidationRejection {
    fn new(messages: Vec<String>, fields: BTreeMap<String, String>, wants_json: bool) -> Self {
        Self {
            error: Error::validation_with_fields(messages.join(", "), fields),
            wants_json,
        }
    }
}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        // Masking never applies to 400s, so the deployment mode is irrelevant.
        error_response(&self.error, Environment::Development, self.wants_json)
    }
}

#[derive(Debug, Deserialize)]
struct SearchForm {
    #[serde(default, rename = "cityName")]
    city_name: String,
}

impl<S> FromRequest<S> for CityForm
where
    S: Send + Sync,
{
    type Rejection = ValidationRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let wants_json = prefers_json(req.headers());
        let form = match Form::<SearchForm>::from_request(req, state).await {
            Ok(Form(form)) => form,
            // An unreadable body carries no city at all; same as an empty one.
            Err(_) => SearchForm {
                city_name: String::new(),
            },
        };

        match check_city("cityName", &form.city_name) {
            Ok(city) => Ok(Self(city)),
            Err((messages, fields)) => Err(ValidationRejection::new(messages, fields, wants_json)),
        }
    }
}

impl<S> FromRequestParts<S> for CityPath
where
    S: Send + Sync,
{
    type Rejection = ValidationRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let wants_json = prefers_json(&parts.headers);
        let raw = match Path::<String>::from_request_parts(parts, state).await {
            Ok(Path(city)) => city,
            Err(_) => String::new(),
        };

        match check_city("city", &raw) {
            Ok(city) => Ok(Self(city)),
            Err((messages, fields)) => Err(ValidationRejection::new(messages, fields, wants_json)),
        }
    }
}

/// Apply the city rule to one field, collecting one message per violated rule.
///
/// Returns the trimmed value on success. On failure, the field map keeps the
/// last violated rule's message for the field.
fn check_city(
    field: &str,
    raw: &str,
) -> Result<String, (Vec<String>, BTreeMap<String, String>)> {
    let value = raw.trim();
    let mut messages = Vec::new();

    if value.is_empty() {
        messages.push("City name is required".to_string());
    }
    if value.chars().count() < MIN_LEN {
        messages.push("City name must be at least 2 characters".to_string());
    }
    if value.chars().count() > MAX_LEN {
        messages.push("City name cannot exceed 50 characters".to_string());
    }
    if !CITY_PATTERN.is_match(value) {
        messages.push(
            "City name can only contain letters, spaces, commas, periods, and hyphens".to_string(),
        );
    }

    if messages.is_empty() {
        return Ok(value.to_string());
    }

    let mut fields = BTreeMap::new();
    if let Some(last) = messages.last() {
        fields.insert(field.to_string(), last.clone());
    }
    Err((messages, fields))
}

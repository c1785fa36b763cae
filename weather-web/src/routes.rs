//! Route table and request handlers.
//!
//! Both write paths run the same pipeline: rate limiting, syntactic
//! validation, the weather lookup, and render-or-funnel. Handlers never write
//! error responses themselves.

use axum::Router;
use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::info;
use weather_core::WeatherQuery;

use crate::extract::{CityForm, CityPath};
use crate::rate_limit;
use crate::respond::{error_response, prefers_json};
use crate::state::AppState;
use crate::views;

/// Assemble the application router.
///
/// The weather limiter wraps only the two lookup routes; the global limiter
/// and request tracing wrap everything, the 404 fallback included.
pub fn app(state: AppState) -> Router {
    let weather_routes = Router::new()
        .route("/", post(search_weather))
        .route("/weather/{city}", get(weather_by_city))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::weather_api,
        ));

    Router::new()
        .route("/", get(home))
        .merge(weather_routes)
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::global,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET /` - home page with the search form.
async fn home() -> Html<String> {
    Html(views::home_page())
}

/// `POST /` - weather search form submission.
async fn search_weather(
    State(state): State<AppState>,
    headers: HeaderMap,
    CityForm(city): CityForm,
) -> Response {
    lookup(&state, &headers, city).await
}

/// `GET /weather/{city}` - direct access to weather for a city.
async fn weather_by_city(
    State(state): State<AppState>,
    headers: HeaderMap,
    CityPath(city): CityPath,
) -> Response {
    lookup(&state, &headers, city).await
}

async fn lookup(state: &AppState, headers: &HeaderMap, city: String) -> Response {
    info!(%city, "weather lookup");

    let query = WeatherQuery::new(city);
    match state.provider.current_weather(&query).await {
        Ok(weather) => Html(views::weather_page(&weather)).into_response(),
        Err(err) => error_response(&err, state.config.environment, prefers_json(headers)),
    }
}

/// Uniform 404 for routes that do not exist.
async fn not_found(headers: HeaderMap) -> Response {
    let status = StatusCode::NOT_FOUND;
    let message = "The page you are looking for does not exist.";

    if prefers_json(&headers) {
        return (status, Json(json!({ "error": "Not Found", "message": message })))
            .into_response();
    }

    (
        status,
        Html(views::error_page("Page Not Found", message, status.as_u16())),
    )
        .into_response()
}

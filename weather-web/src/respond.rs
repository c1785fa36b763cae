//! Error-to-response funnel and content negotiation.
//!
//! Every failure surfaced by the pipeline is rendered exactly once, here.
//! Components signal errors through the shared taxonomy instead of writing
//! responses of their own.

use axum::Json;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use serde_json::json;
use tracing::error;
use weather_core::{Environment, Error};

use crate::views;

/// Fixed message shown for uncategorized failures in production.
pub const MASKED_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// True when the client's `Accept` header admits JSON but not HTML.
///
/// HTML wins whenever it is acceptable; a missing header counts as `*/*`.
pub fn prefers_json(headers: &HeaderMap) -> bool {
    let Some(accept) = headers.get(header::ACCEPT).and_then(|value| value.to_str().ok()) else {
        return false;
    };

    let mut json = false;
    let mut html = false;
    for part in accept.split(',') {
        let mime = part.split(';').next().unwrap_or("").trim();
        match mime {
            "application/json" | "application/*" => json = true,
            "text/html" | "text/*" | "*/*" => html = true,
            _ => {}
        }
    }
    json && !html
}

/// Render any taxonomy error as the single user-facing failure response.
///
/// The status comes from the error, the title from the status (with `Api`
/// errors naming their service), and the message from the error itself —
/// except for uncategorized 500s in production, which are masked.
pub fn error_response(error: &Error, environment: Environment, wants_json: bool) -> Response {
    let status = StatusCode::from_u16(error.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    error!(status = status.as_u16(), error = %error, "request failed");

    let title = title_for(error, status);
    let message = match error {
        Error::Unknown { .. } if environment.is_production() => MASKED_MESSAGE.to_string(),
        _ => error.to_string(),
    };

    if wants_json {
        let body = match error {
            Error::Validation { fields, .. } if !fields.is_empty() => {
                json!({ "error": "Validation Error", "details": fields })
            }
            _ => json!({ "error": title, "message": message }),
        };
        return (status, Json(body)).into_response();
    }

    (
        status,
        Html(views::error_page(&title, &message, status.as_u16())),
    )
        .into_response()
}

fn title_for(error: &Error, status: StatusCode) -> String {
    if let Error::Api { service, .. } = error {
        return format!("Service Error ({service})");
    }
    match status {
        StatusCode::BAD_REQUEST => "Invalid Input".to_string(),
        StatusCode::NOT_FOUND => "Not Found".to_string(),
        StatusCode::TOO_MANY_REQUESTS => "Too Many Requests".to_string(),
        _ => "Error".to_string(),
    }
}

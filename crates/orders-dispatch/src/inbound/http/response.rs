use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

pub const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey";

/// Cross-origin headers carried by every response, so browsers can call the
/// endpoint from any page.
pub fn cors_headers() -> [(HeaderName, HeaderValue); 2] {
    [
        (ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*")),
        (
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ),
    ]
}

/// Answer to a browser preflight.
pub fn preflight() -> Response {
    (StatusCode::OK, cors_headers(), "ok").into_response()
}

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    let body = serde_json::to_string(body)
        .unwrap_or_else(|_| "{\"error\":\"internal serialization\"}".into());
    (
        status,
        cors_headers(),
        [(CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        body,
    )
        .into_response()
}

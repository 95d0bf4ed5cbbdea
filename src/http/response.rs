//! Response construction.
//!
//! # Responsibilities
//! - Build `302 Found` redirects
//! - Map upstream failures to gateway status codes

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

/// `302 Found` redirect to `location`.
///
/// A location that is not valid header text becomes a 500 response.
pub fn found(location: impl Into<String>) -> Response {
    let location = location.into();
    match HeaderValue::try_from(location.as_str()) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(e) => {
            tracing::warn!(location = %location.escape_debug(), error = %e, "Invalid redirect location");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Plain-text `502 Bad Gateway`.
pub fn bad_gateway() -> Response {
    (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
}

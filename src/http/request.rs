//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) as early as possible
//! - Rewrite the request path in place, keeping the query string
//! - Expose the script path used for subfolder detection

use axum::http::uri::PathAndQuery;
use axum::http::{HeaderName, Request, Uri};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates `x-request-id` values for requests that arrive without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        id.parse().ok().map(RequestId::new)
    }
}

/// Server-reported script path (the `SCRIPT_NAME` of CGI-style servers).
///
/// A front server or test may attach it to a request; the prefix resolver
/// prefers it over its configured fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptName(pub String);

/// Request ID of `req`, or `"unknown"`.
pub fn request_id<B>(req: &Request<B>) -> &str {
    req.headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Replace the path of `req`, keeping scheme, authority and query.
pub fn rewrite_path<B>(req: &mut Request<B>, path: &str) -> Result<(), axum::http::Error> {
    let path_and_query = match req.uri().query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };

    let mut parts = req.uri().clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query)?);
    *req.uri_mut() = Uri::from_parts(parts)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_rewrite_path_keeps_query() {
        let mut req = Request::builder()
            .uri("/users?page=2")
            .body(Body::empty())
            .unwrap();
        rewrite_path(&mut req, "/en/users").unwrap();
        assert_eq!(req.uri().path(), "/en/users");
        assert_eq!(req.uri().query(), Some("page=2"));
    }

    #[test]
    fn test_rewrite_path_absolute_uri() {
        let mut req = Request::builder()
            .uri("http://example.com/app/users")
            .body(Body::empty())
            .unwrap();
        rewrite_path(&mut req, "/users").unwrap();
        assert_eq!(req.uri().to_string(), "http://example.com/users");
    }

    #[test]
    fn test_request_id_fallback() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        assert_eq!(request_id(&req), "unknown");

        let req = Request::builder()
            .uri("/")
            .header("x-request-id", "abc")
            .body(Body::empty())
            .unwrap();
        assert_eq!(request_id(&req), "abc");
    }

    #[test]
    fn test_make_request_uuid() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let id = MakeRequestUuid.make_request_id(&req).unwrap();
        let value = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(value).is_ok());
    }
}

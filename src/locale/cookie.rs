//! Locale persistence cookie.

use std::time::Duration;

use axum::http::{header, HeaderValue};
use axum::response::Response;

/// `Set-Cookie` builder for the persisted locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleCookie {
    name: String,
    value: String,
    secure: bool,
    max_age: Option<Duration>,
}

impl LocaleCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            secure: false,
            max_age: None,
        }
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn max_age(mut self, max_age: Option<Duration>) -> Self {
        self.max_age = max_age;
        self
    }

    /// Header value, e.g. `locale=pt; Path=/; Max-Age=3600; Secure`.
    pub fn header_value(&self) -> String {
        let mut value = format!("{}={}; Path=/", self.name, self.value);
        if let Some(max_age) = self.max_age {
            value.push_str(&format!("; Max-Age={}", max_age.as_secs()));
        }
        if self.secure {
            value.push_str("; Secure");
        }
        value
    }

    /// Append the cookie to `response`.
    ///
    /// Values that are not valid header text are dropped with a warning.
    pub fn attach(&self, mut response: Response) -> Response {
        match HeaderValue::from_str(&self.header_value()) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => {
                tracing::warn!(cookie = %self.name, error = %e, "Dropping invalid locale cookie");
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_header_value_minimal() {
        let cookie = LocaleCookie::new("locale", "pt");
        assert_eq!(cookie.header_value(), "locale=pt; Path=/");
    }

    #[test]
    fn test_header_value_full() {
        let cookie = LocaleCookie::new("lang", "de")
            .secure(true)
            .max_age(Some(Duration::from_secs(86_400)));
        assert_eq!(cookie.header_value(), "lang=de; Path=/; Max-Age=86400; Secure");
    }

    #[test]
    fn test_attach_appends() {
        let mut response = Response::new(Body::empty());
        response
            .headers_mut()
            .insert(header::SET_COOKIE, HeaderValue::from_static("session=abc"));

        let response = LocaleCookie::new("locale", "pt").attach(response);
        let cookies: Vec<_> = response.headers().get_all(header::SET_COOKIE).iter().collect();
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[1], "locale=pt; Path=/");
    }
}

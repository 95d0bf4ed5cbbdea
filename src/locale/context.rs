//! Per-request snapshot consumed by the locale resolver.

use std::collections::HashMap;

use axum::http::{header, HeaderMap, Method, Request};

/// Everything the resolver reads from a request, detached from the body.
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub cookies: HashMap<String, String>,
    pub query_params: HashMap<String, String>,
    pub accept_language: Option<String>,
}

impl ResolutionContext {
    pub fn from_request<B>(req: &Request<B>) -> Self {
        let uri = req.uri();
        let query = uri.query().filter(|q| !q.is_empty()).map(str::to_string);

        Self {
            method: req.method().clone(),
            path: uri.path().to_string(),
            query_params: query.as_deref().map(parse_query).unwrap_or_default(),
            query,
            cookies: parse_cookies(req.headers()),
            accept_language: req
                .headers()
                .get(header::ACCEPT_LANGUAGE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        }
    }

    /// `?query` suffix for redirects, empty when the request had none.
    pub fn query_suffix(&self) -> String {
        match &self.query {
            Some(query) => format!("?{query}"),
            None => String::new(),
        }
    }
}

/// Parse every `Cookie` header into a name → value map. First value wins.
pub fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    for value in headers.get_all(header::COOKIE) {
        let Ok(value) = value.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                cookies
                    .entry(name.trim().to_string())
                    .or_insert_with(|| value.trim().trim_matches('"').to_string());
            }
        }
    }
    cookies
}

/// Decode a query string. First occurrence of a parameter wins.
pub fn parse_query(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
        params.entry(name.into_owned()).or_insert_with(|| value.into_owned());
    }
    params
}

/// Accept-Language entries in header order, with `;q=` parameters dropped.
pub fn accept_language_tags(header: &str) -> impl Iterator<Item = &str> {
    header
        .split(',')
        .map(|entry| entry.split(';').next().unwrap_or_default().trim())
        .filter(|tag| !tag.is_empty() && *tag != "*")
}

//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the prefix and locale resolvers from config
//! - Wrap the application router with the rewriting middleware
//! - Wire up ambient layers (tracing, request ID, timeout)
//! - Forward rewritten requests upstream, or echo them back
//!
//! # Layering
//! ```text
//! outer Router: SetRequestId → Trace → PropagateRequestId → Timeout
//!     → prefix_middleware   (strip subfolder prefix)
//!     → locale_middleware   (rewrite / redirect / persist)
//!     → inner Router        (route matching sees the rewritten path)
//!     → forward_handler | echo_handler
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{Request, State},
    http::{
        uri::{Authority, InvalidUri, PathAndQuery, Scheme},
        HeaderName, HeaderValue, Uri, Version,
    },
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::request::{request_id, MakeRequestUuid, X_REQUEST_ID};
use crate::http::response::bad_gateway;
use crate::lifecycle::shutdown_signal;
use crate::locale::{locale_middleware, LocaleResolver, LocaleSettings, LocaleSettingsError};
use crate::observability::metrics;
use crate::prefix::{prefix_middleware, PrefixResolver, PrefixSettings};
use crate::scope::RequestScope;

/// Translator locale of the request, for the upstream application.
pub const X_LOCALE: HeaderName = HeaderName::from_static("x-locale");

/// URI prefix stripped from the request, for the upstream application.
pub const X_FORWARDED_PREFIX: HeaderName = HeaderName::from_static("x-forwarded-prefix");

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid locale settings: {0}")]
    Locale(#[from] LocaleSettingsError),

    #[error("invalid upstream address {address:?}: {source}")]
    Upstream {
        address: String,
        #[source]
        source: InvalidUri,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: Client<HttpConnector, Body>,
    pub upstream: Option<Authority>,
}

/// HTTP front server for the upstream application.
pub struct HttpServer {
    app: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let app = build_app(&config)?;
        Ok(Self { app, config })
    }

    /// The fully layered application, e.g. for `tower::ServiceExt::oneshot`.
    pub fn app(&self) -> Router {
        self.app.clone()
    }

    /// Run the server until Ctrl+C, SIGTERM, or `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = ?self.config.upstream.address,
            "HTTP server starting"
        );

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Build resolvers and upstream client from `config` and layer the app.
pub fn build_app(config: &ProxyConfig) -> Result<Router, ServerError> {
    let locale = Arc::new(LocaleResolver::new(LocaleSettings::from_config(&config.locale)?));
    let prefix = Arc::new(PrefixResolver::new(PrefixSettings::from_config(&config.prefix)));

    let upstream = config
        .upstream
        .address
        .as_deref()
        .map(|address| {
            address.parse::<Authority>().map_err(|source| ServerError::Upstream {
                address: address.to_string(),
                source,
            })
        })
        .transpose()?;

    let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

    tracing::info!(
        locales = locale.settings().locales().len(),
        default_locale = %locale.settings().default_locale(),
        prefix_enabled = prefix.settings().enabled(),
        "Resolvers configured"
    );

    Ok(build_router(
        config,
        AppState { client, upstream },
        prefix,
        locale,
    ))
}

/// Layer the application router with rewriting and ambient middleware.
///
/// The rewriting middleware wraps the inner router instead of being added
/// with `Router::layer`, so route matching sees the rewritten path.
#[allow(deprecated)]
pub fn build_router(
    config: &ProxyConfig,
    state: AppState,
    prefix: Arc<PrefixResolver>,
    locale: Arc<LocaleResolver>,
) -> Router {
    let inner = Router::new()
        .route("/", any(app_handler))
        .route("/{*path}", any(app_handler))
        .with_state(state);

    let rewriting = ServiceBuilder::new()
        .layer(middleware::from_fn_with_state(prefix, prefix_middleware))
        .layer(middleware::from_fn_with_state(locale, locale_middleware))
        .service(inner);

    Router::new()
        .fallback_service(rewriting)
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
}

async fn app_handler(State(state): State<AppState>, request: Request) -> Response {
    match &state.upstream {
        Some(upstream) => forward_handler(&state.client, upstream, request).await,
        None => echo_handler(request),
    }
}

/// Describe the rewritten request instead of forwarding it.
fn echo_handler(request: Request) -> Response {
    let scope = request
        .extensions()
        .get::<RequestScope>()
        .cloned()
        .unwrap_or_default();

    Json(json!({
        "method": request.method().as_str(),
        "path": request.uri().path(),
        "query": request.uri().query(),
        "locale": scope.locale(),
        "uri_prefix": scope.uri_prefix(),
        "default_arguments": scope.default_arguments(),
        "aliases": scope.aliases(),
        "home": scope.url_for("/"),
    }))
    .into_response()
}

/// Send the rewritten request to the upstream application.
async fn forward_handler(
    client: &Client<HttpConnector, Body>,
    upstream: &Authority,
    request: Request,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&request).to_string();
    let scope = request
        .extensions()
        .get::<RequestScope>()
        .cloned()
        .unwrap_or_default();

    let (mut parts, body) = request.into_parts();
    let method = parts.method.clone();

    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = Some(upstream.clone());
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    parts.uri = match Uri::from_parts(uri_parts) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Failed to build upstream URI");
            return bad_gateway();
        }
    };
    parts.version = Version::HTTP_11;

    if let Some(locale) = scope.locale().and_then(|l| HeaderValue::from_str(l).ok()) {
        parts.headers.insert(X_LOCALE, locale);
    }
    if !scope.uri_prefix().is_empty() {
        if let Ok(prefix) = HeaderValue::from_str(scope.uri_prefix()) {
            parts.headers.insert(X_FORWARDED_PREFIX, prefix);
        }
    }

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        uri = %parts.uri,
        locale = ?scope.locale(),
        "Forwarding request"
    );

    match client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            metrics::record_request(method.as_str(), response.status().as_u16(), start_time);
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Upstream error");
            metrics::record_request(method.as_str(), 502, start_time);
            bad_gateway()
        }
    }
}

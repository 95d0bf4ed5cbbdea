//! Locale middleware.
//!
//! Applies a [`Resolution`] to the live request: rewrites the path, fills
//! the request scope, short-circuits with redirects, and persists the
//! locale on the way out. Redirect locations are resolver paths, so the
//! URI prefix registered upstream in the chain is put back in front.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::http::request::rewrite_path;
use crate::http::response::found;
use crate::locale::context::ResolutionContext;
use crate::locale::resolver::{apply_locale, clear_locale, LocaleResolver, Resolution, ResolvedLocale};
use crate::observability::metrics;
use crate::scope::{RequestScope, SessionHandle};

pub async fn locale_middleware(
    State(resolver): State<Arc<LocaleResolver>>,
    mut req: Request,
    next: Next,
) -> Response {
    let ctx = ResolutionContext::from_request(&req);

    match resolver.resolve(&ctx) {
        Resolution::Disabled => next.run(req).await,

        Resolution::Path { locale, redirect } => {
            tracing::debug!(locale = %locale.code, path = %ctx.path, "Locale found in URL");
            metrics::record_locale_resolution(locale.source.as_str());
            let scope = RequestScope::of(&mut req);
            apply_locale(scope, &locale);
            let prefix = scope.uri_prefix().to_string();

            let session = req.extensions().get::<SessionHandle>().cloned();
            let mut response = next.run(req).await;

            if let Some(location) = redirect {
                tracing::debug!(location = %location, "Redirecting default locale to bare path");
                metrics::record_redirect("default_locale");
                response = found(format!("{prefix}{location}"));
            }

            if resolver.settings().save_locale() {
                response = persist(&resolver, &locale, session.as_ref(), response);
            }
            response
        }

        Resolution::Ignored => {
            clear_locale(RequestScope::of(&mut req));
            next.run(req).await
        }

        Resolution::Default { path } => {
            clear_locale(RequestScope::of(&mut req));
            if let Err(e) = rewrite_path(&mut req, &path) {
                tracing::warn!(path = %path, error = %e, "Failed to rewrite path to default locale");
            }
            next.run(req).await
        }

        Resolution::Redirect { locale, location } => {
            metrics::record_locale_resolution(locale.source.as_str());
            let scope = RequestScope::of(&mut req);
            apply_locale(scope, &locale);
            let location = format!("{}{}", scope.uri_prefix(), location);
            tracing::debug!(
                locale = %locale.code,
                source = %locale.source,
                location = %location,
                "Redirecting to localized path"
            );
            metrics::record_redirect("localize");
            found(location)
        }

        Resolution::Forward { locale } => {
            metrics::record_locale_resolution(locale.source.as_str());
            apply_locale(RequestScope::of(&mut req), &locale);
            next.run(req).await
        }
    }
}

fn persist(
    resolver: &LocaleResolver,
    locale: &ResolvedLocale,
    session: Option<&SessionHandle>,
    response: Response,
) -> Response {
    if let Some(session) = session {
        session.set(resolver.settings().session_key(), &locale.code);
    }
    resolver.cookie(locale).attach(response)
}

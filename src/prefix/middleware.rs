//! Prefix middleware.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::http::request::{rewrite_path, ScriptName};
use crate::observability::metrics;
use crate::prefix::resolver::{apply_prefix, PrefixError, PrefixOutcome, PrefixResolver};
use crate::scope::RequestScope;

/// Strip the subfolder prefix before anything downstream sees the path.
pub async fn prefix_middleware(
    State(resolver): State<Arc<PrefixResolver>>,
    mut req: Request,
    next: Next,
) -> Result<Response, PrefixError> {
    let path = req.uri().path().to_string();
    let script_name = req.extensions().get::<ScriptName>().map(|s| s.0.clone());

    let outcome = resolver
        .resolve(&path, script_name.as_deref())
        .inspect_err(|e| {
            tracing::error!(path = %path, error = %e, "URI prefix configuration error");
            metrics::record_prefix_error(e.kind());
        })?;

    if let PrefixOutcome::Rewrite { prefix, path: rest } = outcome {
        match rewrite_path(&mut req, &rest) {
            Ok(()) => {
                let mode = if resolver.settings().prefix().is_some() { "explicit" } else { "auto" };
                tracing::debug!(prefix = %prefix, path = %rest, mode, "Stripped URI prefix");
                metrics::record_prefix_rewrite(mode);
                apply_prefix(RequestScope::of(&mut req), &prefix, resolver.settings().alias());
            }
            Err(e) => {
                tracing::warn!(prefix = %prefix, error = %e, "Failed to rewrite prefixed path");
            }
        }
    }

    Ok(next.run(req).await)
}

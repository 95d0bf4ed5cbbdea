//! URI subfolder prefix resolution.
//!
//! # Modes
//! - Explicit: the configured prefix must head every request path on a
//!   segment boundary; anything else is a configuration error.
//! - Auto: the prefix is the directory of the script path, applied only
//!   to requests below it.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::config::PrefixConfig;
use crate::scope::{AliasRegistry, UrlGenerator};

/// Fatal prefix configuration errors, raised while handling a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrefixError {
    #[error("invalid URI prefix {prefix:?}: must not end with '/'")]
    InvalidPrefix { prefix: String },

    #[error("URI prefix {prefix:?} does not match request path {path:?}")]
    PrefixMismatch { prefix: String, path: String },

    #[error("URI prefix {prefix:?} does not end on a path segment of {path:?}")]
    PrefixBoundary { prefix: String, path: String },
}

impl PrefixError {
    pub fn kind(&self) -> &'static str {
        match self {
            PrefixError::InvalidPrefix { .. } => "invalid_prefix",
            PrefixError::PrefixMismatch { .. } => "prefix_mismatch",
            PrefixError::PrefixBoundary { .. } => "prefix_boundary",
        }
    }
}

impl IntoResponse for PrefixError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixSettings {
    enabled: bool,
    prefix: Option<String>,
    alias: Option<String>,
    script_name: Option<String>,
}

impl PrefixSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &PrefixConfig) -> Self {
        Self::new()
            .with_enabled(config.enabled)
            .with_prefix(config.prefix.clone())
            .with_alias(config.alias.clone())
            .with_script_name(config.script_name.clone())
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Explicit prefix; `None` selects auto-detection.
    pub fn with_prefix(mut self, prefix: Option<String>) -> Self {
        self.prefix = prefix;
        self
    }

    /// Alias bound to `prefix + "/"` after a rewrite.
    pub fn with_alias(mut self, alias: Option<String>) -> Self {
        self.alias = alias;
        self
    }

    /// Script path used by auto mode when the request carries none.
    pub fn with_script_name(mut self, script_name: Option<String>) -> Self {
        self.script_name = script_name;
        self
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn script_name(&self) -> Option<&str> {
        self.script_name.as_deref()
    }
}

/// Successful prefix resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefixOutcome {
    /// No prefix applies; leave the request alone.
    Unchanged,
    /// Strip `prefix`; the request continues at `path`.
    Rewrite { prefix: String, path: String },
}

#[derive(Debug, Clone)]
pub struct PrefixResolver {
    settings: PrefixSettings,
}

impl PrefixResolver {
    pub fn new(settings: PrefixSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PrefixSettings {
        &self.settings
    }

    /// Resolve the prefix for `path`.
    ///
    /// `script_name` is the server-reported script path; it only matters in
    /// auto mode and falls back to the configured one.
    pub fn resolve(&self, path: &str, script_name: Option<&str>) -> Result<PrefixOutcome, PrefixError> {
        if !self.settings.enabled {
            return Ok(PrefixOutcome::Unchanged);
        }

        match self.settings.prefix() {
            Some(prefix) => Self::resolve_explicit(prefix, path),
            None => Ok(self.resolve_auto(path, script_name)),
        }
    }

    fn resolve_explicit(prefix: &str, path: &str) -> Result<PrefixOutcome, PrefixError> {
        if prefix.ends_with('/') {
            return Err(PrefixError::InvalidPrefix {
                prefix: prefix.to_string(),
            });
        }
        if !path.starts_with(prefix) {
            return Err(PrefixError::PrefixMismatch {
                prefix: prefix.to_string(),
                path: path.to_string(),
            });
        }
        if prefix.is_empty() {
            return Ok(PrefixOutcome::Unchanged);
        }

        match strip(prefix, path) {
            Some(rest) => Ok(PrefixOutcome::Rewrite {
                prefix: prefix.to_string(),
                path: rest,
            }),
            None => Err(PrefixError::PrefixBoundary {
                prefix: prefix.to_string(),
                path: path.to_string(),
            }),
        }
    }

    fn resolve_auto(&self, path: &str, script_name: Option<&str>) -> PrefixOutcome {
        let Some(script_name) = script_name.or(self.settings.script_name()) else {
            return PrefixOutcome::Unchanged;
        };
        let candidate = match script_name.rfind('/') {
            Some(idx) => &script_name[..idx],
            None => return PrefixOutcome::Unchanged,
        };

        if candidate.is_empty() || !path.starts_with(candidate) {
            return PrefixOutcome::Unchanged;
        }

        match strip(candidate, path) {
            Some(rest) => PrefixOutcome::Rewrite {
                prefix: candidate.to_string(),
                path: rest,
            },
            None => PrefixOutcome::Unchanged,
        }
    }
}

/// Remainder of `path` after `prefix`; `None` when it splits a segment.
fn strip(prefix: &str, path: &str) -> Option<String> {
    let rest = &path[prefix.len()..];
    if rest.is_empty() {
        return Some("/".to_string());
    }
    rest.starts_with('/').then(|| rest.to_string())
}

/// Register `prefix` with the URL generator and bind the alias, if any.
pub fn apply_prefix<S>(scope: &mut S, prefix: &str, alias: Option<&str>)
where
    S: UrlGenerator + AliasRegistry,
{
    scope.set_uri_prefix(prefix);
    if let Some(alias) = alias {
        scope.set_alias(alias, &format!("{prefix}/"));
    }
}

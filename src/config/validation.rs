//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check locale codes (non-empty, unique) and ignore globs
//! - Reject explicit prefixes that can never match
//! - Validate addresses and timeouts
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ProxyConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("locale code at position {index} is empty")]
    EmptyLocaleCode { index: usize },

    #[error("locale code {0:?} is configured more than once")]
    DuplicateLocaleCode(String),

    #[error("ignored path pattern {pattern:?} is invalid: {reason}")]
    InvalidIgnorePattern { pattern: String, reason: String },

    #[error("URI prefix {0:?} must not end with '/'")]
    PrefixTrailingSlash(String),

    #[error("invalid {field} address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}

pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for (index, entry) in config.locale.locales.iter().enumerate() {
        if entry.code.is_empty() {
            errors.push(ValidationError::EmptyLocaleCode { index });
        } else if !seen.insert(entry.code.to_ascii_lowercase()) {
            errors.push(ValidationError::DuplicateLocaleCode(entry.code.clone()));
        }
    }

    if !config.locale.locales.is_empty()
        && !config
            .locale
            .locales
            .iter()
            .any(|e| e.code == config.locale.default_locale || e.locale == config.locale.default_locale)
    {
        tracing::warn!(
            default_locale = %config.locale.default_locale,
            "Default locale is not among the configured locales"
        );
    }

    for pattern in &config.locale.ignored_paths {
        if let Err(e) = glob::Pattern::new(pattern) {
            errors.push(ValidationError::InvalidIgnorePattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            });
        }
    }

    if let Some(prefix) = &config.prefix.prefix {
        if config.prefix.enabled && prefix.ends_with('/') {
            errors.push(ValidationError::PrefixTrailingSlash(prefix.clone()));
        }
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener",
            value: config.listener.bind_address.clone(),
        });
    }

    if let Some(address) = &config.upstream.address {
        if address.parse::<axum::http::uri::Authority>().is_err() {
            errors.push(ValidationError::InvalidAddress {
                field: "upstream",
                value: address.clone(),
            });
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "metrics",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the locale proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Application the rewritten requests are forwarded to.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Locale resolution settings.
    pub locale: LocaleConfig,

    /// URI subfolder prefix settings.
    pub prefix: PrefixConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream application configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Upstream address (e.g., "127.0.0.1:3000").
    /// When unset, requests are answered by the built-in echo handler.
    pub address: Option<String>,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Locale resolution configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Locale assumed when none should appear in the visible path.
    pub default_locale: String,

    /// Configured locales. Order is path matching priority.
    pub locales: Vec<LocaleEntry>,

    /// Query parameter carrying a locale.
    pub query_param: String,

    /// Session key and cookie name for the persisted locale.
    pub session_key: String,

    /// Cookie `Max-Age` in seconds; session cookie when unset.
    pub cookie_max_age_secs: Option<u64>,

    /// Mark the locale cookie `Secure`.
    pub cookie_secure: bool,

    /// Read the cookie/query and persist path locales.
    pub save_locale: bool,

    /// Fall back to the Accept-Language header.
    pub detect_locale: bool,

    /// Glob patterns exempt from locale handling (e.g., "/api/*").
    pub ignored_paths: Vec<String>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            default_locale: "en".to_string(),
            locales: Vec::new(),
            query_param: "locale".to_string(),
            session_key: "locale".to_string(),
            cookie_max_age_secs: None,
            cookie_secure: false,
            save_locale: true,
            detect_locale: true,
            ignored_paths: Vec::new(),
        }
    }
}

/// A configured locale code and its canonical locale.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct LocaleEntry {
    /// Short code used in paths (e.g., "pt").
    pub code: String,

    /// Canonical locale (e.g., "pt-BR").
    pub locale: String,
}

/// URI subfolder prefix configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PrefixConfig {
    /// Enable prefix resolution.
    pub enabled: bool,

    /// Explicit prefix (e.g., "/app"); auto-detected when unset.
    pub prefix: Option<String>,

    /// Alias bound to the resolved prefix (e.g., "@web").
    pub alias: Option<String>,

    /// Script path used for auto-detection (e.g., "/app/index.php").
    pub script_name: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

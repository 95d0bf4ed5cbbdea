//! Immutable locale resolution settings.
//!
//! Settings are built once and never mutated in place: every `with_*`
//! method consumes the value and returns the updated copy. Derived state
//! (the compiled path pattern, the compiled ignore globs) is rebuilt by the
//! builder that changes its input, never per request.

use std::time::Duration;

use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::config::LocaleConfig;
use crate::locale::ignore::IgnoreList;
use crate::locale::tag::{LocaleMap, LocaleSpec};

/// Errors raised while building [`LocaleSettings`].
#[derive(Debug, Error)]
pub enum LocaleSettingsError {
    #[error("locale code must not be empty (canonical locale {canonical:?})")]
    EmptyCode { canonical: String },

    #[error("locale code {0:?} is configured more than once")]
    DuplicateCode(String),

    #[error("invalid ignored path pattern {pattern:?}: {source}")]
    InvalidIgnorePattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to compile locale path pattern: {0}")]
    PathPattern(#[from] regex::Error),
}

#[derive(Debug, Clone)]
pub struct LocaleSettings {
    default_locale: String,
    locales: LocaleMap,
    path_pattern: Option<Regex>,
    query_param: String,
    session_key: String,
    cookie_max_age: Option<Duration>,
    cookie_secure: bool,
    save_locale: bool,
    detect_locale: bool,
    ignored: IgnoreList,
}

impl Default for LocaleSettings {
    fn default() -> Self {
        Self {
            default_locale: "en".to_string(),
            locales: LocaleMap::default(),
            path_pattern: None,
            query_param: "locale".to_string(),
            session_key: "locale".to_string(),
            cookie_max_age: None,
            cookie_secure: false,
            save_locale: true,
            detect_locale: true,
            ignored: IgnoreList::default(),
        }
    }
}

impl LocaleSettings {
    /// Create settings with defaults and no locales.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build settings from the `[locale]` config section.
    pub fn from_config(config: &LocaleConfig) -> Result<Self, LocaleSettingsError> {
        let locales = config
            .locales
            .iter()
            .map(|entry| LocaleSpec::new(entry.code.clone(), entry.locale.clone()));

        Ok(Self::new()
            .with_default_locale(config.default_locale.clone())
            .with_locales(locales)?
            .with_query_param(config.query_param.clone())
            .with_session_key(config.session_key.clone())
            .with_cookie_max_age(config.cookie_max_age_secs.map(Duration::from_secs))
            .with_cookie_secure(config.cookie_secure)
            .with_save_locale(config.save_locale)
            .with_detect_locale(config.detect_locale)
            .with_ignored_paths(&config.ignored_paths)?)
    }

    /// Set the locale kept out of visible paths.
    pub fn with_default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = locale.into();
        self
    }

    /// Replace the locale map and recompile the path pattern.
    pub fn with_locales<I>(mut self, locales: I) -> Result<Self, LocaleSettingsError>
    where
        I: IntoIterator<Item = LocaleSpec>,
    {
        let mut map: Vec<LocaleSpec> = Vec::new();
        for spec in locales {
            if spec.code.is_empty() {
                return Err(LocaleSettingsError::EmptyCode {
                    canonical: spec.canonical,
                });
            }
            if map.iter().any(|s| s.code.eq_ignore_ascii_case(&spec.code)) {
                return Err(LocaleSettingsError::DuplicateCode(spec.code));
            }
            map.push(spec);
        }

        self.locales = LocaleMap::new(map);
        self.path_pattern = compile_path_pattern(&self.locales)?;
        Ok(self)
    }

    /// Set the query parameter read for a locale.
    pub fn with_query_param(mut self, name: impl Into<String>) -> Self {
        self.query_param = name.into();
        self
    }

    /// Set the session key, also used as the cookie name.
    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.session_key = key.into();
        self
    }

    /// Set the cookie `Max-Age`; `None` keeps a session cookie.
    pub fn with_cookie_max_age(mut self, max_age: Option<Duration>) -> Self {
        self.cookie_max_age = max_age;
        self
    }

    /// Mark the locale cookie `Secure`.
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    /// Toggle the cookie and query sources and persistence.
    pub fn with_save_locale(mut self, enabled: bool) -> Self {
        self.save_locale = enabled;
        self
    }

    /// Toggle the Accept-Language source.
    pub fn with_detect_locale(mut self, enabled: bool) -> Self {
        self.detect_locale = enabled;
        self
    }

    /// Replace the ignored path globs.
    pub fn with_ignored_paths<I, S>(mut self, patterns: I) -> Result<Self, LocaleSettingsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ignored = IgnoreList::compile(patterns).map_err(|(pattern, source)| {
            LocaleSettingsError::InvalidIgnorePattern { pattern, source }
        })?;
        Ok(self)
    }

    /// Get the default locale code.
    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Get the configured locales in matching order.
    pub fn locales(&self) -> &LocaleMap {
        &self.locales
    }

    /// Anchored, case-insensitive `/<code>` matcher; `None` without locales.
    pub fn path_pattern(&self) -> Option<&Regex> {
        self.path_pattern.as_ref()
    }

    /// Get the locale query parameter name.
    pub fn query_param(&self) -> &str {
        &self.query_param
    }

    /// Get the session key and cookie name.
    pub fn session_key(&self) -> &str {
        &self.session_key
    }

    /// Get the cookie `Max-Age`.
    pub fn cookie_max_age(&self) -> Option<Duration> {
        self.cookie_max_age
    }

    /// Whether the cookie is marked `Secure`.
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    /// Whether locales are read from and saved to the cookie.
    pub fn save_locale(&self) -> bool {
        self.save_locale
    }

    /// Whether Accept-Language is consulted.
    pub fn detect_locale(&self) -> bool {
        self.detect_locale
    }

    /// Whether `path` matches an ignored glob.
    pub fn is_ignored(&self, path: &str) -> bool {
        self.ignored.matches(path)
    }
}

fn compile_path_pattern(locales: &LocaleMap) -> Result<Option<Regex>, regex::Error> {
    if locales.is_empty() {
        return Ok(None);
    }

    let alternation = locales
        .iter()
        .map(|spec| regex::escape(&spec.code))
        .collect::<Vec<_>>()
        .join("|");

    RegexBuilder::new(&format!("^/({alternation})(?:/|$)"))
        .case_insensitive(true)
        .build()
        .map(Some)
}

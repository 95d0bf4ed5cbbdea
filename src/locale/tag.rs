//! Locale codes and their parsed form.
//!
//! # Responsibilities
//! - Hold the ordered code → canonical locale map
//! - Split raw locale strings into language and region
//! - Map loose candidates (cookie, query, header values) onto configured codes
//!
//! # Design Decisions
//! - Insertion order is matching priority; lookups are linear (maps are tiny)
//! - Code comparison is ASCII case-insensitive, like the path match

use std::fmt;

/// A configured short code and the canonical locale it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSpec {
    pub code: String,
    pub canonical: String,
}

impl LocaleSpec {
    pub fn new(code: impl Into<String>, canonical: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            canonical: canonical.into(),
        }
    }
}

/// Ordered collection of configured locales.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleMap {
    entries: Vec<LocaleSpec>,
}

impl LocaleMap {
    pub fn new(entries: Vec<LocaleSpec>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocaleSpec> {
        self.entries.iter()
    }

    /// Configured entry whose code equals `code`, ignoring ASCII case.
    pub fn get(&self, code: &str) -> Option<&LocaleSpec> {
        self.entries
            .iter()
            .find(|spec| spec.code.eq_ignore_ascii_case(code))
    }

    /// Canonical locale for an alias code.
    pub fn canonical(&self, code: &str) -> Option<&str> {
        self.get(code).map(|spec| spec.canonical.as_str())
    }

    /// Map a loosely formatted candidate onto a configured code.
    ///
    /// Tries, in order: the code itself, a canonical value (`_` and `-`
    /// are treated alike), then the candidate's primary language as a code.
    pub fn find(&self, candidate: &str) -> Option<&LocaleSpec> {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return None;
        }

        if let Some(spec) = self.get(candidate) {
            return Some(spec);
        }

        let normalized = candidate.replace('_', "-");
        if let Some(spec) = self
            .entries
            .iter()
            .find(|spec| spec.canonical.replace('_', "-").eq_ignore_ascii_case(&normalized))
        {
            return Some(spec);
        }

        let primary = normalized.split('-').next().unwrap_or_default();
        if primary.is_empty() || primary.len() == normalized.len() {
            return None;
        }
        self.get(primary)
    }
}

impl FromIterator<LocaleSpec> for LocaleMap {
    fn from_iter<I: IntoIterator<Item = LocaleSpec>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Language with an optional region, e.g. `pt` + `BR`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLocale {
    pub language: String,
    pub region: Option<String>,
}

impl ParsedLocale {
    /// Split a raw locale on `-`, then `_`, then fall back to the alias map.
    pub fn parse(raw: &str, locales: &LocaleMap) -> Self {
        if let Some(parsed) = Self::split(raw, '-') {
            return parsed;
        }
        if let Some(parsed) = Self::split(raw, '_') {
            return parsed;
        }
        if let Some(parsed) = locales
            .canonical(raw)
            .and_then(|canonical| Self::split(canonical, '-'))
        {
            return parsed;
        }

        Self {
            language: raw.to_string(),
            region: None,
        }
    }

    fn split(raw: &str, separator: char) -> Option<Self> {
        let mut parts = raw.split(separator);
        let language = parts.next()?;
        let region = parts.next()?;

        Some(Self {
            language: language.to_string(),
            region: (!region.is_empty()).then(|| region.to_string()),
        })
    }

    /// True when `code` or the `language-region` pair names `default_locale`.
    pub fn is_default(&self, code: &str, default_locale: &str) -> bool {
        if code == default_locale {
            return true;
        }
        match &self.region {
            Some(region) => format!("{}-{}", self.language, region) == default_locale,
            None => false,
        }
    }
}

impl fmt::Display for ParsedLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}-{}", self.language, region),
            None => write!(f, "{}", self.language),
        }
    }
}

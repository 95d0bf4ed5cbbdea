//! Ignored-path globs.
//!
//! Patterns use shell-style `*` and `?` wildcards and are case-sensitive.
//! `*` also matches `/`, so `/api/*` covers every path below `/api/`.

use glob::{MatchOptions, Pattern, PatternError};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Compiled list of ignored-path patterns.
#[derive(Debug, Clone, Default)]
pub struct IgnoreList {
    patterns: Vec<Pattern>,
}

impl IgnoreList {
    /// Compile every pattern; fails on the first invalid one.
    pub fn compile<I, S>(patterns: I) -> Result<Self, (String, PatternError)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|raw| {
                let raw = raw.as_ref();
                Pattern::new(raw).map_err(|e| (raw.to_string(), e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Returns true if any pattern matches the whole path.
    pub fn matches(&self, path: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches_with(path, MATCH_OPTIONS))
    }
}

//! Locale decision engine.
//!
//! # Resolution Order
//! ```text
//! no locales configured            → Disabled
//! path starts with /<code>         → Path      (handler runs; GET on default locale redirects after)
//! cookie → query   (save enabled)  ┐
//! Accept-Language  (detect enabled)┘→ candidate
//! ignored path                     → Ignored   (unchanged)
//! no candidate / default candidate → Default   (internal /<default> rewrite)
//! other candidate, GET             → Redirect  (handler skipped)
//! other candidate, non-GET         → Forward
//! ```
//!
//! The resolver is pure: it reads a [`ResolutionContext`] and returns a
//! [`Resolution`]. Applying it to a live request is the middleware's job.

use std::fmt;

use axum::http::Method;

use crate::locale::context::{accept_language_tags, ResolutionContext};
use crate::locale::cookie::LocaleCookie;
use crate::locale::settings::LocaleSettings;
use crate::locale::tag::{LocaleSpec, ParsedLocale};
use crate::scope::{Translator, UrlGenerator, LOCALE_ARGUMENT};

/// Where a locale was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleSource {
    Path,
    Cookie,
    Query,
    Header,
}

impl LocaleSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocaleSource::Path => "path",
            LocaleSource::Cookie => "cookie",
            LocaleSource::Query => "query",
            LocaleSource::Header => "header",
        }
    }
}

impl fmt::Display for LocaleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configured locale chosen for this request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocale {
    /// Configured code, as written in the settings.
    pub code: String,
    pub parsed: ParsedLocale,
    pub source: LocaleSource,
}

/// What the middleware must do with the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No locales configured; pass through untouched.
    Disabled,
    /// Locale taken from the path. `redirect` is set when the response
    /// must be replaced by a redirect to the path without the locale.
    Path {
        locale: ResolvedLocale,
        redirect: Option<String>,
    },
    /// Path is exempt from locale handling.
    Ignored,
    /// Continue internally under the default locale at `path`.
    Default { path: String },
    /// Redirect to `location` without calling the handler.
    Redirect {
        locale: ResolvedLocale,
        location: String,
    },
    /// Non-default locale on a non-GET request; continue without redirect.
    Forward { locale: ResolvedLocale },
}

#[derive(Debug, Clone)]
pub struct LocaleResolver {
    settings: LocaleSettings,
}

impl LocaleResolver {
    /// Create a resolver over fixed settings.
    pub fn new(settings: LocaleSettings) -> Self {
        Self { settings }
    }

    /// Get the resolver settings.
    pub fn settings(&self) -> &LocaleSettings {
        &self.settings
    }

    /// Decide what to do with the request described by `ctx`.
    pub fn resolve(&self, ctx: &ResolutionContext) -> Resolution {
        if self.settings.locales().is_empty() {
            return Resolution::Disabled;
        }

        if let Some((locale, stripped)) = self.match_path(&ctx.path) {
            let redirect = (ctx.method == Method::GET && self.is_default(&locale))
                .then(|| format!("{}{}", stripped, ctx.query_suffix()));
            return Resolution::Path { locale, redirect };
        }

        let candidate = self.secondary_locale(ctx);

        if self.settings.is_ignored(&ctx.path) {
            return Resolution::Ignored;
        }

        match candidate {
            Some(locale) if !self.is_default(&locale) => {
                if ctx.method == Method::GET {
                    let location = format!("/{}{}{}", locale.code, ctx.path, ctx.query_suffix());
                    Resolution::Redirect { locale, location }
                } else {
                    Resolution::Forward { locale }
                }
            }
            _ => Resolution::Default {
                path: format!("/{}{}", self.settings.default_locale(), ctx.path),
            },
        }
    }

    /// Locale at the head of `path` and the path with it removed.
    fn match_path(&self, path: &str) -> Option<(ResolvedLocale, String)> {
        let captures = self.settings.path_pattern()?.captures(path)?;
        let matched = captures.get(1)?;
        let spec = self.settings.locales().get(matched.as_str())?;

        let rest = &path[matched.end()..];
        let stripped = if rest.is_empty() { "/" } else { rest };

        Some((self.resolved(spec, LocaleSource::Path), stripped.to_string()))
    }

    /// Cookie, then query (save enabled), then Accept-Language (detect enabled).
    fn secondary_locale(&self, ctx: &ResolutionContext) -> Option<ResolvedLocale> {
        let locales = self.settings.locales();

        if self.settings.save_locale() {
            let key = self.settings.session_key();
            if let Some(spec) = ctx.cookies.get(key).and_then(|v| locales.find(v)) {
                tracing::debug!(locale = %spec.code, "Locale found in cookie");
                return Some(self.resolved(spec, LocaleSource::Cookie));
            }

            let param = self.settings.query_param();
            if let Some(spec) = ctx.query_params.get(param).and_then(|v| locales.find(v)) {
                tracing::debug!(locale = %spec.code, "Locale found in query string");
                return Some(self.resolved(spec, LocaleSource::Query));
            }
        }

        if self.settings.detect_locale() {
            let header = ctx.accept_language.as_deref()?;
            if let Some(spec) = accept_language_tags(header).find_map(|tag| locales.find(tag)) {
                tracing::debug!(locale = %spec.code, "Locale found in Accept-Language");
                return Some(self.resolved(spec, LocaleSource::Header));
            }
        }

        None
    }

    fn resolved(&self, spec: &LocaleSpec, source: LocaleSource) -> ResolvedLocale {
        ResolvedLocale {
            code: spec.code.clone(),
            parsed: ParsedLocale::parse(&spec.code, self.settings.locales()),
            source,
        }
    }

    /// Whether `locale` is the configured default, region ignored.
    pub fn is_default(&self, locale: &ResolvedLocale) -> bool {
        locale
            .parsed
            .is_default(&locale.code, self.settings.default_locale())
    }

    /// Persistence cookie for `locale` under the session key.
    pub fn cookie(&self, locale: &ResolvedLocale) -> LocaleCookie {
        LocaleCookie::new(self.settings.session_key(), locale.code.clone())
            .secure(self.settings.cookie_secure())
            .max_age(self.settings.cookie_max_age())
    }
}

/// Point the translator and URL generator at `locale`.
pub fn apply_locale<S>(scope: &mut S, locale: &ResolvedLocale)
where
    S: Translator + UrlGenerator,
{
    scope.set_locale(&locale.parsed.to_string());
    scope.set_default_argument(LOCALE_ARGUMENT, Some(&locale.code));
}

/// Drop the locale argument so generated links carry no locale segment.
pub fn clear_locale<S: UrlGenerator>(scope: &mut S) {
    scope.set_default_argument(LOCALE_ARGUMENT, None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::RequestScope;
    use axum::body::Body;
    use axum::http::Request;

    fn settings() -> LocaleSettings {
        LocaleSettings::new()
            .with_default_locale("en")
            .with_locales(vec![
                LocaleSpec::new("en", "en-US"),
                LocaleSpec::new("pt", "pt-BR"),
                LocaleSpec::new("de", "de-DE"),
            ])
            .unwrap()
            .with_ignored_paths(["/api/*"])
            .unwrap()
    }

    fn ctx(method: Method, uri: &str, headers: &[(&str, &str)]) -> ResolutionContext {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        ResolutionContext::from_request(&builder.body(Body::empty()).unwrap())
    }

    fn resolve(settings: LocaleSettings, method: Method, uri: &str, headers: &[(&str, &str)]) -> Resolution {
        LocaleResolver::new(settings).resolve(&ctx(method, uri, headers))
    }

    #[test]
    fn test_disabled_without_locales() {
        let resolution = resolve(LocaleSettings::new(), Method::GET, "/pt/users", &[]);
        assert_eq!(resolution, Resolution::Disabled);
    }

    #[test]
    fn test_every_configured_code_matches_path() {
        for code in ["en", "pt", "de"] {
            let uri = format!("/{code}/rest");
            match resolve(settings(), Method::POST, &uri, &[]) {
                Resolution::Path { locale, redirect } => {
                    assert_eq!(locale.code, code);
                    assert_eq!(locale.source, LocaleSource::Path);
                    assert_eq!(redirect, None);
                }
                other => panic!("expected path match for {code}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_path_match_non_default_does_not_redirect() {
        match resolve(settings(), Method::GET, "/PT/users", &[]) {
            Resolution::Path { locale, redirect } => {
                assert_eq!(locale.code, "pt");
                assert_eq!(locale.parsed.to_string(), "pt-BR");
                assert_eq!(redirect, None);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_path_match_default_get_redirects_to_stripped_path() {
        match resolve(settings(), Method::GET, "/en/users?page=2", &[]) {
            Resolution::Path { redirect, .. } => {
                assert_eq!(redirect.as_deref(), Some("/users?page=2"));
            }
            other => panic!("unexpected {other:?}"),
        }

        match resolve(settings(), Method::GET, "/en", &[]) {
            Resolution::Path { redirect, .. } => assert_eq!(redirect.as_deref(), Some("/")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_default_by_region_combination() {
        let settings = settings().with_default_locale("en-US");
        match resolve(settings, Method::GET, "/en/users", &[]) {
            Resolution::Path { redirect, .. } => assert_eq!(redirect.as_deref(), Some("/users")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_no_locale_rewrites_under_default() {
        let resolution = resolve(settings(), Method::GET, "/users", &[]);
        assert_eq!(resolution, Resolution::Default { path: "/en/users".into() });
    }

    #[test]
    fn test_default_locale_from_cookie_rewrites_without_redirect() {
        let resolution = resolve(settings(), Method::GET, "/users", &[("cookie", "locale=en")]);
        assert_eq!(resolution, Resolution::Default { path: "/en/users".into() });
    }

    #[test]
    fn test_cookie_beats_query() {
        let resolution = resolve(
            settings(),
            Method::GET,
            "/users?locale=de",
            &[("cookie", "locale=pt")],
        );
        match resolution {
            Resolution::Redirect { locale, location } => {
                assert_eq!(locale.code, "pt");
                assert_eq!(locale.source, LocaleSource::Cookie);
                assert_eq!(location, "/pt/users?locale=de");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_query_used_when_no_cookie() {
        match resolve(settings(), Method::GET, "/users?locale=de", &[]) {
            Resolution::Redirect { locale, .. } => assert_eq!(locale.source, LocaleSource::Query),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_post_with_cookie_locale_forwards() {
        let resolution = resolve(settings(), Method::POST, "/users", &[("cookie", "locale=pt")]);
        match resolution {
            Resolution::Forward { locale } => assert_eq!(locale.code, "pt"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_save_disabled_skips_cookie_and_query() {
        let settings = settings().with_save_locale(false);
        let resolution = resolve(
            settings,
            Method::GET,
            "/users?locale=de",
            &[("cookie", "locale=pt"), ("accept-language", "de-DE,de;q=0.9")],
        );
        match resolution {
            Resolution::Redirect { locale, location } => {
                assert_eq!(locale.source, LocaleSource::Header);
                assert_eq!(location, "/de/users?locale=de");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_detect_disabled_ignores_header() {
        let settings = settings().with_detect_locale(false);
        let resolution = resolve(settings, Method::GET, "/users", &[("accept-language", "pt-BR")]);
        assert_eq!(resolution, Resolution::Default { path: "/en/users".into() });
    }

    #[test]
    fn test_unknown_candidates_fall_through() {
        let resolution = resolve(
            settings(),
            Method::GET,
            "/users?locale=fr",
            &[("cookie", "locale=xx"), ("accept-language", "fr-FR, pt;q=0.5")],
        );
        match resolution {
            Resolution::Redirect { locale, .. } => {
                assert_eq!(locale.code, "pt");
                assert_eq!(locale.source, LocaleSource::Header);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_ignored_path_is_untouched() {
        let resolution = resolve(settings(), Method::GET, "/api/users", &[("cookie", "locale=pt")]);
        assert_eq!(resolution, Resolution::Ignored);

        let resolution = resolve(settings(), Method::GET, "/api/users", &[]);
        assert_eq!(resolution, Resolution::Ignored);
    }

    #[test]
    fn test_redirect_target_resolves_without_redirect() {
        let cookie = [("cookie", "locale=pt")];
        let location = match resolve(settings(), Method::GET, "/users?page=2", &cookie) {
            Resolution::Redirect { location, .. } => location,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(location, "/pt/users?page=2");

        // Following the redirect with the same cookie must not bounce again.
        match resolve(settings(), Method::GET, &location, &cookie) {
            Resolution::Path { locale, redirect } => {
                assert_eq!(locale.code, "pt");
                assert_eq!(redirect, None);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_forwarded_request_stays_forwarded() {
        let cookie = [("cookie", "locale=pt")];
        let first = resolve(settings(), Method::POST, "/users", &cookie);
        assert!(matches!(&first, Resolution::Forward { locale } if locale.code == "pt"));

        // The path was left as is; resolving it again changes nothing.
        let second = resolve(settings(), Method::POST, "/users", &cookie);
        assert!(matches!(second, Resolution::Forward { .. }));

        // The same path with the locale in front passes straight through.
        let third = resolve(settings(), Method::POST, "/pt/users", &cookie);
        assert!(matches!(third, Resolution::Path { redirect: None, .. }));
    }

    #[test]
    fn test_cookie_uses_settings() {
        let resolver = LocaleResolver::new(
            settings()
                .with_session_key("lang")
                .with_cookie_secure(true)
                .with_cookie_max_age(Some(std::time::Duration::from_secs(60))),
        );
        let locale = ResolvedLocale {
            code: "pt".into(),
            parsed: ParsedLocale::parse("pt", resolver.settings().locales()),
            source: LocaleSource::Path,
        };
        assert_eq!(
            resolver.cookie(&locale).header_value(),
            "lang=pt; Path=/; Max-Age=60; Secure"
        );
    }

    #[test]
    fn test_apply_and_clear_locale() {
        let resolver = LocaleResolver::new(settings());
        let locale = ResolvedLocale {
            code: "pt".into(),
            parsed: ParsedLocale::parse("pt", resolver.settings().locales()),
            source: LocaleSource::Cookie,
        };

        let mut scope = RequestScope::default();
        apply_locale(&mut scope, &locale);
        assert_eq!(scope.locale(), Some("pt-BR"));
        assert_eq!(scope.default_argument(LOCALE_ARGUMENT), Some("pt"));

        clear_locale(&mut scope);
        assert_eq!(scope.default_argument(LOCALE_ARGUMENT), None);
    }
}

//! Request-scoped collaborator state.
//!
//! The translator locale, URL generator arguments and path aliases live in
//! a [`RequestScope`] stored in the request's extensions. Each request owns
//! its scope, so concurrent requests never observe each other's locale.

use std::collections::BTreeMap;

use axum::http::Request;
use serde::Serialize;

/// Name of the URL generator argument carrying the locale.
pub const LOCALE_ARGUMENT: &str = "locale";

/// Receives the active locale for message lookup.
pub trait Translator {
    fn set_locale(&mut self, locale: &str);
}

/// Builds outgoing links.
pub trait UrlGenerator {
    /// Set or clear (`None`) an argument applied to every generated link.
    fn set_default_argument(&mut self, name: &str, value: Option<&str>);

    /// Prefix prepended to every generated link.
    fn set_uri_prefix(&mut self, prefix: &str);
}

/// Named path bindings.
pub trait AliasRegistry {
    fn set_alias(&mut self, name: &str, value: &str);
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestScope {
    locale: Option<String>,
    default_arguments: BTreeMap<String, String>,
    uri_prefix: String,
    aliases: BTreeMap<String, String>,
}

impl RequestScope {
    /// Scope attached to `req`, inserting an empty one if missing.
    pub fn of<B>(req: &mut Request<B>) -> &mut RequestScope {
        req.extensions_mut().get_or_insert_default::<RequestScope>()
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    pub fn default_argument(&self, name: &str) -> Option<&str> {
        self.default_arguments.get(name).map(String::as_str)
    }

    pub fn default_arguments(&self) -> &BTreeMap<String, String> {
        &self.default_arguments
    }

    pub fn uri_prefix(&self) -> &str {
        &self.uri_prefix
    }

    pub fn alias(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }

    /// Link for `path` under the current prefix and locale argument.
    pub fn url_for(&self, path: &str) -> String {
        let mut url = self.uri_prefix.clone();
        if let Some(locale) = self.default_argument(LOCALE_ARGUMENT) {
            url.push('/');
            url.push_str(locale);
        }
        if !path.starts_with('/') {
            url.push('/');
        }
        url.push_str(path);
        url
    }
}

impl Translator for RequestScope {
    fn set_locale(&mut self, locale: &str) {
        self.locale = Some(locale.to_string());
    }
}

impl UrlGenerator for RequestScope {
    fn set_default_argument(&mut self, name: &str, value: Option<&str>) {
        match value {
            Some(value) => {
                self.default_arguments.insert(name.to_string(), value.to_string());
            }
            None => {
                self.default_arguments.remove(name);
            }
        }
    }

    fn set_uri_prefix(&mut self, prefix: &str) {
        self.uri_prefix = prefix.to_string();
    }
}

impl AliasRegistry for RequestScope {
    fn set_alias(&mut self, name: &str, value: &str) {
        self.aliases.insert(name.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_of_inserts_once() {
        let mut req = Request::builder().uri("/").body(Body::empty()).unwrap();
        RequestScope::of(&mut req).set_locale("pt-BR");
        RequestScope::of(&mut req).set_uri_prefix("/app");

        let scope = req.extensions().get::<RequestScope>().unwrap();
        assert_eq!(scope.locale(), Some("pt-BR"));
        assert_eq!(scope.uri_prefix(), "/app");
    }

    #[test]
    fn test_default_argument_set_and_clear() {
        let mut scope = RequestScope::default();
        scope.set_default_argument(LOCALE_ARGUMENT, Some("pt"));
        assert_eq!(scope.default_argument(LOCALE_ARGUMENT), Some("pt"));

        scope.set_default_argument(LOCALE_ARGUMENT, None);
        assert_eq!(scope.default_argument(LOCALE_ARGUMENT), None);
    }

    #[test]
    fn test_url_for() {
        let mut scope = RequestScope::default();
        assert_eq!(scope.url_for("/users"), "/users");

        scope.set_uri_prefix("/app");
        scope.set_default_argument(LOCALE_ARGUMENT, Some("pt"));
        assert_eq!(scope.url_for("/users"), "/app/pt/users");
        assert_eq!(scope.url_for("users"), "/app/pt/users");
    }

    #[test]
    fn test_alias() {
        let mut scope = RequestScope::default();
        scope.set_alias("@web", "/app/");
        assert_eq!(scope.alias("@web"), Some("/app/"));
        assert_eq!(scope.alias("@other"), None);
    }
}

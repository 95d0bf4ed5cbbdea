//! Locale-aware front proxy library.
//!
//! Resolves the URI subfolder prefix and the request locale, rewrites or
//! redirects the request accordingly, and hands it to the application.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod locale;
pub mod observability;
pub mod prefix;
pub mod scope;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use locale::{LocaleResolver, LocaleSettings};
pub use prefix::{PrefixResolver, PrefixSettings};
pub use scope::RequestScope;

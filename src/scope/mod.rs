//! Request-scoped collaborators.
//!
//! # Data Flow
//! ```text
//! prefix middleware  → RequestScope::set_uri_prefix, set_alias
//! locale middleware  → RequestScope::set_locale, set_default_argument
//!                    → SessionHandle::set (when a session layer provided one)
//! handler / upstream → reads RequestScope from request extensions
//! ```

pub mod request;
pub mod session;

pub use request::{AliasRegistry, RequestScope, Translator, UrlGenerator, LOCALE_ARGUMENT};
pub use session::{MemorySessionStore, SessionHandle, SessionStore};

//! Locale resolution subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request
//!     → context.rs (snapshot path, query, cookies, Accept-Language)
//!     → resolver.rs (decide: path / cookie / query / header / default)
//!     → middleware.rs (rewrite, redirect, or pass through)
//!     → cookie.rs (persist the locale on the way out)
//!
//! Settings Compilation (at startup):
//!     LocaleConfig
//!     → settings.rs (validate codes, compile path pattern and ignore globs)
//!     → Freeze as immutable LocaleResolver
//! ```

pub mod context;
pub mod cookie;
pub mod ignore;
pub mod middleware;
pub mod resolver;
pub mod settings;
pub mod tag;

pub use context::ResolutionContext;
pub use cookie::LocaleCookie;
pub use middleware::locale_middleware;
pub use resolver::{LocaleResolver, LocaleSource, Resolution, ResolvedLocale};
pub use settings::{LocaleSettings, LocaleSettingsError};
pub use tag::{LocaleMap, LocaleSpec, ParsedLocale};

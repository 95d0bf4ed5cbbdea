//! URI subfolder prefix subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, ScriptName extension)
//!     → resolver.rs (explicit or auto prefix; configuration errors)
//!     → middleware.rs (strip prefix, register it in the RequestScope)
//!     → locale middleware
//! ```

pub mod middleware;
pub mod resolver;

pub use middleware::prefix_middleware;
pub use resolver::{PrefixError, PrefixOutcome, PrefixResolver, PrefixSettings};

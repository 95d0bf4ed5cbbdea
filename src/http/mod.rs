//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, ambient layers)
//!     → request.rs (request ID, path rewrites)
//!     → [prefix + locale middleware rewrite or redirect]
//!     → server.rs (forward upstream or echo)
//!     → response.rs (redirects, gateway errors)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{rewrite_path, ScriptName, X_REQUEST_ID};
pub use server::{build_app, HttpServer, ServerError};

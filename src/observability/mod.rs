//! Observability: log setup and the counters emitted by the resolvers.
//!
//! ```text
//! prefix middleware  → prefix_rewrites_total, prefix_errors_total
//! locale middleware  → locale_resolutions_total, locale_redirects_total
//! forward handler    → proxy_requests_total, proxy_request_duration_seconds
//! ```
//!
//! Every event carries the request ID set by the outer router, so a
//! redirect or rewrite can be followed into the upstream's own logs.

pub mod logging;
pub mod metrics;

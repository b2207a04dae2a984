//! # Middleware Stack
//!
//! Tower middleware for the API layer:
//! - [`metrics`]: Prometheus request metrics and domain gauges.
//!
//! Request tracing uses `tower_http::trace::TraceLayer`, installed in
//! `app()`.

pub mod metrics;

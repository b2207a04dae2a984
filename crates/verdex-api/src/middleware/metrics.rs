//! # Prometheus Metrics
//!
//! HTTP-level metrics (request counts, latency, errors) are recorded in
//! middleware. Domain-level gauges (catalog sizes, readiness, feedback
//! entries) are updated on each `/metrics` scrape (pull model) — see the
//! metrics handler in `lib.rs`.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use prometheus::core::Collector;
use prometheus::{Encoder, Gauge, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

/// Shared metrics state backed by a Prometheus registry.
#[derive(Clone)]
pub struct ApiMetrics {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Registry,

    // -- HTTP middleware metrics (push model) --
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    http_errors_total: IntCounterVec,

    // -- Domain gauges (pull model, updated on /metrics scrape) --
    catalog_laws: Gauge,
    catalog_features: Gauge,
    catalog_ready: Gauge,
    feedback_entries: Gauge,
}

impl std::fmt::Debug for ApiMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiMetrics")
            .field("requests", &self.requests())
            .field("errors", &self.errors())
            .finish()
    }
}

impl ApiMetrics {
    /// Create a metrics instance with a fresh Prometheus registry.
    pub fn new() -> Self {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("verdex_http_requests_total", "Total HTTP requests"),
            &["method", "path", "status"],
        )
        .expect("metric can be created");

        let http_request_duration_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "verdex_http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "path"],
        )
        .expect("metric can be created");

        let http_errors_total = IntCounterVec::new(
            Opts::new(
                "verdex_http_errors_total",
                "Total HTTP errors (4xx and 5xx)",
            ),
            &["method", "path", "status"],
        )
        .expect("metric can be created");

        let catalog_laws = Gauge::new("verdex_catalog_laws", "Laws loaded in the catalog")
            .expect("metric can be created");

        let catalog_features =
            Gauge::new("verdex_catalog_features", "Features loaded in the catalog")
                .expect("metric can be created");

        let catalog_ready = Gauge::new(
            "verdex_catalog_ready",
            "Whether both catalog tables loaded (1=ready, 0=loading)",
        )
        .expect("metric can be created");

        let feedback_entries = Gauge::new(
            "verdex_feedback_entries",
            "Feedback submissions on record",
        )
        .expect("metric can be created");

        registry
            .register(Box::new(http_requests_total.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(http_request_duration_seconds.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(http_errors_total.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(catalog_laws.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(catalog_features.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(catalog_ready.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(feedback_entries.clone()))
            .expect("metric can be registered");

        Self {
            inner: Arc::new(Inner {
                registry,
                http_requests_total,
                http_request_duration_seconds,
                http_errors_total,
                catalog_laws,
                catalog_features,
                catalog_ready,
                feedback_entries,
            }),
        }
    }

    /// Current total request count (sum across all labels).
    pub fn requests(&self) -> u64 {
        let mut total = 0u64;
        for family in &self.inner.http_requests_total.collect() {
            for metric in family.get_metric() {
                total += metric.get_counter().get_value() as u64;
            }
        }
        total
    }

    /// Current total error count (sum across all labels).
    pub fn errors(&self) -> u64 {
        let mut total = 0u64;
        for family in &self.inner.http_errors_total.collect() {
            for metric in family.get_metric() {
                total += metric.get_counter().get_value() as u64;
            }
        }
        total
    }

    /// Record an HTTP request (called by the middleware).
    fn record_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.inner
            .http_requests_total
            .with_label_values(&[method, path, &status_str])
            .inc();

        self.inner
            .http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);

        if status >= 400 {
            self.inner
                .http_errors_total
                .with_label_values(&[method, path, &status_str])
                .inc();
        }
    }

    // -- Domain gauge accessors (used by the /metrics handler) --

    /// Gauge for the loaded law count.
    pub fn catalog_laws(&self) -> &Gauge {
        &self.inner.catalog_laws
    }

    /// Gauge for the loaded feature count.
    pub fn catalog_features(&self) -> &Gauge {
        &self.inner.catalog_features
    }

    /// Gauge for catalog readiness (1 or 0).
    pub fn catalog_ready(&self) -> &Gauge {
        &self.inner.catalog_ready
    }

    /// Gauge for the feedback entry count.
    pub fn feedback_entries(&self) -> &Gauge {
        &self.inner.feedback_entries
    }

    /// Gather all metrics and encode to Prometheus text format.
    pub fn gather_and_encode(&self) -> Result<String, String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| format!("failed to encode metrics: {e}"))?;
        String::from_utf8(buffer)
            .map_err(|e| format!("metrics encoding produced invalid UTF-8: {e}"))
    }
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a request path by replacing UUID segments with `{id}`.
///
/// Prevents cardinality explosion in Prometheus labels; feedback entry
/// ids are UUIDs and appear as path segments.
fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if segment.len() == 36
                && segment.chars().enumerate().all(|(i, c)| {
                    if i == 8 || i == 13 || i == 18 || i == 23 {
                        c == '-'
                    } else {
                        c.is_ascii_hexdigit()
                    }
                })
            {
                "{id}"
            } else if segment.len() == 32 && segment.chars().all(|c| c.is_ascii_hexdigit()) {
                // UUID without hyphens.
                "{id}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Middleware that records HTTP request metrics via Prometheus.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());
    let start = Instant::now();

    let response = next.run(request).await;

    if let Some(m) = metrics {
        let duration = start.elapsed().as_secs_f64();
        let status = response.status().as_u16();
        m.record_request(&method, &path, status, duration);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_starts_at_zero() {
        let m = ApiMetrics::new();
        assert_eq!(m.requests(), 0);
        assert_eq!(m.errors(), 0);
    }

    #[test]
    fn requests_and_errors_count_independently() {
        let m = ApiMetrics::new();
        m.record_request("GET", "/v1/laws", 200, 0.01);
        m.record_request("POST", "/v1/checks", 200, 0.5);
        m.record_request("POST", "/v1/features", 400, 0.01);
        assert_eq!(m.requests(), 3);
        assert_eq!(m.errors(), 1);
    }

    #[test]
    fn clone_shares_underlying_counters() {
        let m = ApiMetrics::new();
        let clone = m.clone();
        m.record_request("GET", "/v1/laws", 200, 0.01);
        assert_eq!(clone.requests(), 1);
        clone.record_request("GET", "/v1/laws", 500, 0.01);
        assert_eq!(m.errors(), 1);
    }

    #[test]
    fn concurrent_increments_are_safe() {
        let m = ApiMetrics::new();
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let m = m.clone();
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        m.record_request("GET", "/v1/laws", 200, 0.001);
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(m.requests(), 4_000);
    }

    #[test]
    fn gather_and_encode_produces_text() {
        let m = ApiMetrics::new();
        m.record_request("GET", "/v1/laws", 200, 0.01);
        let output = m.gather_and_encode().unwrap();
        assert!(output.contains("verdex_http_requests_total"));
        assert!(output.contains("verdex_http_request_duration_seconds"));
    }

    #[test]
    fn domain_gauges_appear_in_exposition() {
        let m = ApiMetrics::new();
        m.catalog_laws().set(12.0);
        m.catalog_features().set(4.0);
        m.catalog_ready().set(1.0);
        m.feedback_entries().set(7.0);
        let output = m.gather_and_encode().unwrap();
        assert!(output.contains("verdex_catalog_laws 12"));
        assert!(output.contains("verdex_catalog_ready 1"));
        assert!(output.contains("verdex_feedback_entries 7"));
    }

    #[test]
    fn normalize_path_replaces_uuid_segments() {
        let path = "/v1/feedback/550e8400-e29b-41d4-a716-446655440000";
        assert_eq!(normalize_path(path), "/v1/feedback/{id}");
    }

    #[test]
    fn normalize_path_replaces_unhyphenated_uuid() {
        let path = "/v1/feedback/550e8400e29b41d4a716446655440000";
        assert_eq!(normalize_path(path), "/v1/feedback/{id}");
    }

    #[test]
    fn normalize_path_preserves_plain_segments() {
        assert_eq!(normalize_path("/v1/checks/feature"), "/v1/checks/feature");
    }
}

//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use super::config::MetricsConfig;

/// Prometheus metrics handle for serving the metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    let builder = PrometheusBuilder::new();

    match builder.install_recorder() {
        Ok(handle) => {
            register_default_metrics();

            tracing::info!("Prometheus metrics initialized");

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

fn register_default_metrics() {
    gauge!("image_gateway_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric.
///
/// `path` must be the matched route template, not the raw URI, to keep
/// label cardinality bounded.
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let status_str = status.to_string();
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status_str),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    // Track 5xx errors separately
    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Record a semantic cache lookup (`hit`, `miss`, `error` or `bypass`)
pub fn record_cache_lookup(outcome: &str) {
    let labels = [("outcome", outcome.to_string())];
    counter!("semantic_cache_lookups_total", &labels).increment(1);
}

/// Record a semantic cache store attempt
pub fn record_cache_store(success: bool) {
    let status = if success { "success" } else { "error" };
    let labels = [("status", status.to_string())];
    counter!("semantic_cache_stores_total", &labels).increment(1);
}

/// Record an image generation call
pub fn record_generation(provider: &str, success: bool, duration: Duration) {
    let status = if success { "success" } else { "error" };
    let labels = [
        ("provider", provider.to_string()),
        ("status", status.to_string()),
    ];

    counter!("image_generation_requests_total", &labels).increment(1);
    histogram!("image_generation_duration_seconds", &labels).record(duration.as_secs_f64());

    if !success {
        counter!("image_generation_errors_total", &labels).increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorded_metrics_render() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let metrics = PrometheusMetrics {
            handle: Arc::new(recorder.handle()),
        };

        metrics::with_local_recorder(&recorder, || {
            record_http_request("GET", "/images/generate", 200, Duration::from_millis(12));
            record_cache_lookup("hit");
            record_cache_store(true);
            record_generation("openai", true, Duration::from_millis(500));
        });

        let rendered = metrics.render();

        assert!(rendered.contains("http_requests_total"));
        assert!(rendered.contains("semantic_cache_lookups_total"));
        assert!(rendered.contains("semantic_cache_stores_total"));
        assert!(rendered.contains("image_generation_requests_total"));
    }

    #[test]
    fn test_server_errors_are_counted_separately() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let metrics = PrometheusMetrics {
            handle: Arc::new(recorder.handle()),
        };

        metrics::with_local_recorder(&recorder, || {
            record_http_request("GET", "/images/generate", 502, Duration::from_millis(3));
        });

        let rendered = metrics.render();

        assert!(rendered.contains("http_server_errors_total"));
    }
}

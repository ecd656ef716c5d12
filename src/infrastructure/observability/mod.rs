//! Observability infrastructure - metrics and the Prometheus exporter

mod config;
mod metrics;

pub use config::MetricsConfig;
pub use metrics::{
    create_metrics_router, init_metrics, record_cache_lookup, record_cache_store,
    record_generation, record_http_request, PrometheusMetrics,
};

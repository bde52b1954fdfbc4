//! Observability infrastructure - Metrics

mod metrics;

pub use self::metrics::{
    create_metrics_router, init_metrics, record_backend_call, record_http_request,
    BackendOutcome, PrometheusMetrics,
};

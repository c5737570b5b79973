//! Observability infrastructure - Prometheus metrics

mod metrics;

pub use metrics::{
    create_metrics_router, init_metrics, record_api_key_event, record_http_request,
    record_summarization, ApiKeyEvent, PrometheusMetrics, SummarizationOutcome,
};

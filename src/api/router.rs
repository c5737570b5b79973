//! Application router and middleware stack

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::{middleware, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use super::dashboard;
use super::health;
use super::middleware::{
    logging_middleware, metrics_middleware, request_guard_middleware,
    security_headers_middleware, API_KEY_HEADER,
};
use super::public;
use super::state::AppState;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Options for the outer router
#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    pub metrics: Option<PrometheusMetrics>,
    pub metrics_path: String,
    pub cors_allowed_origins: Vec<String>,
}

impl RouterOptions {
    pub fn with_metrics(mut self, metrics: PrometheusMetrics, path: impl Into<String>) -> Self {
        self.metrics = Some(metrics);
        self.metrics_path = path.into();
        self
    }

    pub fn with_cors_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_allowed_origins = origins;
        self
    }
}

/// Routes without middleware, for composition and tests
pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest(
            "/api",
            dashboard::create_dashboard_router().merge(public::create_public_router()),
        )
}

/// Create the full router with application state and middleware
pub fn create_router(state: AppState, options: RouterOptions) -> Router {
    let mut router = create_routes()
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(request_guard_middleware));

    if let Some(cors) = build_cors_layer(&options.cors_allowed_origins) {
        router = router.layer(cors);
    }

    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);
    router = router
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid));

    if let Some(metrics) = options.metrics {
        router = router.merge(create_metrics_router(metrics, &options.metrics_path));
    }

    router
}

/// CORS for the dashboard origins; `None` when no origin is configured
pub fn build_cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
            ])
            .allow_headers([
                CONTENT_TYPE,
                AUTHORIZATION,
                HeaderName::from_static(API_KEY_HEADER),
            ])
            .max_age(Duration::from_secs(3600)),
    )
}

//! Route builders for the greeting endpoint and the ops endpoints.

use crate::catalog::ServiceDefinition;
use crate::error::AppError;
use crate::observability::render_metrics;
use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Router with the service's single `GET` route.
///
/// The handler ignores the request entirely and answers with the catalog
/// body as `text/plain; charset=utf-8`. Unknown paths and other methods are
/// left to axum's default 404 and 405.
pub fn greeting_router(service: &'static ServiceDefinition) -> Router {
    let body = service.endpoint.body;
    Router::new().route(service.endpoint.path, get(move || async move { body }))
}

/// Shared state for `/health`, `/ready` and `/metrics`.
#[derive(Clone)]
pub struct OpsState {
    pub service: &'static ServiceDefinition,
    pub ready: Arc<AtomicBool>,
}

impl OpsState {
    pub fn new(service: &'static ServiceDefinition) -> Self {
        Self {
            service,
            ready: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}

/// Health check endpoint for Docker/K8s liveness probes.
async fn health_check(State(state): State<OpsState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": state.service.name,
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Readiness check endpoint for K8s readiness probes.
async fn readiness_check(State(state): State<OpsState>) -> Result<impl IntoResponse, AppError> {
    if !state.is_ready() {
        return Err(AppError::ServiceUnavailable);
    }
    Ok((StatusCode::OK, Json(json!({ "status": "ready" }))))
}

/// Prometheus metrics endpoint.
async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        render_metrics(),
    )
}

pub fn ops_router(state: OpsState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
}

//! Application startup and lifecycle management.
//!
//! Every service runs two listeners: the service listener with its single
//! greeting route, and an ops listener with health, readiness and metrics.

use crate::catalog::ServiceDefinition;
use crate::config::Config;
use crate::error::AppError;
use crate::middleware::{
    REQUEST_ID_HEADER, metrics_middleware, request_id_middleware, security_headers_middleware,
};
use crate::observability::{init_metrics, init_tracing, run_metrics_upkeep};
use crate::routes::{OpsState, greeting_router, ops_router};
use axum::{Router, middleware::from_fn};
use std::future::Future;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

/// Greeting router wrapped in the metrics, security-header, request-span and
/// request-id layers (innermost first).
pub fn build_service_router(service: &'static ServiceDefinition) -> Router {
    greeting_router(service)
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Outermost so the span sees the id minted for requests without one.
        .layer(from_fn(request_id_middleware))
}

pub fn build_ops_router(state: OpsState) -> Router {
    ops_router(state).layer(from_fn(request_id_middleware))
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    ops_port: u16,
    listener: TcpListener,
    ops_listener: TcpListener,
    service: &'static ServiceDefinition,
    ops_state: OpsState,
}

impl Application {
    /// Bind both listeners. Port 0 picks a random free port.
    pub async fn build(
        config: Config,
        service: &'static ServiceDefinition,
    ) -> Result<Self, AppError> {
        let listener = bind(&config.host, config.port).await?;
        let port = listener.local_addr()?.port();

        let ops_listener = bind(&config.host, config.ops_port).await?;
        let ops_port = ops_listener.local_addr()?.port();

        tracing::info!(
            service = %config.service_name,
            path = %service.endpoint.path,
            "HTTP on port {}, ops on port {}",
            port,
            ops_port
        );

        Ok(Self {
            port,
            ops_port,
            listener,
            ops_listener,
            service,
            ops_state: OpsState::new(service),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn ops_port(&self) -> u16 {
        self.ops_port
    }

    /// Readiness handle, flips to false once shutdown starts.
    pub fn ops_state(&self) -> OpsState {
        self.ops_state.clone()
    }

    /// Run until SIGINT or SIGTERM.
    pub async fn run_until_stopped(self) -> Result<(), AppError> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve both listeners until `shutdown` resolves or either server fails.
    /// In-flight requests are allowed to finish.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), AppError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let ops_state = self.ops_state.clone();

        let trigger = token.clone();
        let readiness = ops_state.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown => {}
                _ = trigger.cancelled() => {}
            }
            readiness.set_ready(false);
            trigger.cancel();
        });

        spawn_metrics_upkeep(token.clone(), METRICS_UPKEEP_INTERVAL);

        let service_token = token.clone();
        let service_server = axum::serve(self.listener, build_service_router(self.service))
            .with_graceful_shutdown(async move { service_token.cancelled().await });

        let ops_token = token.clone();
        let ops_server = axum::serve(self.ops_listener, build_ops_router(ops_state.clone()))
            .with_graceful_shutdown(async move { ops_token.cancelled().await });

        ops_state.set_ready(true);

        let service_name = self.service.name;
        let service_task = async {
            let result = service_server.await;
            token.cancel();
            result.map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                AppError::from(e)
            })
        };
        let ops_task = async {
            let result = ops_server.await;
            token.cancel();
            result.map_err(|e| {
                tracing::error!("Ops server error: {}", e);
                AppError::from(e)
            })
        };

        let (service_result, ops_result) = tokio::join!(service_task, ops_task);
        tracing::info!(service = %service_name, "Service shutdown complete");

        service_result.and(ops_result)
    }
}

/// Histogram samples pile up between scrapes unless drained on this cadence.
const METRICS_UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Drain recorded histogram samples every `period` until `token` is cancelled.
pub fn spawn_metrics_upkeep(token: CancellationToken, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = interval.tick() => run_metrics_upkeep(),
            }
        }
    })
}

/// Entry point shared by every service binary: load configuration for
/// `service`, install metrics and logging, then serve until SIGINT or SIGTERM.
pub async fn run(service: &'static ServiceDefinition) -> Result<(), AppError> {
    let config = Config::load(service)?;

    init_metrics();
    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    )?;

    tracing::info!(
        service = %config.service_name,
        version = %env!("CARGO_PKG_VERSION"),
        "Starting service"
    );

    let application = Application::build(config, service).await?;
    application.run_until_stopped().await
}

async fn bind(host: &str, port: u16) -> Result<TcpListener, AppError> {
    TcpListener::bind((host, port)).await.map_err(|e| {
        tracing::error!("Failed to bind listener to {}:{}: {}", host, port, e);
        AppError::from(e)
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}

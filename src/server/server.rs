use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio::select;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

use crate::config::settings::SettingsConfig;
use crate::function::{Function, RunFunctionRequest, RunFunctionResponse};
use crate::keycloak::IdentityProvider;
use crate::observability::metrics::get_metrics;
use crate::observability::routes::MetricsState;

pub struct AppState<P> {
    pub function: Arc<Function<P>>,
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            function: self.function.clone(),
        }
    }
}

/// Function endpoint, liveness probe and, when enabled, metrics.
pub async fn router<P>(settings_config: &SettingsConfig, function: Arc<Function<P>>) -> Router
where
    P: IdentityProvider + 'static,
{
    let metrics = get_metrics().await;
    let metrics_state = MetricsState::new(metrics.registry.clone());

    Router::new()
        .route("/run", post(run_function::<P>))
        .route("/healthz", get(healthz))
        .with_state(AppState { function })
        .merge(metrics_state.router(&settings_config.metrics))
}

pub async fn start<P>(settings_config: &SettingsConfig, function: Arc<Function<P>>) -> Result<()>
where
    P: IdentityProvider + 'static,
{
    let app = router(settings_config, function).await;

    let bind_addr = format!("{}:{}", settings_config.server.host, settings_config.server.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("cannot bind {}", bind_addr))?;
    info!(address = %bind_addr, "serving function");

    serve(listener, app, shutdown_signal()).await
}

/// Serves until `shutdown` resolves, then drains in-flight requests.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics = get_metrics().await;
    metrics.up.set(1);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("server failed")?;
    metrics.up.set(0);
    info!("server stopped");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM.
pub async fn shutdown_signal() {
    let (mut sigint, mut sigterm) = match (
        signal(SignalKind::interrupt()),
        signal(SignalKind::terminate()),
    ) {
        (Ok(sigint), Ok(sigterm)) => (sigint, sigterm),
        (Err(err), _) | (_, Err(err)) => {
            error!("cannot install signal handlers, graceful shutdown disabled: {}", err);
            return std::future::pending().await;
        }
    };

    select! {
        _ = sigint.recv() => {
            info!("Received SIGINT (Ctrl+C). Initiating graceful shutdown...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM. Initiating graceful shutdown...");
        }
    }
}

async fn run_function<P>(
    State(state): State<AppState<P>>,
    Json(req): Json<RunFunctionRequest>,
) -> Json<RunFunctionResponse>
where
    P: IdentityProvider + 'static,
{
    Json(state.function.run_function(&req).await)
}

async fn healthz() -> &'static str {
    "ok"
}

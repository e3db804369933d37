//! HTTP assembly: module routes behind auth, the shared middleware stack
//! and a liveness probe.

use std::sync::Arc;

use anyhow::Context;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::{Json, Router};
use foodgram::Foodgram;
use foodgram_auth::{AuthState, JwtValidator, auth_optional};
use foodgram_http::middleware::apply_middleware_stack;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::signals;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[must_use]
pub fn build_router(module: &Foodgram, config: &AppConfig) -> Router {
    let auth = AuthState::new(Arc::new(JwtValidator::new(&config.auth)));
    let api = module
        .router()
        .layer(from_fn_with_state(auth, auth_optional));

    let router = Router::new().route("/health", get(health)).merge(api);
    apply_middleware_stack(router, &config.server)
}

/// Serve until a shutdown signal arrives, then drain in-flight requests.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(router: Router, bind_addr: &str) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %listener.local_addr()?, "HTTP server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signals::wait_for_shutdown().await {
        tracing::warn!(error = %e, "shutdown: signal waiter failed, falling back to ctrl_c()");
        let _ = tokio::signal::ctrl_c().await;
    }
}

//! Gateway HTTP server (single port).

use crate::config::{Config, RelaySettings};
use crate::gateway::protocol::QueryRequest;
use crate::relay::{DirectReply, Relay};
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

/// Shared state for the gateway handlers.
#[derive(Clone)]
struct GatewayState {
    port: u16,
    relay: Arc<Relay>,
}

/// Run the gateway server; binds to config.gateway.bind:config.gateway.port.
/// Blocks until shutdown (e.g. Ctrl+C); in-flight requests are allowed to finish.
pub async fn run_gateway(config: Config) -> Result<()> {
    let settings = RelaySettings::resolve(&config);
    if !settings.platform_configured() {
        log::warn!("whatsapp endpoint or credential not configured; replies will not be delivered");
    }
    let relay = Arc::new(Relay::from_settings(&settings));
    log::info!("prediction backend: {}", relay.backend_url());

    let state = GatewayState {
        port: config.gateway.port,
        relay,
    };
    let app = Router::new()
        .route("/", get(health_http))
        .route("/webhook/whatsapp", post(whatsapp_webhook))
        .route("/query", post(direct_query))
        .with_state(state);

    let bind_addr = format!("{}:{}", config.gateway.bind.trim(), config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("gateway listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server exited")?;
    log::info!("gateway stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining in-flight requests");
}

/// POST /webhook/whatsapp — 200 for every processed delivery, 500 only when the body cannot be
/// decoded or the processing task panicked.
async fn whatsapp_webhook(State(state): State<GatewayState>, body: Bytes) -> StatusCode {
    let request_id = uuid::Uuid::new_v4().to_string();
    log::debug!("webhook {}: received {} bytes", request_id, body.len());
    let relay = state.relay.clone();
    let id = request_id.clone();
    let task = tokio::spawn(async move { relay.handle_webhook(&id, &body).await });
    match task.await {
        Ok(Ok(disposition)) => {
            log::info!("webhook {}: {:?}", request_id, disposition);
            StatusCode::OK
        }
        Ok(Err(e)) => {
            log::error!("webhook {}: {}", request_id, e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
        Err(e) => {
            log::error!("webhook {}: processing task failed: {}", request_id, e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// POST /query — direct query from the chat page. Empty selection → 400 with a warning reply.
async fn direct_query(
    State(state): State<GatewayState>,
    Json(req): Json<QueryRequest>,
) -> (StatusCode, Json<DirectReply>) {
    match state.relay.direct_query(&req.symptoms, req.speech).await {
        Ok(reply) => (StatusCode::OK, Json(reply)),
        Err(e) => (StatusCode::BAD_REQUEST, Json(DirectReply::rejected(&e))),
    }
}

/// GET / returns a simple health JSON (for probes).
async fn health_http(State(state): State<GatewayState>) -> Json<serde_json::Value> {
    Json(json!({
        "runtime": "running",
        "port": state.port,
        "time": chrono::Utc::now().to_rfc3339(),
    }))
}

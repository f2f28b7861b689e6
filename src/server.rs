use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::engine::{ConversationEngine, InboundMessage};
use crate::store::InteractionStore;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ConversationEngine>,
    pub store: Arc<dyn InteractionStore>,
    pub webhook_secret: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhook/whatsapp", post(receive_webhook).get(verify_webhook))
        .route("/admin/stats", get(stats))
        .route("/admin/test", post(run_test))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn run(state: AppState, host: &str, port: u16) -> Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Webhook server listening on {}", addr);
    axum::serve(listener, router(state))
        .await
        .context("Webhook server terminated")?;

    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "service": "lexbot whatsapp responder",
    }))
}

/// Wire shape of an inbound Wasender webhook delivery.
#[derive(Debug, Deserialize)]
struct WebhookPayload {
    #[serde(default)]
    from: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    id: Option<String>,
}

async fn receive_webhook(
    State(state): State<AppState>,
    Json(payload): Json<WebhookPayload>,
) -> (StatusCode, Json<Value>) {
    if payload.from.is_empty() || payload.text.is_empty() {
        warn!("Webhook with incomplete data");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "webhook is missing 'from' or 'text'" })),
        );
    }

    let msg = InboundMessage {
        sender: payload.from,
        text: payload.text,
        external_id: payload.id,
    };
    let result = state.engine.process(&msg).await;

    (
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "result": result,
            "timestamp": Utc::now().to_rfc3339(),
        })),
    )
}

#[derive(Debug, Deserialize)]
struct VerifyParams {
    #[serde(rename = "hub.verify_token")]
    verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    challenge: Option<String>,
}

/// Verification handshake used by the webhook provider: echo the challenge
/// back when the token matches.
async fn verify_webhook(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> (StatusCode, String) {
    if params.verify_token.as_deref() == Some(state.webhook_secret.as_str()) {
        info!("Webhook verified");
        (StatusCode::OK, params.challenge.unwrap_or_default())
    } else {
        warn!("Webhook verification attempted with invalid token");
        (StatusCode::FORBIDDEN, "invalid verification token".to_string())
    }
}

async fn stats(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let month_key = Utc::now().format("%Y%m").to_string();
    match state.store.load(&month_key).await {
        Ok(entries) => (
            StatusCode::OK,
            Json(json!({
                "status": "active",
                "month": month_key,
                "interactions_this_month": entries.len(),
                "timestamp": Utc::now().to_rfc3339(),
            })),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("{e:#}") })),
        ),
    }
}

/// Manual smoke test: run a caller-supplied (or canned) message through the
/// engine without a real webhook delivery.
async fn run_test(State(state): State<AppState>, body: String) -> Json<Value> {
    let payload = serde_json::from_str::<WebhookPayload>(&body)
        .ok()
        .filter(|p| !p.from.is_empty() && !p.text.is_empty())
        .unwrap_or_else(|| WebhookPayload {
            from: "+351912345678".to_string(),
            text: "Olá, teste do sistema".to_string(),
            id: Some(format!("test_{}", Utc::now().timestamp())),
        });

    let msg = InboundMessage {
        sender: payload.from.clone(),
        text: payload.text.clone(),
        external_id: payload.id.clone(),
    };
    let result = state.engine.process(&msg).await;

    Json(json!({
        "status": "test_completed",
        "test_data": {
            "from": payload.from,
            "text": payload.text,
            "id": payload.id,
        },
        "result": result,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

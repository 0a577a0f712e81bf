//! HTTP surface for the delivery platform.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;

use obscura_core::InboundEvent;

use crate::handler::ModerationHandler;

#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<ModerationHandler>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/events", post(receive_event))
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// One event per request. 204 acknowledges the event as handled (including
/// drops, malformed input, and accepted objects) so the platform does not
/// redeliver; 500 requests redelivery for failures a later attempt can
/// recover from.
async fn receive_event(State(state): State<AppState>, body: Bytes) -> StatusCode {
    let event = match InboundEvent::from_body(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::error!(error = %e, "Undecodable event body");
            return StatusCode::NO_CONTENT;
        }
    };

    match state.handler.handle(&event, Utc::now()).await {
        Ok(disposition) => {
            tracing::debug!(disposition = ?disposition, "Event handled");
            StatusCode::NO_CONTENT
        }
        Err(e) => {
            tracing::error!(error = %e, "Invocation failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

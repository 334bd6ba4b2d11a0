use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use shared_types::{AppError, CallbackStage, CaseEvent, CaseSnapshot, EventType};

use crate::state::AppState;

/// Inbound callback payload from the case-record store's message pipeline.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct CallbackPayload {
    /// Event type id, e.g. `furtherEvidenceReceived`.
    pub event: String,
    /// Callback stage, e.g. `submitted`. Absence is surfaced as a caller
    /// error by the handlers, not silently ignored.
    #[serde(default)]
    pub callback_stage: Option<String>,
    pub case: CaseSnapshot,
    #[serde(default)]
    pub previous_case: Option<CaseSnapshot>,
}

/// What the dispatch cycle did with the event.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct CallbackResponse {
    /// Names of the handlers that ran, in execution order.
    pub handled: Vec<String>,
}

/// Verify the HMAC-SHA256 signature the message pipeline puts on each
/// callback body.
pub fn verify_callback_signature(signing_key: &str, body: &[u8], signature: &str) -> bool {
    use hmac::{Hmac, Mac};
    type HmacSha256 = Hmac<sha2::Sha256>;

    let Ok(mut mac) = HmacSha256::new_from_slice(signing_key.as_bytes()) else {
        return false;
    };
    mac.update(body);

    let expected = hex::encode(mac.finalize().into_bytes());
    expected == signature
}

/// Receive one case-lifecycle event and dispatch it to completion.
#[utoipa::path(
    post,
    path = "/api/callback",
    request_body = CallbackPayload,
    responses(
        (status = 200, description = "Event dispatched", body = CallbackResponse),
        (status = 400, description = "Malformed event", body = AppError),
        (status = 401, description = "Bad or missing signature", body = AppError),
        (status = 502, description = "A downstream collaborator failed", body = AppError),
    ),
    tag = "callback"
)]
pub async fn receive_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CallbackResponse>, AppError> {
    if let Some(key) = &state.callback_signing_key {
        let signature = headers
            .get("x-callback-signature")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing callback signature"))?;
        if !verify_callback_signature(key, &body, signature) {
            return Err(AppError::unauthorized("Invalid callback signature"));
        }
    }

    let payload: CallbackPayload = serde_json::from_slice(&body)
        .map_err(|e| AppError::bad_request(format!("Malformed callback payload: {e}")))?;

    let Some(event_type) = EventType::from_str(&payload.event) else {
        // The store emits many event types this engine has no interest in.
        tracing::debug!(event = %payload.event, "Ignoring unhandled event type");
        return Ok(Json(CallbackResponse { handled: vec![] }));
    };

    let stage = payload
        .callback_stage
        .as_deref()
        .and_then(CallbackStage::from_str);

    let event = CaseEvent::new(event_type, stage, payload.case, payload.previous_case);

    let report = state.dispatcher.dispatch(&event).await.map_err(|e| {
        tracing::error!(
            case_id = %event.case.case_id,
            event = event.event_type.as_str(),
            error = %e,
            "Dispatch failed"
        );
        AppError::from(e)
    })?;

    Ok(Json(CallbackResponse {
        handled: report.handled.iter().map(|s| s.to_string()).collect(),
    }))
}

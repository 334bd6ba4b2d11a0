use std::sync::Arc;

use crate::dispatch::CallbackDispatcher;

/// Shared application state passed to Axum handlers via `State`.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<CallbackDispatcher>,
    /// HMAC key for inbound callback signatures. `None` disables
    /// verification (local development only).
    pub callback_signing_key: Option<String>,
}

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::sync::LazyLock;
use tokio::sync::Mutex;

// --- Environment helpers ---

fn service_auth_url() -> Result<String, String> {
    std::env::var("SERVICE_AUTH_URL").map_err(|_| "SERVICE_AUTH_URL is not configured".to_string())
}

fn service_auth_secret() -> Result<String, String> {
    std::env::var("SERVICE_AUTH_SECRET")
        .map_err(|_| "SERVICE_AUTH_SECRET is not configured".to_string())
}

fn service_auth_name() -> String {
    std::env::var("SERVICE_AUTH_NAME").unwrap_or_else(|_| "tribuna".to_string())
}

// --- Token cache ---

/// Tokens are refreshed this long before their stated expiry, so a token
/// never expires mid-call.
const EXPIRY_LEEWAY_SECONDS: i64 = 60;

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_LEEWAY_SECONDS) < self.expires_at
    }
}

static TOKEN: LazyLock<Mutex<Option<CachedToken>>> = LazyLock::new(|| Mutex::new(None));

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
    expires_in: i64,
}

/// Get a service-to-service bearer token, fetching a new lease from the
/// identity provider only when the cached one is stale.
#[tracing::instrument]
pub async fn service_token() -> Result<String, String> {
    let mut cached = TOKEN.lock().await;

    let now = Utc::now();
    if let Some(token) = cached.as_ref() {
        if token.is_fresh(now) {
            return Ok(token.value.clone());
        }
    }

    let url = format!("{}/lease", service_auth_url()?);
    let client = reqwest::Client::new();
    let response = client
        .post(&url)
        .json(&serde_json::json!({
            "service": service_auth_name(),
            "secret": service_auth_secret()?,
        }))
        .send()
        .await
        .map_err(|e| format!("Token lease request failed: {}", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(format!("Token lease error ({}): {}", status, body));
    }

    let lease: TokenResponse = response
        .json()
        .await
        .map_err(|e| format!("Malformed token lease response: {}", e))?;

    let token = CachedToken {
        value: lease.token,
        expires_at: now + Duration::seconds(lease.expires_in),
    };
    let value = token.value.clone();
    *cached = Some(token);

    tracing::info!("Service token refreshed");
    Ok(value)
}

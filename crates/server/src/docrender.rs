use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

// --- Environment helpers ---

fn render_api_base_url() -> Result<String, String> {
    std::env::var("RENDER_API_BASE_URL")
        .map_err(|_| "RENDER_API_BASE_URL is not configured".to_string())
}

fn render_api_key() -> Result<String, String> {
    std::env::var("RENDER_API_KEY").map_err(|_| "RENDER_API_KEY is not configured".to_string())
}

// --- Collaborator interface ---

/// The external template-to-PDF render service. One call renders one named
/// template with a flat field map into PDF bytes.
///
/// Errors are plain strings: the renderer's failures are not classified —
/// the retry policy around it treats every failure as transient.
#[async_trait]
pub trait RenderApi: Send + Sync {
    async fn render(
        &self,
        template_name: &str,
        output_name: &str,
        fields: &HashMap<String, String>,
    ) -> Result<Vec<u8>, String>;
}

/// HTTP implementation against the render service.
pub struct HttpRenderApi {
    client: reqwest::Client,
}

impl HttpRenderApi {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct RenderResponse {
    /// Base64-encoded PDF content.
    document: String,
}

#[async_trait]
impl RenderApi for HttpRenderApi {
    #[tracing::instrument(skip(self, fields))]
    async fn render(
        &self,
        template_name: &str,
        output_name: &str,
        fields: &HashMap<String, String>,
    ) -> Result<Vec<u8>, String> {
        let url = format!("{}/render", render_api_base_url()?);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", render_api_key()?)
            .json(&serde_json::json!({
                "template_name": template_name,
                "output_name": output_name,
                "fields": fields,
                "archive": false,
            }))
            .send()
            .await
            .map_err(|e| format!("Render request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Render API error ({}): {}", status, body));
        }

        let rendered: RenderResponse = response
            .json()
            .await
            .map_err(|e| format!("Malformed render response: {}", e))?;

        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(rendered.document)
            .map_err(|e| format!("Render response was not valid base64: {}", e))
    }
}

use async_trait::async_trait;
use shared_types::DispatchError;

// --- Environment helpers ---

fn document_store_base_url() -> Result<String, String> {
    std::env::var("DOCUMENT_STORE_BASE_URL")
        .map_err(|_| "DOCUMENT_STORE_BASE_URL is not configured".to_string())
}

fn system_user_id() -> String {
    std::env::var("SYSTEM_USER_ID").unwrap_or_else(|_| "tribuna-system".to_string())
}

// --- Collaborator interface ---

/// Read access to the external binary document store.
#[async_trait]
pub trait EvidenceStore: Send + Sync {
    /// Fetch the raw bytes of a stored document by its url.
    async fn fetch(&self, document_url: &str) -> Result<Vec<u8>, DispatchError>;
}

/// HTTP implementation against the document store's binary endpoint.
pub struct HttpEvidenceStore {
    client: reqwest::Client,
}

impl HttpEvidenceStore {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EvidenceStore for HttpEvidenceStore {
    #[tracing::instrument(skip(self))]
    async fn fetch(&self, document_url: &str) -> Result<Vec<u8>, DispatchError> {
        // Relative document references resolve against the store's base url.
        let url = if document_url.starts_with("http") {
            document_url.to_string()
        } else {
            let base = document_store_base_url().map_err(DispatchError::evidence_store)?;
            format!("{}/{}", base.trim_end_matches('/'), document_url.trim_start_matches('/'))
        };

        let token = crate::service_auth::service_token()
            .await
            .map_err(DispatchError::evidence_store)?;

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .header("x-acting-user-id", system_user_id())
            .send()
            .await
            .map_err(|e| DispatchError::evidence_store(format!("Document fetch failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(DispatchError::evidence_store(format!(
                "Document store error ({}) for {}",
                status, url
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DispatchError::evidence_store(format!("Document body read failed: {}", e)))?;

        tracing::debug!(url = url, size = bytes.len(), "Fetched evidence document");
        Ok(bytes.to_vec())
    }
}

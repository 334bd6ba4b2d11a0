use async_trait::async_trait;
use shared_types::{
    CaseSnapshot, CorrespondenceEntry, DispatchError, EventType, ROUTING_SERVICE_CODE,
};

// --- Environment helpers ---

fn case_record_base_url() -> Result<String, String> {
    std::env::var("CASE_RECORD_BASE_URL")
        .map_err(|_| "CASE_RECORD_BASE_URL is not configured".to_string())
}

// --- Collaborator interface ---

/// Append-event API of the external case-record store. The case record is
/// the only durable state this engine touches; every mutation goes through
/// one of these calls. The store owns its own concurrency control — there
/// is no optimistic-lock retry here.
#[async_trait]
pub trait CaseStore: Send + Sync {
    /// Append an event to the case without changing field values.
    async fn append_event(
        &self,
        case_id: &str,
        event: EventType,
        summary: &str,
        description: &str,
    ) -> Result<(), DispatchError>;

    /// Append an event together with a full replacement field set (a
    /// mutated snapshot clone).
    async fn update_case(
        &self,
        case: &CaseSnapshot,
        event: EventType,
        summary: &str,
        description: &str,
    ) -> Result<(), DispatchError>;

    /// Store a diverted letter bundle against the case as a
    /// required-adjustment correspondence entry.
    async fn store_correspondence(
        &self,
        case_id: &str,
        entry: &CorrespondenceEntry,
    ) -> Result<(), DispatchError>;

    /// Patch the routing service code into the record's supplementary data.
    async fn patch_routing_code(&self, case_id: &str) -> Result<(), DispatchError>;
}

/// HTTP implementation against the case-record store's REST API.
pub struct HttpCaseStore {
    client: reqwest::Client,
}

impl HttpCaseStore {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<(), DispatchError> {
        let base = case_record_base_url().map_err(DispatchError::case_store)?;
        let url = format!("{}{}", base.trim_end_matches('/'), path);

        let token = crate::service_auth::service_token()
            .await
            .map_err(DispatchError::case_store)?;

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(|e| DispatchError::case_store(format!("Case store request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(DispatchError::case_store(format!(
                "Case store error ({}) on {}: {}",
                status, path, text
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl CaseStore for HttpCaseStore {
    #[tracing::instrument(skip(self))]
    async fn append_event(
        &self,
        case_id: &str,
        event: EventType,
        summary: &str,
        description: &str,
    ) -> Result<(), DispatchError> {
        self.post_json(
            &format!("/cases/{case_id}/events"),
            &serde_json::json!({
                "event_type": event.as_str(),
                "summary": summary,
                "description": description,
            }),
        )
        .await?;
        tracing::info!(case_id = case_id, event = event.as_str(), "Case event appended");
        Ok(())
    }

    #[tracing::instrument(skip(self, case))]
    async fn update_case(
        &self,
        case: &CaseSnapshot,
        event: EventType,
        summary: &str,
        description: &str,
    ) -> Result<(), DispatchError> {
        self.post_json(
            &format!("/cases/{}/events", case.case_id),
            &serde_json::json!({
                "event_type": event.as_str(),
                "summary": summary,
                "description": description,
                "case_fields": case,
            }),
        )
        .await?;
        tracing::info!(
            case_id = %case.case_id,
            event = event.as_str(),
            "Case updated"
        );
        Ok(())
    }

    #[tracing::instrument(skip(self, entry))]
    async fn store_correspondence(
        &self,
        case_id: &str,
        entry: &CorrespondenceEntry,
    ) -> Result<(), DispatchError> {
        self.post_json(
            &format!("/cases/{case_id}/correspondence"),
            &serde_json::json!({ "entry": entry }),
        )
        .await?;
        tracing::info!(
            case_id = case_id,
            documents = entry.documents.len(),
            "Correspondence stored for manual handling"
        );
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn patch_routing_code(&self, case_id: &str) -> Result<(), DispatchError> {
        self.post_json(
            &format!("/cases/{case_id}/supplementary-data"),
            &serde_json::json!({
                "updates": { "service_code": ROUTING_SERVICE_CODE },
            }),
        )
        .await
    }
}

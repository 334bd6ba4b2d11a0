use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Channel-type code sent with every print job.
pub const LETTER_CHANNEL_TYPE: &str = "first-class-letter";

// --- Environment helpers ---

fn print_channel_base_url() -> Result<String, String> {
    std::env::var("PRINT_CHANNEL_BASE_URL")
        .map_err(|_| "PRINT_CHANNEL_BASE_URL is not configured".to_string())
}

// --- Collaborator interface ---

/// One print job: the encoded PDFs plus the case metadata the print vendor
/// requires.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrintSubmission {
    pub base64_pdfs: Vec<String>,
    pub channel_type: &'static str,
    pub letter_type: String,
    pub case_id: String,
    pub appellant_name: String,
    /// Every named party on the case, for the vendor's audit trail.
    pub recipients: Vec<String>,
}

/// Print channel failures, classified for the retry policy.
#[derive(Debug, Clone, PartialEq)]
pub enum PrintSubmitError {
    /// The channel rejected the content (e.g. not a PDF). A data problem —
    /// never retried.
    Malformed(String),
    /// Anything else: connection failures, 5xx responses. Retried.
    Unavailable(String),
}

impl std::fmt::Display for PrintSubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrintSubmitError::Malformed(msg) => write!(f, "malformed content: {}", msg),
            PrintSubmitError::Unavailable(msg) => write!(f, "channel unavailable: {}", msg),
        }
    }
}

/// The external print/post vendor API.
#[async_trait]
pub trait PrintChannel: Send + Sync {
    /// Submit one job; returns the vendor's submission id.
    async fn submit(&self, submission: &PrintSubmission) -> Result<Uuid, PrintSubmitError>;
}

/// HTTP implementation against the print vendor.
pub struct HttpPrintChannel {
    client: reqwest::Client,
}

impl HttpPrintChannel {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct PrintJobResponse {
    id: Uuid,
}

#[async_trait]
impl PrintChannel for HttpPrintChannel {
    #[tracing::instrument(skip(self, submission), fields(case_id = %submission.case_id))]
    async fn submit(&self, submission: &PrintSubmission) -> Result<Uuid, PrintSubmitError> {
        let base = print_channel_base_url().map_err(PrintSubmitError::Unavailable)?;
        let url = format!("{}/print-jobs", base.trim_end_matches('/'));

        let token = crate::service_auth::service_token()
            .await
            .map_err(PrintSubmitError::Unavailable)?;

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(submission)
            .send()
            .await
            .map_err(|e| PrintSubmitError::Unavailable(format!("Print request failed: {}", e)))?;

        let status = response.status();
        if status.is_client_error() {
            // 4xx means the vendor rejected what we sent — bad content, not
            // a transient fault.
            let body = response.text().await.unwrap_or_default();
            return Err(PrintSubmitError::Malformed(format!(
                "Print channel rejected job ({}): {}",
                status, body
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PrintSubmitError::Unavailable(format!(
                "Print channel error ({}): {}",
                status, body
            )));
        }

        let job: PrintJobResponse = response
            .json()
            .await
            .map_err(|e| PrintSubmitError::Unavailable(format!("Malformed print response: {}", e)))?;

        tracing::info!(submission_id = %job.id, "Print job accepted");
        Ok(job.id)
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use shared_types::{
    CaseSnapshot, DispatchError, EvidenceCategory, LetterCategory, LetterDestination, Recipient,
};

use crate::docrender::RenderApi;

// ---------------------------------------------------------------------------
// Template choice
// ---------------------------------------------------------------------------

/// Cover letter sent back to the party whose evidence is being distributed.
pub const ORIGINAL_SENDER_TEMPLATE: &str = "609-97-template (original sender)";
/// Cover letter sent to every other party receiving a copy.
pub const OTHER_PARTIES_TEMPLATE: &str = "609-98-template (other parties)";
/// Cover letter for the department's copy.
pub const DEPARTMENT_TEMPLATE: &str = "609-98-template (department)";

/// Pick the template for one destination. Keyed on the case's language
/// preference and the sender-vs-recipient relationship; the department gets
/// its own variant regardless of who sent the evidence.
pub fn template_for(welsh: bool, destination: &LetterDestination, original_sender: bool) -> String {
    let base = if destination.category == LetterCategory::Department {
        DEPARTMENT_TEMPLATE
    } else if original_sender {
        ORIGINAL_SENDER_TEMPLATE
    } else {
        OTHER_PARTIES_TEMPLATE
    };

    if welsh {
        format!("welsh-{base}")
    } else {
        base.to_string()
    }
}

/// Whether this destination is the party that submitted the evidence.
/// For other-party senders the entity id must match as well — two other
/// parties on one case are distinct senders.
pub fn is_original_sender(
    destination: &LetterDestination,
    triggering: EvidenceCategory,
    sender_other_party_id: Option<&str>,
) -> bool {
    destination.category == triggering.sender_category()
        && destination.other_party_id.as_deref() == sender_other_party_id
}

/// Filename under which a generated cover letter enters the bundle.
pub fn cover_letter_filename(case: &CaseSnapshot, destination: &LetterDestination) -> String {
    format!(
        "evidence-cover-letter-{}-{}.pdf",
        case.case_id,
        destination.category.as_str()
    )
}

/// The flat field map the render templates consume.
fn letter_fields(case: &CaseSnapshot, recipient: &Recipient) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    fields.insert("name".to_string(), recipient.name.clone());
    for (i, line) in recipient.address.lines().iter().enumerate() {
        fields.insert(format!("address_line_{}", i + 1), (*line).to_string());
    }
    fields.insert("case_id".to_string(), case.case_id.clone());
    fields.insert(
        "appellant_full_name".to_string(),
        case.appellant.name.full_name(),
    );
    fields.insert("benefit_code".to_string(), case.benefit.code.clone());
    fields.insert(
        "generated_date".to_string(),
        Utc::now().date_naive().to_string(),
    );
    fields
}

// ---------------------------------------------------------------------------
// Rendering with bounded retry
// ---------------------------------------------------------------------------

/// Retries after the first attempt; 3 means up to 4 calls in total.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Renders cover letters through the external render API, retrying
/// transient failures immediately (no backoff — failures are typically
/// connection resets, not overload) up to a bounded count.
pub struct CoverLetterRenderer {
    api: Arc<dyn RenderApi>,
    max_retries: u32,
}

impl CoverLetterRenderer {
    pub fn new(api: Arc<dyn RenderApi>) -> Self {
        Self { api, max_retries: DEFAULT_MAX_RETRIES }
    }

    pub fn with_max_retries(api: Arc<dyn RenderApi>, max_retries: u32) -> Self {
        Self { api, max_retries }
    }

    /// Render one template. An explicit counter loop, not recursion: the
    /// retry count stays bounded and independently testable. Exhaustion is
    /// terminal — callers never retry a `renderer_unreachable`.
    pub async fn render(
        &self,
        template_name: &str,
        output_name: &str,
        fields: &HashMap<String, String>,
    ) -> Result<Vec<u8>, DispatchError> {
        let mut attempt = 0;
        loop {
            match self.api.render(template_name, output_name, fields).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) if attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        template = template_name,
                        attempt = attempt,
                        error = %e,
                        "Cover letter render failed, retrying"
                    );
                }
                Err(e) => {
                    return Err(DispatchError::renderer_unreachable(format!(
                        "could not reach template renderer after {} attempts: {}",
                        attempt + 1,
                        e
                    )));
                }
            }
        }
    }

    /// Render the cover letter for one destination of a distribution call.
    pub async fn cover_letter(
        &self,
        case: &CaseSnapshot,
        destination: &LetterDestination,
        recipient: &Recipient,
        triggering: EvidenceCategory,
        sender_other_party_id: Option<&str>,
    ) -> Result<Vec<u8>, DispatchError> {
        let template = template_for(
            case.prefers_welsh(),
            destination,
            is_original_sender(destination, triggering, sender_other_party_id),
        );
        let output_name = cover_letter_filename(case, destination);
        let fields = letter_fields(case, recipient);
        self.render(&template, &output_name, &fields).await
    }
}

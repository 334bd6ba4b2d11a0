use std::sync::Arc;

use base64::Engine;
use chrono::Utc;
use shared_types::{
    CaseSnapshot, CorrespondenceEntry, DispatchError, DocumentBundle, EvidenceCategory,
    FeatureFlags, LetterCategory, LetterDestination, PrintOutcome, StoredDocument,
};
use uuid::Uuid;

use crate::caserecord::CaseStore;
use crate::printing::{PrintChannel, PrintSubmission, PrintSubmitError, LETTER_CHANNEL_TYPE};

/// Retries after the first attempt; 3 means up to 4 calls in total.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Submission id returned when bulk printing is globally disabled
/// (non-production environments) — deterministic, no network call.
pub const DISABLED_SUBMISSION_ID: Uuid = Uuid::nil();

/// Submits letter bundles to the print channel, diverting letters whose
/// recipient requires special handling and bounding retries on transient
/// channel failures.
pub struct PrintGateway {
    channel: Arc<dyn PrintChannel>,
    case_store: Arc<dyn CaseStore>,
    flags: FeatureFlags,
    max_retries: u32,
}

impl PrintGateway {
    pub fn new(
        channel: Arc<dyn PrintChannel>,
        case_store: Arc<dyn CaseStore>,
        flags: FeatureFlags,
    ) -> Self {
        Self { channel, case_store, flags, max_retries: DEFAULT_MAX_RETRIES }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Submit one bundle for one destination.
    ///
    /// Decision order: reasonable-adjustment diversion, then the global
    /// print kill-switch, then the real submission with bounded retry.
    #[tracing::instrument(skip(self, bundle, case), fields(case_id = %case.case_id, category = destination.category.as_str()))]
    pub async fn submit(
        &self,
        bundle: &DocumentBundle,
        case: &CaseSnapshot,
        destination: &LetterDestination,
        triggering: EvidenceCategory,
    ) -> Result<PrintOutcome, DispatchError> {
        if self.requires_diversion(case, destination.category) {
            self.divert(bundle, case, triggering).await?;
            return Ok(PrintOutcome::Diverted);
        }

        if !self.flags.bulk_print {
            tracing::info!("Bulk print disabled — returning fixed submission id");
            return Ok(PrintOutcome::Submitted(DISABLED_SUBMISSION_ID));
        }

        let submission = PrintSubmission {
            base64_pdfs: bundle
                .parts()
                .iter()
                .map(|p| base64::engine::general_purpose::STANDARD.encode(&p.content))
                .collect(),
            channel_type: LETTER_CHANNEL_TYPE,
            letter_type: triggering.as_str().to_string(),
            case_id: case.case_id.clone(),
            appellant_name: case.appellant.name.full_name(),
            recipients: named_parties(case),
        };

        let mut attempt = 0;
        loop {
            match self.channel.submit(&submission).await {
                Ok(id) => {
                    tracing::info!(submission_id = %id, "Letter submitted to print channel");
                    return Ok(PrintOutcome::Submitted(id));
                }
                Err(PrintSubmitError::Malformed(msg)) => {
                    // A data problem, not a transient one.
                    return Err(DispatchError::bad_document_format(msg));
                }
                Err(PrintSubmitError::Unavailable(msg)) if attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(attempt = attempt, error = %msg, "Print submission failed, retrying");
                }
                Err(PrintSubmitError::Unavailable(msg)) => {
                    return Err(DispatchError::print_unreachable(format!(
                        "print channel unreachable after {} attempts: {}",
                        attempt + 1,
                        msg
                    )));
                }
            }
        }
    }

    /// Diversion applies only to appellant and representative letters, and
    /// only while the feature is active.
    fn requires_diversion(&self, case: &CaseSnapshot, category: LetterCategory) -> bool {
        self.flags.reasonable_adjustments
            && matches!(
                category,
                LetterCategory::Appellant | LetterCategory::Representative
            )
            && case.adjustments.wants_adjustment(category)
    }

    /// Store the bundle against the case record for manual handling.
    async fn divert(
        &self,
        bundle: &DocumentBundle,
        case: &CaseSnapshot,
        triggering: EvidenceCategory,
    ) -> Result<(), DispatchError> {
        let entry = CorrespondenceEntry {
            sender: triggering.sender_category().label().to_string(),
            created_at: Utc::now(),
            documents: bundle
                .parts()
                .iter()
                .map(|p| StoredDocument {
                    filename: p.filename.clone(),
                    content_base64: base64::engine::general_purpose::STANDARD.encode(&p.content),
                })
                .collect(),
        };

        self.case_store
            .store_correspondence(&case.case_id, &entry)
            .await?;

        tracing::info!(
            case_id = %case.case_id,
            "Letter diverted for manual handling (reasonable adjustment)"
        );
        Ok(())
    }
}

/// Every named party on the case, for the print vendor's audit metadata:
/// appellant, appointee, joint party, representative, then each other party
/// with their appointees and representatives.
pub fn named_parties(case: &CaseSnapshot) -> Vec<String> {
    let mut names = Vec::new();
    names.push(case.appellant.name.full_name());
    if let Some(appointee) = case.appellant.active_appointee() {
        names.push(appointee.name.full_name());
    }
    if let Some(joint) = case.joint_party.as_ref().filter(|j| j.is_present()) {
        if let Some(name) = &joint.name {
            names.push(name.full_name());
        }
    }
    if let Some(rep) = case.representative.as_ref().filter(|r| r.is_present()) {
        if let Some(name) = &rep.name {
            names.push(name.full_name());
        }
    }
    for party in &case.other_parties {
        names.push(party.name.full_name());
        if let Some(appointee) = &party.appointee {
            names.push(appointee.name.full_name());
        }
        if let Some(rep) = &party.representative {
            names.push(rep.name.full_name());
        }
    }
    names.retain(|n| !n.is_empty());
    names
}

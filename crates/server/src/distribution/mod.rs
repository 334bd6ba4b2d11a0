//! The further-evidence engine: for one triggering document category,
//! produce one letter bundle per allowed recipient, submit each to the
//! print gateway, then mark the evidence issued and record the outcome on
//! the case.

pub mod cover_letter;
pub mod office_address;
pub mod print_gateway;
pub mod recipient;

use std::sync::Arc;

use shared_types::{
    CaseDocument, CaseSnapshot, DispatchError, DocumentBundle, EventType, EvidenceCategory,
    LetterDestination, PrintOutcome, YesNo,
};

use crate::caserecord::CaseStore;
use crate::docstore::EvidenceStore;
use cover_letter::{cover_letter_filename, CoverLetterRenderer};
use print_gateway::PrintGateway;
use recipient::RecipientResolver;

/// Distributes further evidence to the parties of a case.
pub struct DistributionService {
    resolver: RecipientResolver,
    letters: CoverLetterRenderer,
    gateway: PrintGateway,
    evidence: Arc<dyn EvidenceStore>,
    case_store: Arc<dyn CaseStore>,
}

impl DistributionService {
    pub fn new(
        resolver: RecipientResolver,
        letters: CoverLetterRenderer,
        gateway: PrintGateway,
        evidence: Arc<dyn EvidenceStore>,
        case_store: Arc<dyn CaseStore>,
    ) -> Self {
        Self { resolver, letters, gateway, evidence, case_store }
    }

    /// Issue every unissued document of `triggering` category from
    /// `documents` to each destination, in destination order.
    ///
    /// Partial distribution is worse than full failure: any error before
    /// the loop completes aborts the call, and the issued-flag update plus
    /// the single case-record update happen only after every bundle was
    /// submitted or explicitly diverted (diversion counts as success).
    /// Whatever the print channel already accepted stays accepted — a
    /// known, bounded inconsistency window.
    #[tracing::instrument(skip(self, documents, case, destinations), fields(case_id = %case.case_id, category = triggering.as_str()))]
    pub async fn issue(
        &self,
        documents: &[CaseDocument],
        case: &CaseSnapshot,
        triggering: EvidenceCategory,
        destinations: &[LetterDestination],
    ) -> Result<(), DispatchError> {
        let pending: Vec<&CaseDocument> = documents
            .iter()
            .filter(|d| d.category == triggering && !d.is_issued())
            .collect();

        if pending.is_empty() {
            tracing::debug!("No unissued documents for category — nothing to distribute");
            return Ok(());
        }

        let sender_other_party_id = pending[0].sender_other_party_id.as_deref();
        let mut outcomes: Vec<PrintOutcome> = Vec::with_capacity(destinations.len());

        for destination in destinations {
            let recipient = self.resolver.resolve(
                case,
                destination.category,
                destination.other_party_id.as_deref(),
            )?;

            let letter = self
                .letters
                .cover_letter(case, destination, &recipient, triggering, sender_other_party_id)
                .await?;

            let mut bundle =
                DocumentBundle::with_cover_letter(letter, cover_letter_filename(case, destination));
            for doc in &pending {
                let bytes = self.evidence.fetch(&doc.link.url).await?;
                bundle.push(bytes, doc.link.filename.clone());
            }

            let outcome = self
                .gateway
                .submit(&bundle, case, destination, triggering)
                .await?;
            outcomes.push(outcome);
        }

        // Every bundle went out (or was diverted) — now, and only now,
        // flip the issued flags and record the outcome. Flags are matched
        // by document url: two parties can submit under the same category,
        // and only the distributed set may flip.
        let issued_urls: Vec<&str> = pending.iter().map(|d| d.link.url.as_str()).collect();
        let mut updated = case.clone();
        for doc in updated.documents.iter_mut() {
            if issued_urls.contains(&doc.link.url.as_str()) {
                doc.issued = Some(YesNo::Yes);
            }
        }

        let (summary, description) = outcome_description(&outcomes);
        self.case_store
            .update_case(&updated, EventType::FurtherEvidenceIssued, &summary, &description)
            .await?;

        tracing::info!(
            letters = outcomes.len(),
            diverted = outcomes.iter().filter(|o| o.is_diverted()).count(),
            "Further evidence issued"
        );
        Ok(())
    }
}

/// Aggregate per-recipient outcomes into the case-record update text.
fn outcome_description(outcomes: &[PrintOutcome]) -> (String, String) {
    let diverted = outcomes.iter().filter(|o| o.is_diverted()).count();
    let printed = outcomes.len() - diverted;

    let summary = "Further evidence issued".to_string();
    let description = match (printed, diverted) {
        (p, 0) => format!("Evidence issued to {p} parties"),
        (0, d) => format!("Evidence stored for manual handling for {d} parties"),
        (p, d) => format!("Evidence issued to {p} parties ({d} stored for manual handling)"),
    };
    (summary, description)
}

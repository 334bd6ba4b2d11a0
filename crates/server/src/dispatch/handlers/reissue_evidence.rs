use async_trait::async_trait;
use std::sync::Arc;

use shared_types::{
    CallbackStage, CaseDocument, CaseEvent, CaseSnapshot, DispatchError, EventType,
    LetterDestination, ReissueSelection, YesNo,
};

use crate::caserecord::CaseStore;
use crate::dispatch::handlers::record_send_failure;
use crate::dispatch::{require_stage, CallbackHandler, DispatchPriority};
use crate::distribution::DistributionService;

/// Fires when an operator asks for one already-issued document to be sent
/// again. The operator's selection names the document and ticks the
/// recipients: appellant, representative, and any of the other parties.
pub struct ReissueEvidenceHandler {
    distribution: Arc<DistributionService>,
    case_store: Arc<dyn CaseStore>,
}

impl ReissueEvidenceHandler {
    pub fn new(distribution: Arc<DistributionService>, case_store: Arc<dyn CaseStore>) -> Self {
        Self { distribution, case_store }
    }
}

#[async_trait]
impl CallbackHandler for ReissueEvidenceHandler {
    fn name(&self) -> &'static str {
        "reissue-evidence"
    }

    fn priority(&self) -> DispatchPriority {
        DispatchPriority::Latest
    }

    fn can_handle(&self, event: &CaseEvent) -> Result<bool, DispatchError> {
        let stage = require_stage(event)?;
        Ok(stage == CallbackStage::Submitted
            && event.event_type == EventType::ReissueFurtherEvidence)
    }

    async fn handle(&self, event: &CaseEvent) -> Result<(), DispatchError> {
        if !self.can_handle(event)? {
            return Err(DispatchError::cannot_handle(format!(
                "{} does not apply to {}",
                self.name(),
                event.event_type.as_str()
            )));
        }

        let case = &event.case;
        let selection = case.reissue_selection.as_ref().ok_or_else(|| {
            DispatchError::required_field_missing(format!(
                "case {} has no reissue selection",
                case.case_id
            ))
        })?;

        let document = case
            .documents
            .iter()
            .find(|d| d.link.url == selection.document_url)
            .ok_or_else(|| {
                DispatchError::required_field_missing(format!(
                    "case {} has no document at {}",
                    case.case_id, selection.document_url
                ))
            })?;

        let destinations = selected_destinations(case, selection);
        if destinations.is_empty() {
            tracing::warn!(case_id = %case.case_id, "Reissue requested with no recipients selected");
            return Ok(());
        }

        // The operator explicitly asked for a re-send, so the issued flag
        // is cleared on a working copy to get the document past the
        // unissued filter.
        let mut reissued = document.clone();
        reissued.issued = None;
        let documents: Vec<CaseDocument> = vec![reissued];

        if let Err(err) = self
            .distribution
            .issue(&documents, case, document.category, &destinations)
            .await
        {
            record_send_failure(&self.case_store, &case.case_id, &err).await;
            return Err(err);
        }
        Ok(())
    }
}

/// Destinations from the operator's checkboxes, in appellant →
/// representative → other-party order. An other party with its own
/// representative is addressed through that representative.
fn selected_destinations(
    case: &CaseSnapshot,
    selection: &ReissueSelection,
) -> Vec<LetterDestination> {
    let mut destinations = Vec::new();

    if YesNo::flag_set(&selection.resend_to_appellant) {
        destinations.push(LetterDestination::appellant());
    }
    if YesNo::flag_set(&selection.resend_to_representative) {
        destinations.push(LetterDestination::representative());
    }
    for option in &selection.other_parties {
        if !YesNo::flag_set(&option.resend) {
            continue;
        }
        match case.other_party(&option.other_party_id) {
            Some(party) => match &party.representative {
                Some(rep) => destinations
                    .push(LetterDestination::other_party_representative(rep.id.clone())),
                None => destinations.push(LetterDestination::other_party(party.id.clone())),
            },
            None => {
                tracing::warn!(
                    case_id = %case.case_id,
                    other_party_id = %option.other_party_id,
                    "Reissue selection names an unknown other party — skipping"
                );
            }
        }
    }

    destinations
}

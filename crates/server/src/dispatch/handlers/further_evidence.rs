use async_trait::async_trait;
use std::sync::Arc;

use shared_types::{
    CallbackStage, CaseEvent, CaseSnapshot, DispatchError, EventType, EvidenceCategory,
    LetterCategory, LetterDestination,
};

use crate::caserecord::CaseStore;
use crate::dispatch::handlers::record_send_failure;
use crate::dispatch::{require_stage, CallbackHandler, DispatchPriority};
use crate::distribution::DistributionService;

/// Fires when new further evidence lands on a case: distributes every
/// unissued document to the full set of parties, one batch per
/// (category, submitting party) pair, original sender first.
pub struct FurtherEvidenceHandler {
    distribution: Arc<DistributionService>,
    case_store: Arc<dyn CaseStore>,
}

impl FurtherEvidenceHandler {
    pub fn new(distribution: Arc<DistributionService>, case_store: Arc<dyn CaseStore>) -> Self {
        Self { distribution, case_store }
    }
}

#[async_trait]
impl CallbackHandler for FurtherEvidenceHandler {
    fn name(&self) -> &'static str {
        "further-evidence"
    }

    fn priority(&self) -> DispatchPriority {
        DispatchPriority::Late
    }

    fn can_handle(&self, event: &CaseEvent) -> Result<bool, DispatchError> {
        let stage = require_stage(event)?;
        Ok(stage == CallbackStage::Submitted
            && event.event_type == EventType::FurtherEvidenceReceived
            && event.case.documents.iter().any(|d| !d.is_issued()))
    }

    async fn handle(&self, event: &CaseEvent) -> Result<(), DispatchError> {
        if !self.can_handle(event)? {
            return Err(DispatchError::cannot_handle(format!(
                "{} does not apply to {}",
                self.name(),
                event.event_type.as_str()
            )));
        }

        // Batches are processed against a working copy so that each
        // case-record update reflects the batches already issued.
        let mut working = event.case.clone();
        for batch in unissued_batches(&event.case) {
            let destinations = allowed_destinations(
                &working,
                batch.category,
                batch.sender_other_party_id.as_deref(),
            );
            let documents: Vec<_> = working
                .documents
                .iter()
                .filter(|d| {
                    d.category == batch.category
                        && d.sender_other_party_id == batch.sender_other_party_id
                })
                .cloned()
                .collect();
            if let Err(err) = self
                .distribution
                .issue(&documents, &working, batch.category, &destinations)
                .await
            {
                record_send_failure(&self.case_store, &working.case_id, &err).await;
                return Err(err);
            }

            for doc in working.documents.iter_mut() {
                if doc.category == batch.category
                    && doc.sender_other_party_id == batch.sender_other_party_id
                {
                    doc.issued = Some(shared_types::YesNo::Yes);
                }
            }
        }
        Ok(())
    }
}

/// One distribution batch: a category plus, for other-party evidence, the
/// submitting party.
#[derive(Debug, Clone, PartialEq)]
struct EvidenceBatch {
    category: EvidenceCategory,
    sender_other_party_id: Option<String>,
}

/// The distinct (category, sender) pairs with unissued documents, in the
/// fixed category processing order.
fn unissued_batches(case: &CaseSnapshot) -> Vec<EvidenceBatch> {
    let mut batches: Vec<EvidenceBatch> = Vec::new();
    for category in EvidenceCategory::all() {
        for doc in case.documents.iter().filter(|d| d.category == *category && !d.is_issued()) {
            let batch = EvidenceBatch {
                category: *category,
                sender_other_party_id: doc.sender_other_party_id.clone(),
            };
            if !batches.contains(&batch) {
                batches.push(batch);
            }
        }
    }
    batches
}

/// The ordered recipient list for one batch: the original sender first,
/// then every other party present on the case (an other party with its own
/// representative is addressed through that representative), then the
/// department last.
pub fn allowed_destinations(
    case: &CaseSnapshot,
    triggering: EvidenceCategory,
    sender_other_party_id: Option<&str>,
) -> Vec<LetterDestination> {
    let sender = triggering.sender_category();
    let mut destinations = Vec::new();

    // Original sender first — their letter confirms what was forwarded.
    match sender {
        LetterCategory::Appellant => destinations.push(LetterDestination::appellant()),
        LetterCategory::Representative => destinations.push(LetterDestination::representative()),
        LetterCategory::JointParty if case.has_joint_party() => {
            destinations.push(LetterDestination::joint_party())
        }
        LetterCategory::OtherParty => {
            if let Some(id) = sender_other_party_id {
                destinations.push(LetterDestination::other_party(id));
            }
        }
        LetterCategory::OtherPartyRepresentative => {
            if let Some(id) = sender_other_party_id {
                destinations.push(LetterDestination::other_party_representative(id));
            }
        }
        // The department gets no confirmation copy of its own evidence.
        _ => {}
    }

    if sender != LetterCategory::Appellant {
        destinations.push(LetterDestination::appellant());
    }
    if case.has_representative() && sender != LetterCategory::Representative {
        destinations.push(LetterDestination::representative());
    }
    if case.has_joint_party() && sender != LetterCategory::JointParty {
        destinations.push(LetterDestination::joint_party());
    }

    for party in &case.other_parties {
        let is_sender = sender_other_party_id.is_some_and(|id| party.matches_entity(id))
            && matches!(
                sender,
                LetterCategory::OtherParty | LetterCategory::OtherPartyRepresentative
            );
        if is_sender {
            continue;
        }
        match &party.representative {
            Some(rep) => {
                destinations.push(LetterDestination::other_party_representative(rep.id.clone()))
            }
            None => destinations.push(LetterDestination::other_party(party.id.clone())),
        }
    }

    if sender != LetterCategory::Department {
        destinations.push(LetterDestination::department());
    }

    destinations
}

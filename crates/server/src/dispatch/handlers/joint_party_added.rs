use async_trait::async_trait;
use std::sync::Arc;

use shared_types::{
    CallbackStage, CaseEvent, DispatchError, EventType, CHILD_SUPPORT_BENEFIT_CODE,
};

use crate::caserecord::CaseStore;
use crate::dispatch::diff::diff;
use crate::dispatch::{require_stage, CallbackHandler, DispatchPriority};

/// Fires when a child-support case gains a joint party: the benefit code
/// matches and the joint-party flag transitioned from absent/"No" to "Yes"
/// between the previous and current snapshots. Appends a `jointPartyAdded`
/// event so downstream consumers see the change explicitly.
///
/// Idempotent by construction: once `jointPartyAdded` has been applied the
/// flag no longer transitions, so the predicate stops matching.
pub struct JointPartyAddedHandler {
    case_store: Arc<dyn CaseStore>,
}

impl JointPartyAddedHandler {
    pub fn new(case_store: Arc<dyn CaseStore>) -> Self {
        Self { case_store }
    }
}

#[async_trait]
impl CallbackHandler for JointPartyAddedHandler {
    fn name(&self) -> &'static str {
        "joint-party-added"
    }

    fn priority(&self) -> DispatchPriority {
        DispatchPriority::Earliest
    }

    fn can_handle(&self, event: &CaseEvent) -> Result<bool, DispatchError> {
        let stage = require_stage(event)?;
        Ok(stage == CallbackStage::Submitted
            && event.event_type == EventType::CaseUpdated
            && event.case.benefit.code == CHILD_SUPPORT_BENEFIT_CODE
            && diff(event.previous_case.as_ref(), &event.case).joint_party_added)
    }

    async fn handle(&self, event: &CaseEvent) -> Result<(), DispatchError> {
        if !self.can_handle(event)? {
            return Err(DispatchError::cannot_handle(format!(
                "{} does not apply to {}",
                self.name(),
                event.event_type.as_str()
            )));
        }

        self.case_store
            .append_event(
                &event.case.case_id,
                EventType::JointPartyAdded,
                "Joint party added",
                "A joint party was added to the appeal",
            )
            .await?;

        tracing::info!(case_id = %event.case.case_id, "Joint party addition recorded");
        Ok(())
    }
}

use async_trait::async_trait;
use std::sync::Arc;

use shared_types::{CallbackStage, CaseEvent, DispatchError, EventType, DIRECT_LODGEMENT_ROUTE};

use crate::caserecord::CaseStore;
use crate::dispatch::{require_stage, CallbackHandler, DispatchPriority};

/// Fires when a directly-lodged appeal is forwarded to the responding
/// department: appends a `departmentNotified` event and makes sure the
/// routing service code is present in the record's supplementary data.
///
/// Appeals created through the department's own route are skipped — the
/// department already knows about those.
pub struct DepartmentNotifiedHandler {
    case_store: Arc<dyn CaseStore>,
}

impl DepartmentNotifiedHandler {
    pub fn new(case_store: Arc<dyn CaseStore>) -> Self {
        Self { case_store }
    }
}

#[async_trait]
impl CallbackHandler for DepartmentNotifiedHandler {
    fn name(&self) -> &'static str {
        "department-notified"
    }

    fn priority(&self) -> DispatchPriority {
        DispatchPriority::Early
    }

    fn can_handle(&self, event: &CaseEvent) -> Result<bool, DispatchError> {
        let stage = require_stage(event)?;
        Ok(stage == CallbackStage::Submitted
            && event.event_type == EventType::SendToDepartment
            && event.case.creation_route.as_deref() == Some(DIRECT_LODGEMENT_ROUTE))
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
                EventType::DepartmentNotified,
                "Department notified",
                "The appeal was forwarded to the responding department",
            )
            .await?;

        let routing_code_present = event
            .case
            .routing
            .as_ref()
            .is_some_and(|r| r.service_code.is_some());
        if !routing_code_present {
            self.case_store
                .patch_routing_code(&event.case.case_id)
                .await?;
        }

        tracing::info!(case_id = %event.case.case_id, "Department notification recorded");
        Ok(())
    }
}

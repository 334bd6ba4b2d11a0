pub mod department_notified;
pub mod further_evidence;
pub mod joint_party_added;
pub mod reissue_evidence;

pub use department_notified::DepartmentNotifiedHandler;
pub use further_evidence::FurtherEvidenceHandler;
pub use joint_party_added::JointPartyAddedHandler;
pub use reissue_evidence::ReissueEvidenceHandler;

use std::sync::Arc;

use shared_types::{DispatchError, DispatchErrorKind, EventType};

use crate::caserecord::CaseStore;
use crate::distribution::DistributionService;

use super::CallbackHandler;

/// The production handler set, in registration order (the dispatcher
/// re-sorts by band).
pub fn default_handlers(
    case_store: Arc<dyn CaseStore>,
    distribution: Arc<DistributionService>,
) -> Vec<Arc<dyn CallbackHandler>> {
    vec![
        Arc::new(JointPartyAddedHandler::new(case_store.clone())),
        Arc::new(DepartmentNotifiedHandler::new(case_store.clone())),
        Arc::new(FurtherEvidenceHandler::new(
            distribution.clone(),
            case_store.clone(),
        )),
        Arc::new(ReissueEvidenceHandler::new(distribution, case_store)),
    ]
}

/// Surface an unrecovered distribution failure as an explicit
/// `furtherEvidenceFailed` state on the case record, so operators can see
/// and retry it. Caller errors are contract violations and are not
/// recorded. Best effort: a store failure here is logged, not raised —
/// the original error still propagates.
pub(crate) async fn record_send_failure(
    case_store: &Arc<dyn CaseStore>,
    case_id: &str,
    err: &DispatchError,
) {
    if matches!(
        err.kind,
        DispatchErrorKind::RequiredFieldMissing | DispatchErrorKind::CannotHandle
    ) {
        return;
    }

    if let Err(store_err) = case_store
        .append_event(
            case_id,
            EventType::FurtherEvidenceFailed,
            "Failed sending further evidence",
            &err.to_string(),
        )
        .await
    {
        tracing::error!(
            case_id = case_id,
            error = %store_err,
            "Could not record the failed-sending state"
        );
    }
}

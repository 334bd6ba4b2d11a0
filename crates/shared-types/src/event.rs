use serde::{Deserialize, Serialize};

use crate::case::CaseSnapshot;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// Case-lifecycle event types. Inbound events arrive on the callback
/// endpoint; outbound codes are written back to the case-record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum EventType {
    // ── Inbound ─────────────────────────────────────────────────────
    /// The appeal is being forwarded to the responding department.
    SendToDepartment,
    /// Case fields were edited by a caseworker.
    CaseUpdated,
    /// An operator asked for one evidence document to be re-sent.
    ReissueFurtherEvidence,
    /// New further evidence was added to the case.
    FurtherEvidenceReceived,

    // ── Outbound (written to the case record) ───────────────────────
    DepartmentNotified,
    JointPartyAdded,
    FurtherEvidenceIssued,
    FurtherEvidenceFailed,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::SendToDepartment => "sendToDepartment",
            EventType::CaseUpdated => "caseUpdated",
            EventType::ReissueFurtherEvidence => "reissueFurtherEvidence",
            EventType::FurtherEvidenceReceived => "furtherEvidenceReceived",
            EventType::DepartmentNotified => "departmentNotified",
            EventType::JointPartyAdded => "jointPartyAdded",
            EventType::FurtherEvidenceIssued => "furtherEvidenceIssued",
            EventType::FurtherEvidenceFailed => "furtherEvidenceFailed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "sendToDepartment" => Some(EventType::SendToDepartment),
            "caseUpdated" => Some(EventType::CaseUpdated),
            "reissueFurtherEvidence" => Some(EventType::ReissueFurtherEvidence),
            "furtherEvidenceReceived" => Some(EventType::FurtherEvidenceReceived),
            "departmentNotified" => Some(EventType::DepartmentNotified),
            "jointPartyAdded" => Some(EventType::JointPartyAdded),
            "furtherEvidenceIssued" => Some(EventType::FurtherEvidenceIssued),
            "furtherEvidenceFailed" => Some(EventType::FurtherEvidenceFailed),
            _ => None,
        }
    }
}

/// Where in the event lifecycle the callback fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum CallbackStage {
    /// Before the event's form is shown (pre-submit).
    AboutToStart,
    /// After the form is filled in, before the store persists it.
    AboutToSubmit,
    /// After the store has persisted the event (post-submit).
    Submitted,
}

impl CallbackStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallbackStage::AboutToStart => "aboutToStart",
            CallbackStage::AboutToSubmit => "aboutToSubmit",
            CallbackStage::Submitted => "submitted",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "aboutToStart" => Some(CallbackStage::AboutToStart),
            "aboutToSubmit" => Some(CallbackStage::AboutToSubmit),
            "submitted" => Some(CallbackStage::Submitted),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Case event
// ---------------------------------------------------------------------------

/// One inbound case event, constructed once per message and consumed by the
/// dispatcher and its handlers. Immutable for the dispatch cycle.
///
/// `stage` is optional because malformed payloads can omit it; handlers
/// treat a missing stage as a caller error rather than silently skipping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CaseEvent {
    pub event_type: EventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<CallbackStage>,
    pub case: CaseSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_case: Option<CaseSnapshot>,
}

impl CaseEvent {
    pub fn new(
        event_type: EventType,
        stage: Option<CallbackStage>,
        case: CaseSnapshot,
        previous_case: Option<CaseSnapshot>,
    ) -> Self {
        Self { event_type, stage, case, previous_case }
    }
}

use pretty_assertions::assert_eq;

use crate::common::{sarah_smith_case, RecordingCaseStore};
use server::dispatch::handlers::DepartmentNotifiedHandler;
use server::dispatch::CallbackHandler;
use shared_types::{
    CallbackStage, CaseEvent, CaseSnapshot, DispatchErrorKind, EventType, RoutingMetadata,
    DIRECT_LODGEMENT_ROUTE,
};

fn direct_lodgement_case() -> CaseSnapshot {
    let mut case = sarah_smith_case();
    case.creation_route = Some(DIRECT_LODGEMENT_ROUTE.to_string());
    case
}

fn send_event(case: CaseSnapshot) -> CaseEvent {
    CaseEvent::new(
        EventType::SendToDepartment,
        Some(CallbackStage::Submitted),
        case,
        None,
    )
}

#[tokio::test]
async fn fires_for_directly_lodged_appeals() {
    let store = RecordingCaseStore::new();
    let handler = DepartmentNotifiedHandler::new(store.clone());

    let event = send_event(direct_lodgement_case());
    assert!(handler.can_handle(&event).unwrap());
    handler.handle(&event).await.unwrap();

    let appended = store.appended();
    assert_eq!(appended.len(), 1);
    assert_eq!(appended[0].event, EventType::DepartmentNotified);
    assert_eq!(store.patched(), vec!["6543"]);
}

#[tokio::test]
async fn skips_routing_patch_when_code_already_present() {
    let store = RecordingCaseStore::new();
    let handler = DepartmentNotifiedHandler::new(store.clone());

    let mut case = direct_lodgement_case();
    case.routing = Some(RoutingMetadata {
        service_code: Some("BNA1".to_string()),
    });

    handler.handle(&send_event(case)).await.unwrap();

    assert_eq!(store.appended().len(), 1);
    assert!(store.patched().is_empty());
}

#[tokio::test]
async fn does_not_fire_for_other_creation_routes() {
    let store = RecordingCaseStore::new();
    let handler = DepartmentNotifiedHandler::new(store);

    let mut case = sarah_smith_case();
    case.creation_route = Some("paperForm".to_string());
    assert!(!handler.can_handle(&send_event(case)).unwrap());

    let handler2 = DepartmentNotifiedHandler::new(RecordingCaseStore::new());
    let no_route = sarah_smith_case();
    assert!(!handler2.can_handle(&send_event(no_route)).unwrap());
}

#[tokio::test]
async fn does_not_fire_before_submission() {
    let store = RecordingCaseStore::new();
    let handler = DepartmentNotifiedHandler::new(store);

    let event = CaseEvent::new(
        EventType::SendToDepartment,
        Some(CallbackStage::AboutToSubmit),
        direct_lodgement_case(),
        None,
    );
    assert!(!handler.can_handle(&event).unwrap());
}

#[tokio::test]
async fn invoking_for_wrong_event_is_cannot_handle() {
    let store = RecordingCaseStore::new();
    let handler = DepartmentNotifiedHandler::new(store.clone());

    let event = CaseEvent::new(
        EventType::CaseUpdated,
        Some(CallbackStage::Submitted),
        direct_lodgement_case(),
        None,
    );
    let err = handler.handle(&event).await.unwrap_err();
    assert_eq!(err.kind, DispatchErrorKind::CannotHandle);
    assert!(store.appended().is_empty());
}

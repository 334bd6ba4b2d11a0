use pretty_assertions::assert_eq;

use crate::common::{default_flags, evidence_doc, harness, sarah_smith_case};
use server::dispatch::handlers::ReissueEvidenceHandler;
use server::dispatch::CallbackHandler;
use shared_types::{
    CallbackStage, CaseEvent, CaseSnapshot, DispatchErrorKind, EventType, EvidenceCategory,
    OtherParty, OtherPartyReissueOption, PersonName, ReissueSelection, YesNo,
};

fn reissue_event(case: CaseSnapshot) -> CaseEvent {
    CaseEvent::new(
        EventType::ReissueFurtherEvidence,
        Some(CallbackStage::Submitted),
        case,
        None,
    )
}

fn case_with_issued_doc() -> CaseSnapshot {
    let mut case = sarah_smith_case();
    let mut doc = evidence_doc(EvidenceCategory::AppellantEvidence, "app-1");
    doc.issued = Some(YesNo::Yes);
    case.documents = vec![doc];
    case
}

#[tokio::test]
async fn reissues_the_selected_document_to_ticked_recipients() {
    let h = harness(default_flags());
    let handler = ReissueEvidenceHandler::new(h.distribution.clone(), h.case_store.clone());

    let mut case = case_with_issued_doc();
    case.reissue_selection = Some(ReissueSelection {
        document_url: "app-1".to_string(),
        resend_to_appellant: Some(YesNo::Yes),
        resend_to_representative: Some(YesNo::Yes),
        other_parties: vec![],
    });

    let event = reissue_event(case);
    assert!(handler.can_handle(&event).unwrap());
    handler.handle(&event).await.unwrap();

    // Exactly the two ticked recipients, even though the document was
    // already issued once.
    assert_eq!(h.channel.call_count(), 2);
    let calls = h.render.recorded();
    assert_eq!(calls[0].recipient_name, "Sarah Smith");
    assert_eq!(calls[1].recipient_name, "Peter Hyland");

    assert_eq!(h.case_store.updated().len(), 1);
}

#[tokio::test]
async fn reissue_to_selected_other_party() {
    let h = harness(default_flags());
    let handler = ReissueEvidenceHandler::new(h.distribution.clone(), h.case_store.clone());

    let mut case = case_with_issued_doc();
    case.other_parties = vec![OtherParty {
        id: "op-1".to_string(),
        name: PersonName::new("Oscar", "Other"),
        address: crate::common::address("2 Other Avenue"),
        ..Default::default()
    }];
    case.reissue_selection = Some(ReissueSelection {
        document_url: "app-1".to_string(),
        resend_to_appellant: None,
        resend_to_representative: None,
        other_parties: vec![OtherPartyReissueOption {
            other_party_id: "op-1".to_string(),
            resend: Some(YesNo::Yes),
        }],
    });

    handler.handle(&reissue_event(case)).await.unwrap();

    assert_eq!(h.channel.call_count(), 1);
    assert_eq!(h.render.recorded()[0].recipient_name, "Oscar Other");
}

#[tokio::test]
async fn missing_selection_block_is_required_field_error() {
    let h = harness(default_flags());
    let handler = ReissueEvidenceHandler::new(h.distribution.clone(), h.case_store.clone());

    let err = handler
        .handle(&reissue_event(case_with_issued_doc()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, DispatchErrorKind::RequiredFieldMissing);
    assert_eq!(h.channel.call_count(), 0);
}

#[tokio::test]
async fn unknown_document_reference_is_required_field_error() {
    let h = harness(default_flags());
    let handler = ReissueEvidenceHandler::new(h.distribution.clone(), h.case_store.clone());

    let mut case = case_with_issued_doc();
    case.reissue_selection = Some(ReissueSelection {
        document_url: "missing-doc".to_string(),
        resend_to_appellant: Some(YesNo::Yes),
        resend_to_representative: None,
        other_parties: vec![],
    });

    let err = handler.handle(&reissue_event(case)).await.unwrap_err();
    assert_eq!(err.kind, DispatchErrorKind::RequiredFieldMissing);
}

#[tokio::test]
async fn no_ticked_recipients_is_a_no_op() {
    let h = harness(default_flags());
    let handler = ReissueEvidenceHandler::new(h.distribution.clone(), h.case_store.clone());

    let mut case = case_with_issued_doc();
    case.reissue_selection = Some(ReissueSelection {
        document_url: "app-1".to_string(),
        resend_to_appellant: Some(YesNo::No),
        resend_to_representative: None,
        other_parties: vec![],
    });

    handler.handle(&reissue_event(case)).await.unwrap();

    assert_eq!(h.channel.call_count(), 0);
    assert!(h.case_store.updated().is_empty());
}

#[tokio::test]
async fn does_not_fire_for_other_events() {
    let h = harness(default_flags());
    let handler = ReissueEvidenceHandler::new(h.distribution.clone(), h.case_store.clone());

    let event = CaseEvent::new(
        EventType::CaseUpdated,
        Some(CallbackStage::Submitted),
        case_with_issued_doc(),
        None,
    );
    assert!(!handler.can_handle(&event).unwrap());
}

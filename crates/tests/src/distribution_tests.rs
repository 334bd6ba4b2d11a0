use pretty_assertions::assert_eq;

use crate::common::{
    default_flags, evidence_doc, harness, harness_with, sarah_smith_case, with_joint_party,
    RecordingCaseStore, ScriptedPrintChannel, ScriptedRenderApi,
};
use shared_types::{
    DispatchErrorKind, EventType, EvidenceCategory, LetterDestination, YesNo,
};

#[tokio::test]
async fn issues_one_letter_per_allowed_category_in_order() {
    let h = harness(default_flags());
    let mut case = with_joint_party(sarah_smith_case());
    case.documents = vec![evidence_doc(EvidenceCategory::AppellantEvidence, "doc-1")];

    let destinations = vec![
        LetterDestination::appellant(),
        LetterDestination::representative(),
    ];
    h.distribution
        .issue(&case.documents.clone(), &case, EvidenceCategory::AppellantEvidence, &destinations)
        .await
        .unwrap();

    // Joint party is on the case but not in the allowed list — exactly two
    // submissions, in list order.
    assert_eq!(h.channel.call_count(), 2);
    let calls = h.render.recorded();
    assert_eq!(calls[0].recipient_name, "Sarah Smith");
    assert_eq!(calls[1].recipient_name, "Peter Hyland");
}

#[tokio::test]
async fn department_is_counted_only_when_passed() {
    let h = harness(default_flags());
    let mut case = with_joint_party(sarah_smith_case());
    case.documents = vec![evidence_doc(EvidenceCategory::AppellantEvidence, "doc-1")];

    let destinations = vec![
        LetterDestination::appellant(),
        LetterDestination::representative(),
        LetterDestination::department(),
    ];
    h.distribution
        .issue(&case.documents.clone(), &case, EvidenceCategory::AppellantEvidence, &destinations)
        .await
        .unwrap();

    assert_eq!(h.channel.call_count(), 3);
    assert_eq!(
        h.render.recorded()[2].recipient_name,
        "Personal Independence Payment (1)"
    );
}

#[tokio::test]
async fn issued_flags_flip_only_after_every_submission_succeeds() {
    let h = harness(default_flags());
    let mut case = sarah_smith_case();
    case.documents = vec![
        evidence_doc(EvidenceCategory::RepresentativeEvidence, "doc-1"),
        evidence_doc(EvidenceCategory::AppellantEvidence, "doc-other"),
    ];

    h.distribution
        .issue(
            &case.documents.clone(),
            &case,
            EvidenceCategory::RepresentativeEvidence,
            &[LetterDestination::representative(), LetterDestination::appellant()],
        )
        .await
        .unwrap();

    let updates = h.case_store.updated();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].event, EventType::FurtherEvidenceIssued);
    assert_eq!(updates[0].description, "Evidence issued to 2 parties");

    let updated_docs = &updates[0].case.documents;
    assert_eq!(updated_docs[0].issued, Some(YesNo::Yes), "triggering category issued");
    assert_eq!(updated_docs[1].issued, None, "other categories untouched");
}

#[tokio::test]
async fn representative_evidence_scenario_orders_sender_first() {
    // Case: Sarah Smith (no appointee), representative Peter Hyland.
    // Triggering category: representative evidence. Allowed: representative
    // (original sender), appellant (other party), department.
    let h = harness(default_flags());
    let mut case = sarah_smith_case();
    case.documents = vec![evidence_doc(EvidenceCategory::RepresentativeEvidence, "rep-evidence")];

    h.distribution
        .issue(
            &case.documents.clone(),
            &case,
            EvidenceCategory::RepresentativeEvidence,
            &[
                LetterDestination::representative(),
                LetterDestination::appellant(),
                LetterDestination::department(),
            ],
        )
        .await
        .unwrap();

    let calls = h.render.recorded();
    assert_eq!(calls.len(), 3);

    // Bundle 1: original-sender letter to the representative.
    assert_eq!(calls[0].template, "609-97-template (original sender)");
    assert_eq!(calls[0].recipient_name, "Peter Hyland");

    // Bundle 2: other-parties letter to the appellant.
    assert_eq!(calls[1].template, "609-98-template (other parties)");
    assert_eq!(calls[1].recipient_name, "Sarah Smith");

    // Bundle 3: department variant, addressed from the office table.
    assert_eq!(calls[2].template, "609-98-template (department)");
    assert_eq!(calls[2].recipient_name, "Personal Independence Payment (1)");

    // Each bundle carries the cover letter first, then the evidence.
    for submission in h.channel.recorded() {
        assert_eq!(submission.base64_pdfs.len(), 2);
    }
    assert_eq!(h.evidence.fetch_count(), 3, "evidence fetched once per bundle");
}

#[tokio::test]
async fn welsh_cases_use_welsh_templates() {
    let h = harness(default_flags());
    let mut case = sarah_smith_case();
    case.language_preference_welsh = Some(YesNo::Yes);
    case.documents = vec![evidence_doc(EvidenceCategory::AppellantEvidence, "doc-1")];

    h.distribution
        .issue(
            &case.documents.clone(),
            &case,
            EvidenceCategory::AppellantEvidence,
            &[LetterDestination::appellant()],
        )
        .await
        .unwrap();

    assert_eq!(
        h.render.recorded()[0].template,
        "welsh-609-97-template (original sender)"
    );
}

#[tokio::test]
async fn render_failure_aborts_before_any_case_update() {
    let case_store = RecordingCaseStore::new();
    let channel = ScriptedPrintChannel::new();
    let render = ScriptedRenderApi::failing_times(8);
    let h = harness_with(default_flags(), case_store, channel, render);

    let mut case = sarah_smith_case();
    case.documents = vec![evidence_doc(EvidenceCategory::RepresentativeEvidence, "doc-1")];

    let err = h
        .distribution
        .issue(
            &case.documents.clone(),
            &case,
            EvidenceCategory::RepresentativeEvidence,
            &[LetterDestination::representative(), LetterDestination::appellant()],
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind, DispatchErrorKind::RendererUnreachable);
    assert_eq!(h.channel.call_count(), 0, "nothing printed");
    assert!(h.case_store.updated().is_empty(), "no issued-flag update");
}

#[tokio::test]
async fn unknown_department_office_aborts_distribution() {
    let h = harness(default_flags());
    let mut case = sarah_smith_case();
    case.issuing_office = Some("99".to_string());
    case.documents = vec![evidence_doc(EvidenceCategory::AppellantEvidence, "doc-1")];

    let err = h
        .distribution
        .issue(
            &case.documents.clone(),
            &case,
            EvidenceCategory::AppellantEvidence,
            &[LetterDestination::appellant(), LetterDestination::department()],
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind, DispatchErrorKind::AddressNotFound);
    assert!(h.case_store.updated().is_empty());
}

#[tokio::test]
async fn no_unissued_documents_means_no_letters_and_no_update() {
    let h = harness(default_flags());
    let mut case = sarah_smith_case();
    let mut doc = evidence_doc(EvidenceCategory::AppellantEvidence, "doc-1");
    doc.issued = Some(YesNo::Yes);
    case.documents = vec![doc];

    h.distribution
        .issue(
            &case.documents.clone(),
            &case,
            EvidenceCategory::AppellantEvidence,
            &[LetterDestination::appellant()],
        )
        .await
        .unwrap();

    assert_eq!(h.channel.call_count(), 0);
    assert!(h.case_store.updated().is_empty());
}

#[tokio::test]
async fn diverted_letters_count_as_success_for_the_issued_update() {
    let h = harness(default_flags());
    let mut case = sarah_smith_case();
    case.adjustments.appellant = Some(YesNo::Yes);
    case.documents = vec![evidence_doc(EvidenceCategory::RepresentativeEvidence, "doc-1")];

    h.distribution
        .issue(
            &case.documents.clone(),
            &case,
            EvidenceCategory::RepresentativeEvidence,
            &[LetterDestination::representative(), LetterDestination::appellant()],
        )
        .await
        .unwrap();

    // The appellant letter was diverted; the update still happens and the
    // description reflects the split.
    assert_eq!(h.channel.call_count(), 1);
    let updates = h.case_store.updated();
    assert_eq!(updates.len(), 1);
    assert_eq!(
        updates[0].description,
        "Evidence issued to 1 parties (1 stored for manual handling)"
    );
    assert_eq!(updates[0].case.documents[0].issued, Some(YesNo::Yes));
}

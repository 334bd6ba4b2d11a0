use std::sync::Arc;

use pretty_assertions::assert_eq;
use uuid::Uuid;

use crate::common::{
    default_flags, sarah_smith_case, RecordingCaseStore, ScriptedPrintChannel,
};
use server::distribution::print_gateway::{PrintGateway, DISABLED_SUBMISSION_ID};
use server::printing::PrintSubmitError;
use shared_types::{
    DispatchErrorKind, DocumentBundle, EvidenceCategory, FeatureFlags, LetterDestination,
    PrintOutcome, YesNo,
};

fn bundle() -> DocumentBundle {
    let mut bundle = DocumentBundle::with_cover_letter(b"%PDF-cover".to_vec(), "cover.pdf");
    bundle.push(b"%PDF-evidence".to_vec(), "evidence.pdf");
    bundle
}

fn gateway(
    flags: FeatureFlags,
    channel: &Arc<ScriptedPrintChannel>,
    store: &Arc<RecordingCaseStore>,
) -> PrintGateway {
    PrintGateway::new(channel.clone(), store.clone(), flags)
}

#[tokio::test]
async fn successful_submission_returns_channel_id() {
    let id = Uuid::new_v4();
    let channel = ScriptedPrintChannel::scripted(vec![Ok(id)]);
    let store = RecordingCaseStore::new();

    let outcome = gateway(default_flags(), &channel, &store)
        .submit(
            &bundle(),
            &sarah_smith_case(),
            &LetterDestination::appellant(),
            EvidenceCategory::AppellantEvidence,
        )
        .await
        .unwrap();

    assert_eq!(outcome, PrintOutcome::Submitted(id));
    assert_eq!(channel.call_count(), 1);

    let submission = &channel.recorded()[0];
    assert_eq!(submission.case_id, "6543");
    assert_eq!(submission.appellant_name, "Sarah Smith");
    assert_eq!(submission.base64_pdfs.len(), 2);
    assert_eq!(submission.recipients, vec!["Sarah Smith", "Peter Hyland"]);
}

#[tokio::test]
async fn adjustment_flag_diverts_appellant_letters_without_network() {
    let channel = ScriptedPrintChannel::new();
    let store = RecordingCaseStore::new();
    let mut case = sarah_smith_case();
    case.adjustments.appellant = Some(YesNo::Yes);

    let outcome = gateway(default_flags(), &channel, &store)
        .submit(
            &bundle(),
            &case,
            &LetterDestination::appellant(),
            EvidenceCategory::RepresentativeEvidence,
        )
        .await
        .unwrap();

    assert_eq!(outcome, PrintOutcome::Diverted);
    assert_eq!(channel.call_count(), 0, "no network submission on diversion");

    let stored = store.stored_correspondence();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].0, "6543");
    assert_eq!(stored[0].1.sender, "Representative");
    assert_eq!(stored[0].1.documents.len(), 2);
    assert_eq!(stored[0].1.documents[0].filename, "cover.pdf");
}

#[tokio::test]
async fn diverted_case_never_reaches_the_channel_even_when_repeated() {
    let channel = ScriptedPrintChannel::new();
    let store = RecordingCaseStore::new();
    let mut case = sarah_smith_case();
    case.adjustments.representative = Some(YesNo::Yes);
    let gateway = gateway(default_flags(), &channel, &store);

    for _ in 0..2 {
        let outcome = gateway
            .submit(
                &bundle(),
                &case,
                &LetterDestination::representative(),
                EvidenceCategory::AppellantEvidence,
            )
            .await
            .unwrap();
        assert_eq!(outcome, PrintOutcome::Diverted);
    }

    assert_eq!(channel.call_count(), 0);
}

#[tokio::test]
async fn adjustment_flag_does_not_divert_department_letters() {
    let channel = ScriptedPrintChannel::new();
    let store = RecordingCaseStore::new();
    let mut case = sarah_smith_case();
    case.adjustments.appellant = Some(YesNo::Yes);

    let outcome = gateway(default_flags(), &channel, &store)
        .submit(
            &bundle(),
            &case,
            &LetterDestination::department(),
            EvidenceCategory::AppellantEvidence,
        )
        .await
        .unwrap();

    assert!(matches!(outcome, PrintOutcome::Submitted(_)));
    assert_eq!(channel.call_count(), 1);
}

#[tokio::test]
async fn diversion_feature_off_prints_normally() {
    let channel = ScriptedPrintChannel::new();
    let store = RecordingCaseStore::new();
    let mut case = sarah_smith_case();
    case.adjustments.appellant = Some(YesNo::Yes);

    let flags = FeatureFlags {
        bulk_print: true,
        reasonable_adjustments: false,
        telemetry: false,
    };

    let outcome = gateway(flags, &channel, &store)
        .submit(
            &bundle(),
            &case,
            &LetterDestination::appellant(),
            EvidenceCategory::AppellantEvidence,
        )
        .await
        .unwrap();

    assert!(matches!(outcome, PrintOutcome::Submitted(_)));
    assert_eq!(channel.call_count(), 1);
    assert!(store.stored_correspondence().is_empty());
}

#[tokio::test]
async fn printing_disabled_short_circuits_to_fixed_id() {
    let channel = ScriptedPrintChannel::new();
    let store = RecordingCaseStore::new();

    let flags = FeatureFlags {
        bulk_print: false,
        reasonable_adjustments: false,
        telemetry: false,
    };

    let outcome = gateway(flags, &channel, &store)
        .submit(
            &bundle(),
            &sarah_smith_case(),
            &LetterDestination::appellant(),
            EvidenceCategory::AppellantEvidence,
        )
        .await
        .unwrap();

    assert_eq!(outcome, PrintOutcome::Submitted(DISABLED_SUBMISSION_ID));
    assert_eq!(channel.call_count(), 0, "kill switch means no network call");
}

#[tokio::test]
async fn malformed_content_fails_immediately_without_retry() {
    let channel = ScriptedPrintChannel::scripted(vec![Err(PrintSubmitError::Malformed(
        "not a pdf".to_string(),
    ))]);
    let store = RecordingCaseStore::new();

    let err = gateway(default_flags(), &channel, &store)
        .submit(
            &bundle(),
            &sarah_smith_case(),
            &LetterDestination::appellant(),
            EvidenceCategory::AppellantEvidence,
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind, DispatchErrorKind::BadDocumentFormat);
    assert_eq!(channel.call_count(), 1, "format errors are never retried");
}

#[tokio::test]
async fn transient_failures_retry_then_succeed() {
    let id = Uuid::new_v4();
    let channel = ScriptedPrintChannel::scripted(vec![
        Err(PrintSubmitError::Unavailable("reset".to_string())),
        Err(PrintSubmitError::Unavailable("reset".to_string())),
        Ok(id),
    ]);
    let store = RecordingCaseStore::new();

    let outcome = gateway(default_flags(), &channel, &store)
        .submit(
            &bundle(),
            &sarah_smith_case(),
            &LetterDestination::appellant(),
            EvidenceCategory::AppellantEvidence,
        )
        .await
        .unwrap();

    assert_eq!(outcome, PrintOutcome::Submitted(id));
    assert_eq!(channel.call_count(), 3);
}

#[tokio::test]
async fn exhausted_retries_raise_terminal_print_failure() {
    let channel = ScriptedPrintChannel::scripted(vec![
        Err(PrintSubmitError::Unavailable("reset".to_string())),
        Err(PrintSubmitError::Unavailable("reset".to_string())),
        Err(PrintSubmitError::Unavailable("reset".to_string())),
        Err(PrintSubmitError::Unavailable("reset".to_string())),
    ]);
    let store = RecordingCaseStore::new();

    let err = gateway(default_flags(), &channel, &store)
        .submit(
            &bundle(),
            &sarah_smith_case(),
            &LetterDestination::appellant(),
            EvidenceCategory::AppellantEvidence,
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind, DispatchErrorKind::PrintUnreachable);
    assert_eq!(channel.call_count(), 4, "initial attempt plus three retries");
}

use std::collections::HashMap;

use pretty_assertions::assert_eq;

use crate::common::ScriptedRenderApi;
use server::distribution::cover_letter::CoverLetterRenderer;
use shared_types::DispatchErrorKind;

fn fields() -> HashMap<String, String> {
    HashMap::from([("name".to_string(), "Sarah Smith".to_string())])
}

#[tokio::test]
async fn first_attempt_success_renders_once() {
    let api = ScriptedRenderApi::new();
    let renderer = CoverLetterRenderer::new(api.clone());

    let bytes = renderer
        .render("609-97-template (original sender)", "cover.pdf", &fields())
        .await
        .unwrap();

    assert_eq!(bytes, b"%PDF-cover-letter".to_vec());
    assert_eq!(api.call_count(), 1);
}

#[tokio::test]
async fn single_transient_failure_still_returns_content() {
    let api = ScriptedRenderApi::failing_times(1);
    let renderer = CoverLetterRenderer::new(api.clone());

    let bytes = renderer.render("609-98-template (other parties)", "cover.pdf", &fields())
        .await
        .unwrap();

    assert_eq!(bytes, b"%PDF-cover-letter".to_vec());
    assert_eq!(api.call_count(), 2);
}

#[tokio::test]
async fn three_failures_then_success_on_final_retry() {
    let api = ScriptedRenderApi::failing_times(3);
    let renderer = CoverLetterRenderer::new(api.clone());

    let result = renderer.render("609-97-template (original sender)", "cover.pdf", &fields()).await;

    assert!(result.is_ok());
    assert_eq!(api.call_count(), 4, "initial attempt plus three retries");
}

#[tokio::test]
async fn fourth_consecutive_failure_is_terminal() {
    let api = ScriptedRenderApi::failing_times(4);
    let renderer = CoverLetterRenderer::new(api.clone());

    let err = renderer
        .render("609-97-template (original sender)", "cover.pdf", &fields())
        .await
        .unwrap_err();

    assert_eq!(err.kind, DispatchErrorKind::RendererUnreachable);
    assert_eq!(api.call_count(), 4, "retries are bounded");
}

#[tokio::test]
async fn retry_budget_is_configurable() {
    let api = ScriptedRenderApi::failing_times(2);
    let renderer = CoverLetterRenderer::with_max_retries(api.clone(), 1);

    let err = renderer
        .render("609-97-template (original sender)", "cover.pdf", &fields())
        .await
        .unwrap_err();

    assert_eq!(err.kind, DispatchErrorKind::RendererUnreachable);
    assert_eq!(api.call_count(), 2);
}

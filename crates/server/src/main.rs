use std::sync::Arc;

use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use server::caserecord::{CaseStore, HttpCaseStore};
use server::dispatch::handlers::default_handlers;
use server::dispatch::CallbackDispatcher;
use server::distribution::cover_letter::CoverLetterRenderer;
use server::distribution::office_address::OfficeAddressLookup;
use server::distribution::print_gateway::PrintGateway;
use server::distribution::recipient::RecipientResolver;
use server::distribution::DistributionService;
use server::docrender::{HttpRenderApi, RenderApi};
use server::docstore::{EvidenceStore, HttpEvidenceStore};
use server::printing::{HttpPrintChannel, PrintChannel};
use server::state::AppState;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    server::config::load_feature_flags();
    let flags = server::config::feature_flags();

    if flags.telemetry {
        server::telemetry::init_telemetry();
    }
    server::health::record_start_time();

    // One reqwest client shared by every collaborator — connection pooling
    // across the case store, document store, renderer, and print channel.
    let http = reqwest::Client::new();
    let case_store: Arc<dyn CaseStore> = Arc::new(HttpCaseStore::new(http.clone()));
    let evidence: Arc<dyn EvidenceStore> = Arc::new(HttpEvidenceStore::new(http.clone()));
    let render: Arc<dyn RenderApi> = Arc::new(HttpRenderApi::new(http.clone()));
    let channel: Arc<dyn PrintChannel> = Arc::new(HttpPrintChannel::new(http));

    let distribution = Arc::new(DistributionService::new(
        RecipientResolver::new(OfficeAddressLookup::builtin()),
        CoverLetterRenderer::new(render),
        PrintGateway::new(channel, case_store.clone(), flags),
        evidence,
        case_store.clone(),
    ));

    let dispatcher = Arc::new(CallbackDispatcher::new(default_handlers(
        case_store,
        distribution,
    )));

    let callback_signing_key = std::env::var("CALLBACK_SIGNING_KEY").ok();
    if callback_signing_key.is_none() {
        tracing::warn!("CALLBACK_SIGNING_KEY not set — callback signature verification disabled");
    }

    let state = AppState { dispatcher, callback_signing_key };

    let app = server::rest::api_router()
        .layer(server::telemetry::OtelTraceLayer)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server port");
    tracing::info!(%addr, "Tribuna listening");

    axum::serve(listener, app).await.expect("Server failed");
}

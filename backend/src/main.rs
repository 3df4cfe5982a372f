//! ShaadiCraft server binary.
//!
//! Loads configuration, wires adapters to ports and serves the HTTP API.
//! Collaborators without credentials are replaced by disabled adapters so
//! the builder keeps working.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::Router;
use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use shaadicraft::adapters::ai::{
    DisabledIntroWriter, FallbackIntroWriter, GeminiConfig, GeminiIntroWriter,
};
use shaadicraft::adapters::auth::{DevIdentityProvider, JwtIdentityProvider};
use shaadicraft::adapters::document::{HtmlDocumentRenderer, PandocPdfRenderer};
use shaadicraft::adapters::http::{api_router, AppState};
use shaadicraft::adapters::razorpay::{RazorpayConfig, RazorpayGateway};
use shaadicraft::adapters::storage::{FileDraftStore, FileEntitlementStore};
use shaadicraft::application::{DraftService, EntitlementService};
use shaadicraft::config::{
    AiConfig, AppConfig, AuthConfig, FeatureFlags, PaymentConfig, ServerConfig,
};
use shaadicraft::domain::biodata::LayoutRegistry;
use shaadicraft::domain::entitlement::EntitlementEngine;
use shaadicraft::ports::{DocumentRenderer, IdentityProvider, IntroWriter, PaymentGateway};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    info!(
        environment = ?config.server.environment,
        "Starting ShaadiCraft"
    );

    let state = build_state(&config).await;
    let app = build_router(state, &config.server, &config.features);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Server is listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// `RUST_LOG` wins over the configured level.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if config.features.json_logs {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Wiring
// ════════════════════════════════════════════════════════════════════════════════

async fn build_state(config: &AppConfig) -> AppState {
    let engine = EntitlementEngine::new(config.entitlement.quota_policy());
    let entitlements = Arc::new(EntitlementService::new(
        Arc::new(FileEntitlementStore::new(&config.storage.entitlement_dir)),
        engine,
    ));
    let drafts = Arc::new(
        DraftService::new(
            Arc::new(FileDraftStore::new(&config.storage.draft_dir)),
            LayoutRegistry::standard(),
        )
        .with_limits(config.storage.draft_idle_timeout(), config.storage.max_open_drafts),
    );

    AppState {
        entitlements,
        drafts,
        payment_gateway: payment_gateway(&config.payment),
        renderer: document_renderer(&config.features).await,
        intro_writer: intro_writer(&config.ai),
        identity: identity_provider(&config.auth),
    }
}

fn payment_gateway(config: &PaymentConfig) -> Arc<dyn PaymentGateway> {
    let key_id = config.razorpay_key_id.clone().unwrap_or_default();
    if config.is_configured() {
        info!(test_mode = config.is_test_mode(), "Razorpay payments enabled");
        Arc::new(RazorpayGateway::new(
            RazorpayConfig::new(key_id, config.razorpay_key_secret.clone())
                .with_base_url(&config.api_base_url),
        ))
    } else {
        // Without a secret every call reports NotConfigured.
        warn!("Razorpay credentials missing; checkout is disabled");
        Arc::new(RazorpayGateway::new(RazorpayConfig::new(key_id, None)))
    }
}

fn intro_writer(config: &AiConfig) -> Arc<dyn IntroWriter> {
    match config.gemini_api_key.as_ref().filter(|_| config.is_configured()) {
        Some(key) => {
            info!(model = %config.model, "AI introductions enabled");
            let gemini = GeminiIntroWriter::new(
                GeminiConfig::new(key.expose_secret().clone())
                    .with_model(&config.model)
                    .with_base_url(&config.base_url)
                    .with_timeout(config.timeout()),
            );
            Arc::new(FallbackIntroWriter::new(Arc::new(gemini)))
        }
        None => {
            warn!("Gemini API key missing; AI introductions are disabled");
            Arc::new(DisabledIntroWriter)
        }
    }
}

async fn document_renderer(features: &FeatureFlags) -> Arc<dyn DocumentRenderer> {
    if features.pdf_export {
        let pandoc = PandocPdfRenderer::new();
        if pandoc.is_available().await {
            info!("PDF export through Pandoc");
            return Arc::new(pandoc);
        }
        warn!("Pandoc not found; exports will be print-ready HTML");
    }
    Arc::new(HtmlDocumentRenderer::new())
}

fn identity_provider(config: &AuthConfig) -> Arc<dyn IdentityProvider> {
    match config.jwt_secret.as_ref().filter(|_| config.is_configured()) {
        Some(secret) => {
            let provider = JwtIdentityProvider::new(secret.clone());
            match &config.issuer {
                Some(issuer) => Arc::new(provider.with_issuer(issuer)),
                None => Arc::new(provider),
            }
        }
        None => {
            // Production refuses to start without a secret (see AuthConfig::validate).
            warn!("JWT secret missing; bearer tokens are trusted as user ids");
            Arc::new(DevIdentityProvider)
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// HTTP
// ════════════════════════════════════════════════════════════════════════════════

fn build_router(state: AppState, server: &ServerConfig, features: &FeatureFlags) -> Router {
    let app = api_router(state)
        .layer(DefaultBodyLimit::max(server.max_body_bytes()))
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(CompressionLayer::new())
        .layer(cors_layer(server))
        .layer(PropagateRequestIdLayer::x_request_id());

    let app = if features.enable_tracing {
        app.layer(TraceLayer::new_for_http())
    } else {
        app
    };

    app.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Any origin when none are configured.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-draft-session"),
        ])
        .expose_headers([header::CONTENT_DISPOSITION]);

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}

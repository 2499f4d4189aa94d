//! HTTP API gateway for Aurora.
//!
//! Validates input, calls the conversation orchestrator, and persists one
//! durable record per chat request. Built on Axum.

pub mod api;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use aurora_config::AppConfig;
use aurora_core::exchange::GenerationResult;
use aurora_core::store::{ConversationRecord, ConversationStore};
use aurora_engine::{ConversationOrchestrator, GenerationSettings, PersonaRegistry, SessionStore};

/// Request body limit for all routes.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared state for the gateway.
pub struct AppState {
    pub orchestrator: Arc<ConversationOrchestrator>,
    /// Durable store; `None` when disabled or unavailable.
    pub store: Option<Arc<dyn ConversationStore>>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(
        orchestrator: Arc<ConversationOrchestrator>,
        store: Option<Arc<dyn ConversationStore>>,
    ) -> SharedState {
        Arc::new(Self {
            orchestrator,
            store,
        })
    }

    /// Run one message through the orchestrator and persist the outcome.
    ///
    /// Returns the assigned message ID with the result. Degraded results are
    /// recorded too, carrying their error annotation. A store failure is
    /// logged and never changes the result.
    pub async fn handle_message(
        &self,
        message: &str,
        session_id: &str,
        preference: Option<&str>,
    ) -> (String, GenerationResult) {
        let result = self.orchestrator.respond(message, session_id, preference).await;
        let message_id = uuid::Uuid::new_v4().to_string();

        if let Some(store) = &self.store {
            let record = ConversationRecord::from_result(
                &message_id,
                session_id,
                message,
                &result,
                chrono::Utc::now(),
            );
            if let Err(e) = store.record(record).await {
                warn!(session_id, error = %e, "Failed to persist conversation record");
            }
        }

        (message_id, result)
    }
}

/// Build the full router: API routes, CORS, body limit, and trace logging.
pub fn build_router(state: SharedState, allowed_origins: &[String]) -> Router {
    api::routes(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(allowed_origins))
            .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
    )
}

/// CORS policy from configured origins. `"*"` allows any origin.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(std::time::Duration::from_secs(3600));

    if allowed_origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}

/// Wire up the engine from configuration.
///
/// A missing API key leaves the orchestrator without a backend, and a store
/// that fails to open leaves the gateway without durable history; neither
/// prevents startup.
pub async fn build_state(config: &AppConfig) -> SharedState {
    let orchestrator = ConversationOrchestrator::new(
        Arc::new(PersonaRegistry::new()),
        Arc::new(SessionStore::new()),
    )
    .with_optional_backend(
        aurora_providers::build_from_config(config),
        GenerationSettings::from_config(config),
    );

    let store = match aurora_store::build_from_config(&config.store).await {
        Ok(store) => store,
        Err(e) => {
            warn!(error = %e, "Durable store unavailable; history endpoints disabled");
            None
        }
    };

    AppState::new(Arc::new(orchestrator), store)
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> aurora_core::Result<()> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let state = build_state(&config).await;
    if !state.orchestrator.has_backend() {
        warn!("Generation backend not configured; chat will return the fallback response");
    }

    let app = build_router(state, &config.gateway.allowed_origins);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

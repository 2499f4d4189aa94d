//! Conversation orchestrator: the single entry point of the engine.
//!
//! `respond` resolves a persona, composes the effective system prompt from
//! the persona template and the session's context window, calls the
//! generation backend, and records the exchange on success. Backend absence
//! and backend failure both degrade into [`FALLBACK_RESPONSE`]; neither is
//! surfaced as an error.

use std::sync::Arc;

use aurora_config::AppConfig;
use aurora_core::exchange::{Exchange, GenerationFailure, GenerationResult};
use aurora_core::persona::Persona;
use aurora_core::provider::{Provider, ProviderRequest};
use tracing::{debug, info, warn};

use crate::classifier::PersonaClassifier;
use crate::context::ContextWindowBuilder;
use crate::registry::PersonaRegistry;
use crate::session::SessionStore;

/// User-facing text returned whenever generation is unavailable or fails.
pub const FALLBACK_RESPONSE: &str = "I'm currently experiencing technical difficulties with my AI service. Please try again later or contact support if the issue persists.";

/// Model parameters sent with every backend request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl GenerationSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: Some(config.max_tokens),
        }
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

struct Backend {
    provider: Arc<dyn Provider>,
    settings: GenerationSettings,
}

/// Routes messages to personas and keeps per-session context.
pub struct ConversationOrchestrator {
    registry: Arc<PersonaRegistry>,
    classifier: PersonaClassifier,
    context: ContextWindowBuilder,
    sessions: Arc<SessionStore>,
    backend: Option<Backend>,
}

impl ConversationOrchestrator {
    /// An orchestrator with no generation backend; every call degrades
    /// until [`with_backend`](Self::with_backend) is applied.
    pub fn new(registry: Arc<PersonaRegistry>, sessions: Arc<SessionStore>) -> Self {
        Self {
            classifier: PersonaClassifier::new(registry.clone()),
            registry,
            context: ContextWindowBuilder::new(),
            sessions,
            backend: None,
        }
    }

    pub fn with_backend(
        mut self,
        provider: Arc<dyn Provider>,
        settings: GenerationSettings,
    ) -> Self {
        info!(
            provider = %provider.name(),
            model = %settings.model,
            "Orchestrator backend attached"
        );
        self.backend = Some(Backend { provider, settings });
        self
    }

    /// Attach a backend if one was configured.
    pub fn with_optional_backend(
        self,
        provider: Option<Arc<dyn Provider>>,
        settings: GenerationSettings,
    ) -> Self {
        match provider {
            Some(provider) => self.with_backend(provider, settings),
            None => self,
        }
    }

    pub fn registry(&self) -> &PersonaRegistry {
        &self.registry
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Resolve the persona for a message.
    ///
    /// A known preference is used verbatim. Anything else, including `"auto"`
    /// and unknown keys, falls through to classification.
    pub fn resolve_persona(&self, message: &str, preference: Option<&str>) -> &Persona {
        if let Some(persona) = preference.and_then(|p| self.registry.get(p)) {
            debug!(persona = %persona.key, "Using explicit persona preference");
            return persona;
        }

        if let Some(p) = preference {
            debug!(preference = %p, "Ignoring unknown persona preference");
        }

        self.registry.persona(self.classifier.classify(message))
    }

    /// Generate a reply to `message` within `session_id`.
    ///
    /// History is appended only after a successful backend call.
    pub async fn respond(
        &self,
        message: &str,
        session_id: &str,
        preference: Option<&str>,
    ) -> GenerationResult {
        let persona = self.resolve_persona(message, preference);
        let history = self.sessions.read(session_id);
        let system_prompt = self.context.compose(&persona.system_prompt, &history);

        let Some(backend) = &self.backend else {
            warn!(session_id, "No generation backend configured; returning fallback");
            return fallback(persona, GenerationFailure::BackendUnavailable);
        };

        let request = ProviderRequest::chat(&backend.settings.model, system_prompt, message)
            .with_temperature(backend.settings.temperature)
            .with_max_tokens(backend.settings.max_tokens);

        match backend.provider.complete(request).await {
            Ok(response) => {
                let text = response.message.content;
                self.sessions
                    .append(session_id, Exchange::new(message, text.clone(), persona.key));
                info!(session_id, persona = %persona.key, "Generated response");
                GenerationResult {
                    persona: persona.key,
                    persona_name: persona.display_name.clone(),
                    response: text,
                    failure: None,
                }
            }
            Err(e) => {
                warn!(
                    session_id,
                    provider = %backend.provider.name(),
                    error = %e,
                    "Generation failed; returning fallback"
                );
                fallback(persona, GenerationFailure::BackendFailed(e.to_string()))
            }
        }
    }

    /// Drop the in-memory history of a session. Unknown ids are a no-op.
    pub fn clear_session(&self, session_id: &str) -> bool {
        self.sessions.clear(session_id)
    }
}

fn fallback(persona: &Persona, failure: GenerationFailure) -> GenerationResult {
    GenerationResult {
        persona: persona.key,
        persona_name: persona.display_name.clone(),
        response: FALLBACK_RESPONSE.into(),
        failure: Some(failure),
    }
}

//! Exchange and generation result value objects.
//!
//! User sends a message → persona is resolved → backend generates a reply →
//! the pair is kept as an [`Exchange`] and reported as a [`GenerationResult`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::persona::PersonaKey;

/// One user message paired with the response generated for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    /// What the user said
    pub user_message: String,

    /// What the backend answered
    pub response: String,

    /// Persona that produced the response
    pub persona: PersonaKey,

    /// When the exchange completed
    pub at: DateTime<Utc>,
}

impl Exchange {
    pub fn new(
        user_message: impl Into<String>,
        response: impl Into<String>,
        persona: PersonaKey,
    ) -> Self {
        Self {
            user_message: user_message.into(),
            response: response.into(),
            persona,
            at: Utc::now(),
        }
    }
}

/// Why a result carries fallback text instead of generated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum GenerationFailure {
    /// No backend was configured at startup.
    BackendUnavailable,
    /// The backend call returned an error.
    BackendFailed(String),
}

impl fmt::Display for GenerationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationFailure::BackendUnavailable => f.write_str("AI client not available"),
            GenerationFailure::BackendFailed(reason) => write!(f, "{reason}"),
        }
    }
}

/// The outcome of one `respond` call. Never persisted by the engine itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Resolved persona key
    pub persona: PersonaKey,

    /// Display name of the resolved persona
    pub persona_name: String,

    /// Generated text, or the fixed fallback text on failure
    pub response: String,

    /// Set when the backend was unavailable or failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<GenerationFailure>,
}

impl GenerationResult {
    /// Whether this result is the degradation fallback.
    pub fn is_degraded(&self) -> bool {
        self.failure.is_some()
    }

    /// Error annotation for durable records, if any.
    pub fn error_annotation(&self) -> Option<String> {
        self.failure.as_ref().map(ToString::to_string)
    }
}

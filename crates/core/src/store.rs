//! ConversationStore trait: durable record of completed exchanges.
//!
//! The store lives entirely outside the routing engine. The HTTP boundary
//! writes one record per `respond` call and serves history and per-session
//! summaries from it. Store failures never change what `respond` returned.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::exchange::GenerationResult;
use crate::persona::PersonaKey;

/// One durable record of a request and its result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    /// Boundary-assigned message ID
    pub message_id: String,

    pub session_id: String,

    pub user_message: String,

    pub ai_response: String,

    /// Persona key used
    pub persona_used: PersonaKey,

    /// Persona display name used
    pub persona_name: String,

    pub timestamp: DateTime<Utc>,

    /// Set when the response was the degradation fallback
    #[serde(default)]
    pub error: Option<String>,
}

impl ConversationRecord {
    /// Map an engine result plus boundary metadata onto a record.
    pub fn from_result(
        message_id: impl Into<String>,
        session_id: impl Into<String>,
        user_message: impl Into<String>,
        result: &GenerationResult,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            message_id: message_id.into(),
            session_id: session_id.into(),
            user_message: user_message.into(),
            ai_response: result.response.clone(),
            persona_used: result.persona,
            persona_name: result.persona_name.clone(),
            timestamp,
            error: result.error_annotation(),
        }
    }
}

/// Aggregate view of one session's durable records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub last_message: String,
    pub last_response: String,
    pub message_count: u64,
    pub last_updated: DateTime<Utc>,
    pub persona_used: PersonaKey,
}

/// The durable store capability.
///
/// Implementations: SQLite, in-memory (for testing).
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// The backend name (e.g., "sqlite", "memory").
    fn name(&self) -> &str;

    /// Persist one record.
    async fn record(&self, record: ConversationRecord) -> std::result::Result<(), StoreError>;

    /// All records of a session, oldest first.
    async fn fetch_session(
        &self,
        session_id: &str,
    ) -> std::result::Result<Vec<ConversationRecord>, StoreError>;

    /// One summary per known session, most recently updated first.
    async fn sessions(&self) -> std::result::Result<Vec<SessionSummary>, StoreError>;

    /// Delete every record of a session; returns how many were removed.
    async fn delete_session(&self, session_id: &str) -> std::result::Result<u64, StoreError>;
}

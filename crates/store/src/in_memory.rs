//! In-memory store: useful for testing and ephemeral deployments.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use aurora_core::error::StoreError;
use aurora_core::store::{ConversationRecord, ConversationStore, SessionSummary};
use tokio::sync::RwLock;

/// A store that keeps every record in a Vec, in insertion order.
pub struct InMemoryStore {
    records: Arc<RwLock<Vec<ConversationRecord>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationStore for InMemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn record(&self, record: ConversationRecord) -> Result<(), StoreError> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn fetch_session(&self, session_id: &str) -> Result<Vec<ConversationRecord>, StoreError> {
        let records = self.records.read().await;
        let mut session: Vec<ConversationRecord> = records
            .iter()
            .filter(|r| r.session_id == session_id)
            .cloned()
            .collect();

        // stable: equal timestamps keep insertion order
        session.sort_by_key(|r| r.timestamp);
        Ok(session)
    }

    async fn sessions(&self) -> Result<Vec<SessionSummary>, StoreError> {
        let records = self.records.read().await;
        let mut by_session: HashMap<&str, SessionSummary> = HashMap::new();

        for r in records.iter() {
            by_session
                .entry(r.session_id.as_str())
                .and_modify(|s| {
                    s.message_count += 1;
                    if r.timestamp >= s.last_updated {
                        s.last_message = r.user_message.clone();
                        s.last_response = r.ai_response.clone();
                        s.last_updated = r.timestamp;
                        s.persona_used = r.persona_used;
                    }
                })
                .or_insert_with(|| SessionSummary {
                    session_id: r.session_id.clone(),
                    last_message: r.user_message.clone(),
                    last_response: r.ai_response.clone(),
                    message_count: 1,
                    last_updated: r.timestamp,
                    persona_used: r.persona_used,
                });
        }

        let mut summaries: Vec<SessionSummary> = by_session.into_values().collect();
        summaries.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
        Ok(summaries)
    }

    async fn delete_session(&self, session_id: &str) -> Result<u64, StoreError> {
        let mut records = self.records.write().await;
        let len_before = records.len();
        records.retain(|r| r.session_id != session_id);
        Ok((len_before - records.len()) as u64)
    }
}

//! Durable conversation store implementations for Aurora.

pub mod in_memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

use std::sync::Arc;

use aurora_config::StoreConfig;
use aurora_core::error::StoreError;
use aurora_core::store::ConversationStore;
use tracing::info;

pub use in_memory::InMemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

/// Build the durable store named by configuration.
///
/// `"none"` disables durable storage and yields `Ok(None)`; the gateway then
/// answers history endpoints with 503.
pub async fn build_from_config(
    config: &StoreConfig,
) -> Result<Option<Arc<dyn ConversationStore>>, StoreError> {
    let store: Arc<dyn ConversationStore> = match config.backend.as_str() {
        "none" => {
            info!("Durable conversation store disabled");
            return Ok(None);
        }
        "memory" => Arc::new(InMemoryStore::new()),
        #[cfg(feature = "sqlite")]
        "sqlite" => Arc::new(SqliteStore::open(&config.path).await?),
        other => {
            return Err(StoreError::Storage(format!(
                "Unsupported store backend '{other}'"
            )));
        }
    };

    info!(backend = %store.name(), "Durable conversation store ready");
    Ok(Some(store))
}

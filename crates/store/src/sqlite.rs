//! SQLite conversation store.
//!
//! One table, `conversations`, holds a row per recorded request. Rows are
//! read back ordered by `timestamp`, which is stored as fixed-width RFC 3339
//! text so lexical and chronological order agree.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use aurora_core::error::StoreError;
use aurora_core::persona::PersonaKey;
use aurora_core::store::{ConversationRecord, ConversationStore, SessionSummary};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

/// A SQLite-backed [`ConversationStore`].
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open a store from a SQLite URL.
    ///
    /// Pass `"sqlite::memory:"` for an in-process ephemeral database (useful for tests).
    pub async fn new(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| StoreError::Storage(format!("Invalid SQLite URL: {e}")))?;
        let store = Self::connect(options).await?;
        info!("SQLite conversation store initialized at {url}");
        Ok(store)
    }

    /// Open (creating if missing) a store at a database file path.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Storage(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }

        let store = Self::connect(SqliteConnectOptions::new().filename(path)).await?;
        info!("SQLite conversation store initialized at {}", path.display());
        Ok(store)
    }

    /// Create from an existing pool (useful for testing).
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn connect(options: SqliteConnectOptions) -> Result<Self, StoreError> {
        let options = options
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to open SQLite: {e}")))?;

        Self::from_pool(pool).await
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS conversations (
                iid           INTEGER PRIMARY KEY AUTOINCREMENT,
                message_id    TEXT UNIQUE NOT NULL,
                session_id    TEXT NOT NULL,
                user_message  TEXT NOT NULL,
                ai_response   TEXT NOT NULL,
                persona_used  TEXT NOT NULL,
                persona_name  TEXT NOT NULL,
                timestamp     TEXT NOT NULL,
                error         TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("conversations table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_conversations_session_ts ON conversations(session_id, timestamp)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("session index: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }

    fn format_timestamp(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| StoreError::QueryFailed(format!("timestamp '{raw}': {e}")))
    }

    fn parse_persona(raw: &str) -> Result<PersonaKey, StoreError> {
        PersonaKey::parse(raw)
            .ok_or_else(|| StoreError::QueryFailed(format!("unknown persona '{raw}'")))
    }

    fn column<'r, T>(row: &'r sqlx::sqlite::SqliteRow, name: &str) -> Result<T, StoreError>
    where
        T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
    {
        row.try_get(name)
            .map_err(|e| StoreError::QueryFailed(format!("{name} column: {e}")))
    }

    fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> Result<ConversationRecord, StoreError> {
        let persona: String = Self::column(row, "persona_used")?;
        let timestamp: String = Self::column(row, "timestamp")?;

        Ok(ConversationRecord {
            message_id: Self::column(row, "message_id")?,
            session_id: Self::column(row, "session_id")?,
            user_message: Self::column(row, "user_message")?,
            ai_response: Self::column(row, "ai_response")?,
            persona_used: Self::parse_persona(&persona)?,
            persona_name: Self::column(row, "persona_name")?,
            timestamp: Self::parse_timestamp(&timestamp)?,
            error: Self::column(row, "error")?,
        })
    }

    fn row_to_summary(row: &sqlx::sqlite::SqliteRow) -> Result<SessionSummary, StoreError> {
        let persona: String = Self::column(row, "persona_used")?;
        let timestamp: String = Self::column(row, "timestamp")?;
        let count: i64 = Self::column(row, "message_count")?;

        Ok(SessionSummary {
            session_id: Self::column(row, "session_id")?,
            last_message: Self::column(row, "user_message")?,
            last_response: Self::column(row, "ai_response")?,
            message_count: count.max(0) as u64,
            last_updated: Self::parse_timestamp(&timestamp)?,
            persona_used: Self::parse_persona(&persona)?,
        })
    }
}

#[async_trait]
impl ConversationStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn record(&self, record: ConversationRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO conversations
                (message_id, session_id, user_message, ai_response, persona_used, persona_name, timestamp, error)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&record.message_id)
        .bind(&record.session_id)
        .bind(&record.user_message)
        .bind(&record.ai_response)
        .bind(record.persona_used.as_str())
        .bind(&record.persona_name)
        .bind(Self::format_timestamp(&record.timestamp))
        .bind(&record.error)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("INSERT failed: {e}")))?;

        debug!(
            session_id = %record.session_id,
            message_id = %record.message_id,
            "Recorded conversation"
        );
        Ok(())
    }

    async fn fetch_session(&self, session_id: &str) -> Result<Vec<ConversationRecord>, StoreError> {
        let rows = sqlx::query(
            "SELECT * FROM conversations WHERE session_id = ?1 ORDER BY timestamp ASC, iid ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("fetch session: {e}")))?;

        rows.iter().map(Self::row_to_record).collect()
    }

    async fn sessions(&self) -> Result<Vec<SessionSummary>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT session_id, user_message, ai_response, persona_used, timestamp, message_count, iid
            FROM (
                SELECT *,
                    COUNT(*) OVER (PARTITION BY session_id) AS message_count,
                    ROW_NUMBER() OVER (
                        PARTITION BY session_id ORDER BY timestamp DESC, iid DESC
                    ) AS rn
                FROM conversations
            )
            WHERE rn = 1
            ORDER BY timestamp DESC, iid DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("session summaries: {e}")))?;

        rows.iter().map(Self::row_to_summary).collect()
    }

    async fn delete_session(&self, session_id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM conversations WHERE session_id = ?1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(format!("DELETE failed: {e}")))?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    async fn test_store() -> SqliteStore {
        SqliteStore::new("sqlite::memory:").await.unwrap()
    }

    fn record(
        session: &str,
        message: &str,
        minutes: i64,
        persona: PersonaKey,
    ) -> ConversationRecord {
        ConversationRecord {
            message_id: uuid::Uuid::new_v4().to_string(),
            session_id: session.into(),
            user_message: message.into(),
            ai_response: format!("re: {message}"),
            persona_used: persona,
            persona_name: "n/a".into(),
            timestamp: Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
                + Duration::minutes(minutes),
            error: None,
        }
    }

    #[tokio::test]
    async fn record_and_fetch_roundtrip_fields() {
        let store = test_store().await;
        let mut r = record("s1", "Explain gravity", 0, PersonaKey::Education);
        r.error = Some("AI client not available".into());
        store.record(r.clone()).await.unwrap();

        let fetched = store.fetch_session("s1").await.unwrap();
        assert_eq!(fetched, vec![r]);
    }

    #[tokio::test]
    async fn fetch_orders_by_timestamp_not_insertion() {
        let store = test_store().await;
        store.record(record("s1", "late", 10, PersonaKey::General)).await.unwrap();
        store.record(record("s1", "early", 1, PersonaKey::General)).await.unwrap();
        store.record(record("s2", "elsewhere", 5, PersonaKey::General)).await.unwrap();

        let fetched = store.fetch_session("s1").await.unwrap();
        let messages: Vec<&str> = fetched.iter().map(|r| r.user_message.as_str()).collect();
        assert_eq!(messages, ["early", "late"]);
    }

    #[tokio::test]
    async fn sub_second_timestamps_sort_correctly() {
        let store = test_store().await;
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let mut a = record("s", "a", 0, PersonaKey::General);
        a.timestamp = base + Duration::milliseconds(900);
        let mut b = record("s", "b", 0, PersonaKey::General);
        b.timestamp = base + Duration::seconds(1);
        store.record(b).await.unwrap();
        store.record(a).await.unwrap();

        let fetched = store.fetch_session("s").await.unwrap();
        assert_eq!(fetched[0].user_message, "a");
    }

    #[tokio::test]
    async fn sessions_summary_most_recent_first() {
        let store = test_store().await;
        store.record(record("a", "hello", 1, PersonaKey::General)).await.unwrap();
        store.record(record("a", "so sad", 8, PersonaKey::MentalHealth)).await.unwrap();
        store.record(record("b", "study tips", 4, PersonaKey::Education)).await.unwrap();

        let sessions = store.sessions().await.unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].session_id, "a");
        assert_eq!(sessions[0].message_count, 2);
        assert_eq!(sessions[0].last_message, "so sad");
        assert_eq!(sessions[0].last_response, "re: so sad");
        assert_eq!(sessions[0].persona_used, PersonaKey::MentalHealth);
        assert_eq!(sessions[1].session_id, "b");
        assert_eq!(sessions[1].message_count, 1);
    }

    #[tokio::test]
    async fn empty_store_has_no_sessions() {
        let store = test_store().await;
        assert!(store.sessions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_session_reports_count() {
        let store = test_store().await;
        store.record(record("a", "1", 1, PersonaKey::General)).await.unwrap();
        store.record(record("a", "2", 2, PersonaKey::General)).await.unwrap();
        store.record(record("b", "3", 3, PersonaKey::General)).await.unwrap();

        assert_eq!(store.delete_session("a").await.unwrap(), 2);
        assert_eq!(store.delete_session("a").await.unwrap(), 0);
        assert!(store.fetch_session("a").await.unwrap().is_empty());
        assert_eq!(store.fetch_session("b").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn file_backed_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("conversations.db");

        {
            let store = SqliteStore::open(&path).await.unwrap();
            store.record(record("s", "kept", 0, PersonaKey::General)).await.unwrap();
        }

        let reopened = SqliteStore::open(&path).await.unwrap();
        let fetched = reopened.fetch_session("s").await.unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].user_message, "kept");
    }
}

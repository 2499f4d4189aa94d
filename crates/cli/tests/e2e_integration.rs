//! End-to-end integration tests for Aurora.
//!
//! These tests drive the full pipeline from an HTTP request through persona
//! routing, context assembly, generation, and durable recording.

use std::sync::{Arc, Mutex};

use aurora_core::error::ProviderError;
use aurora_core::message::Message;
use aurora_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use aurora_engine::{
    ConversationOrchestrator, FALLBACK_RESPONSE, GenerationSettings, MAX_EXCHANGES,
    PersonaRegistry, SessionStore,
};
use aurora_gateway::{AppState, SharedState, build_router};
use aurora_store::{InMemoryStore, SqliteStore};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

// ── Mock Provider ────────────────────────────────────────────────────────

/// A mock provider that replays scripted outcomes and records each request.
struct ScriptedProvider {
    outcomes: Mutex<Vec<Result<String, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    fn new(outcomes: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn system_prompt(&self, call: usize) -> String {
        self.requests.lock().unwrap()[call].messages[0].content.clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let outcomes = self.outcomes.lock().unwrap();
        let call = requests.len();
        if call >= outcomes.len() {
            panic!(
                "ScriptedProvider exhausted: call #{call}, have {}",
                outcomes.len()
            );
        }
        requests.push(request);
        outcomes[call].clone().map(|text| ProviderResponse {
            message: Message::assistant(text),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model: "mock".into(),
        })
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────

fn state_with(
    provider: Option<Arc<ScriptedProvider>>,
    store: Option<Arc<dyn aurora_core::ConversationStore>>,
) -> SharedState {
    let orchestrator = ConversationOrchestrator::new(
        Arc::new(PersonaRegistry::new()),
        Arc::new(SessionStore::new()),
    );
    let orchestrator = match provider {
        Some(p) => orchestrator.with_backend(p, GenerationSettings::default()),
        None => orchestrator,
    };
    AppState::new(Arc::new(orchestrator), store)
}

async fn call(state: &SharedState, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let app = build_router(state.clone(), &["*".to_string()]);
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (
        status,
        serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
    )
}

fn chat(message: &str, session_id: &str) -> Request<Body> {
    chat_with(serde_json::json!({"message": message, "session_id": session_id}))
}

fn chat_with(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// ── E2E: Persona routing through HTTP ────────────────────────────────────

#[tokio::test]
async fn e2e_concrete_routing_scenarios() {
    let provider = Arc::new(ScriptedProvider::texts(&["one", "two", "three"]));
    let state = state_with(Some(provider.clone()), Some(Arc::new(InMemoryStore::new())));

    let (_, json) = call(&state, chat("I'm feeling stressed and anxious today.", "s")).await;
    assert_eq!(json["persona_key"], "mental_health");
    assert_eq!(json["persona_used"], "Mental Health Support");

    let (_, json) = call(&state, chat("Can you explain photosynthesis?", "s")).await;
    assert_eq!(json["persona_key"], "education");

    let (_, json) = call(&state, chat("Hello, how are you?", "s")).await;
    assert_eq!(json["persona_key"], "general");

    assert_eq!(provider.calls(), 3);
    assert!(
        provider
            .system_prompt(0)
            .starts_with("You are Aurora's Mental Health Support persona.")
    );
    assert!(
        provider
            .system_prompt(1)
            .starts_with("You are Aurora's Education Specialist persona.")
    );
}

#[tokio::test]
async fn e2e_context_window_follows_the_session() {
    let replies: Vec<String> = (1..=5).map(|i| format!("reply {i}")).collect();
    let refs: Vec<&str> = replies.iter().map(String::as_str).collect();
    let provider = Arc::new(ScriptedProvider::texts(&refs));
    let state = state_with(Some(provider.clone()), None);

    for i in 1..=5 {
        let (status, _) = call(&state, chat(&format!("message {i}"), "ctx")).await;
        assert_eq!(status, StatusCode::OK);
    }

    let first = provider.system_prompt(0);
    assert!(first.ends_with("\n\n"));
    assert!(!first.contains("Previous conversation context"));

    let last = provider.system_prompt(4);
    assert!(last.contains(
        "Previous conversation context:\n\
         User: message 2\nAurora: reply 2\n\
         User: message 3\nAurora: reply 3\n\
         User: message 4\nAurora: reply 4\n"
    ));
    assert!(!last.contains("message 1\n"));
}

#[tokio::test]
async fn e2e_backend_failure_degrades_and_keeps_history() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        Ok("fine".into()),
        Err(ProviderError::Timeout("30s elapsed".into())),
        Ok("back again".into()),
    ]));
    let store: Arc<dyn aurora_core::ConversationStore> = Arc::new(InMemoryStore::new());
    let state = state_with(Some(provider.clone()), Some(store.clone()));

    call(&state, chat("hello", "s")).await;
    let before = state.orchestrator.sessions().read("s");

    let (status, json) = call(&state, chat("hello again", "s")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["response"], FALLBACK_RESPONSE);
    assert!(json["error"].as_str().unwrap().contains("30s elapsed"));
    assert_eq!(state.orchestrator.sessions().read("s"), before);

    // The next prompt sees only the successful exchange.
    call(&state, chat("still there?", "s")).await;
    let prompt = provider.system_prompt(2);
    assert!(prompt.contains("User: hello\nAurora: fine\n"));
    assert!(!prompt.contains("hello again"));

    // Durable history carries all three, the degraded one annotated.
    let records = store.fetch_session("s").await.unwrap();
    assert_eq!(records.len(), 3);
    assert!(records[0].error.is_none());
    assert!(records[1].error.is_some());
    assert_eq!(records[1].ai_response, FALLBACK_RESPONSE);
}

#[tokio::test]
async fn e2e_unconfigured_backend_serves_fallback() {
    let state = state_with(None, Some(Arc::new(InMemoryStore::new())));

    let (status, json) = call(&state, chat("explain algebra", "s")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["response"], FALLBACK_RESPONSE);
    assert_eq!(json["persona_key"], "education");
    assert_eq!(json["error"], "AI client not available");
}

#[tokio::test]
async fn e2e_retention_bound_through_http() {
    let replies: Vec<String> = (0..MAX_EXCHANGES + 5).map(|i| format!("r{i}")).collect();
    let refs: Vec<&str> = replies.iter().map(String::as_str).collect();
    let provider = Arc::new(ScriptedProvider::texts(&refs));
    let state = state_with(Some(provider), None);

    for i in 0..MAX_EXCHANGES + 5 {
        call(&state, chat(&format!("m{i}"), "long")).await;
    }

    let history = state.orchestrator.sessions().read("long");
    assert_eq!(history.len(), MAX_EXCHANGES);
    assert_eq!(history.first().unwrap().user_message, "m5");
}

// ── E2E: Durable history with SQLite ─────────────────────────────────────

#[tokio::test]
async fn e2e_sqlite_history_sessions_and_clear() {
    let provider = Arc::new(ScriptedProvider::texts(&["a1", "a2", "b1"]));
    let store: Arc<dyn aurora_core::ConversationStore> =
        Arc::new(SqliteStore::new("sqlite::memory:").await.unwrap());
    let state = state_with(Some(provider), Some(store));

    call(&state, chat("hello", "alice")).await;
    call(&state, chat("I need help with homework", "alice")).await;
    call(&state, chat("hi", "bob")).await;

    let (status, json) = call(&state, get("/api/conversations/alice")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 2);
    assert_eq!(json["conversations"][0]["user_message"], "hello");
    assert_eq!(json["conversations"][1]["persona_used"], "education");

    let (status, json) = call(&state, get("/api/sessions")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_sessions"], 2);
    assert_eq!(json["sessions"][0]["session_id"], "bob");
    assert_eq!(json["sessions"][1]["message_count"], 2);
    assert_eq!(json["sessions"][1]["last_response"], "a2");

    let (status, json) = call(&state, delete("/api/conversations/alice")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["deleted_count"], 2);
    assert!(state.orchestrator.sessions().read("alice").is_empty());

    let (_, json) = call(&state, get("/api/conversations/alice")).await;
    assert_eq!(json["count"], 0);
    let (_, json) = call(&state, get("/api/sessions")).await;
    assert_eq!(json["total_sessions"], 1);
}

#[tokio::test]
async fn e2e_explicit_preference_and_catalog() {
    let provider = Arc::new(ScriptedProvider::texts(&["ok"]));
    let state = state_with(Some(provider.clone()), None);

    let (_, json) = call(
        &state,
        chat_with(serde_json::json!({
            "message": "I'm anxious about my homework",
            "session_id": "p",
            "persona_preference": "general"
        })),
    )
    .await;
    assert_eq!(json["persona_key"], "general");
    assert!(provider.system_prompt(0).starts_with("You are Aurora, a helpful"));

    let (status, json) = call(&state, get("/api/personas")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["mental_health"]["name"], "Mental Health Support");
    assert_eq!(json["education"]["keywords"].as_array().unwrap().len(), 14);
}

#[tokio::test]
async fn e2e_concurrent_sessions_do_not_interfere() {
    let replies: Vec<String> = (0..40).map(|i| format!("r{i}")).collect();
    let refs: Vec<&str> = replies.iter().map(String::as_str).collect();
    let provider = Arc::new(ScriptedProvider::texts(&refs));
    let state = state_with(Some(provider), None);

    let mut handles = Vec::new();
    for s in 0..4 {
        let state = state.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..10 {
                call(&state, chat(&format!("s{s} m{i}"), &format!("session-{s}"))).await;
            }
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    for s in 0..4 {
        let history = state.orchestrator.sessions().read(&format!("session-{s}"));
        assert_eq!(history.len(), 10);
        assert!(history.iter().all(|e| e.user_message.starts_with(&format!("s{s} "))));
    }
}

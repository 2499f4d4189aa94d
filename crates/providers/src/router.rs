//! Backend selection: builds the one generation backend from config.
//!
//! Returns `None` when no backend can be configured (no API key for a
//! hosted provider). The engine then degrades every request instead of
//! failing at startup.

use std::sync::Arc;
use std::time::Duration;

use aurora_core::provider::Provider;
use tracing::{info, warn};

use crate::openai_compat::OpenAiCompatProvider;

/// Providers that run locally and accept any key.
const KEYLESS_PROVIDERS: [&str; 3] = ["ollama", "vllm", "llamacpp"];

/// Build the generation backend from configuration.
pub fn build_from_config(config: &aurora_config::AppConfig) -> Option<Arc<dyn Provider>> {
    let keyless = KEYLESS_PROVIDERS.contains(&config.provider.as_str());

    let api_key = match (&config.api_key, keyless) {
        (Some(key), _) => key.clone(),
        (None, true) => config.provider.clone(),
        (None, false) => {
            warn!(
                provider = %config.provider,
                "No API key configured; generation backend unavailable"
            );
            return None;
        }
    };

    let base_url = config
        .api_url
        .clone()
        .unwrap_or_else(|| default_base_url(&config.provider));

    info!(provider = %config.provider, base_url = %base_url, "Generation backend configured");

    Some(Arc::new(OpenAiCompatProvider::new(
        &config.provider,
        base_url,
        api_key,
        Duration::from_secs(config.request_timeout_secs),
    )))
}

/// Get the default base URL for well-known providers.
fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "groq" => "https://api.groq.com/openai/v1".into(),
        "openai" => "https://api.openai.com/v1".into(),
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        "llamacpp" => "http://localhost:8080/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}

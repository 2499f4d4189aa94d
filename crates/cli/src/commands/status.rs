//! `aurora status`: Show system status.

use aurora_config::AppConfig;

pub async fn run(probe: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("🌅 Aurora Status");
    println!("================");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    println!("  Provider:     {}", config.provider);
    println!("  Model:        {}", config.model);
    println!("  Temperature:  {}", config.temperature);
    println!("  Max tokens:   {}", config.max_tokens);
    println!(
        "  API key:      {}",
        if config.has_api_key() { "configured" } else { "missing" }
    );
    println!("  Store:        {}", config.store.backend);
    if config.store.backend == "sqlite" {
        println!("  Database:     {}", config.store.path.display());
    }
    println!("  Gateway:      {}:{}", config.gateway.host, config.gateway.port);

    let backend = aurora_providers::build_from_config(&config);
    match &backend {
        Some(_) => println!("\n  ✅ Generation backend configured"),
        None => println!(
            "\n  ⚠️  No generation backend: set AURORA_API_KEY or GROQ_API_KEY (chat returns the fallback response until then)"
        ),
    }

    if probe {
        if let Some(provider) = backend {
            match provider.health_check().await {
                Ok(true) => println!("  ✅ {} reachable", provider.name()),
                Ok(false) => {
                    println!("  ⚠️  {} responded with an error status", provider.name())
                }
                Err(e) => println!("  ❌ {} unreachable: {e}", provider.name()),
            }
        }
    }

    if AppConfig::config_path().exists() {
        println!("  ✅ Config file found");
    } else {
        println!(
            "  ⚠️  No config file at {}, using defaults",
            AppConfig::config_path().display()
        );
    }

    Ok(())
}

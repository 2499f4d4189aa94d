//! `aurora chat`: interactive or single-message chat mode.

use std::io::Write;

use aurora_config::AppConfig;
use aurora_core::exchange::GenerationResult;
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(
    message: Option<String>,
    session: Option<String>,
    persona: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let state = aurora_gateway::build_state(&config).await;

    if !state.orchestrator.has_backend() {
        eprintln!();
        eprintln!("  WARNING: No API key configured; every reply will be the fallback message.");
        eprintln!("  Set AURORA_API_KEY or GROQ_API_KEY, or add api_key to:");
        eprintln!("    {}", AppConfig::config_path().display());
        eprintln!();
    }

    let session_id = session.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let preference = persona.as_deref();
    tracing::debug!(session_id = %session_id, preference = ?preference, "Chat session ready");

    if let Some(msg) = message {
        // Single message mode
        let msg = msg.trim();
        if msg.is_empty() {
            return Err("Message cannot be empty".into());
        }

        eprint!("  Thinking...");
        let (_, result) = state.handle_message(msg, &session_id, preference).await;
        eprint!("\r              \r");
        print_result(&result);
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║           Aurora  Interactive Mode           ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Provider:  {}", config.provider);
    println!("  Model:     {}", config.model);
    println!("  Session:   {session_id}");
    println!("  Persona:   {}", preference.unwrap_or("auto"));
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type '/clear' to reset context, 'exit' or Ctrl+D to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        match line {
            "" => continue,
            "exit" | "quit" => break,
            "/clear" => {
                state.orchestrator.clear_session(&session_id);
                println!("  (context cleared)");
                println!();
                continue;
            }
            _ => {}
        }

        eprint!("  ...");
        let (_, result) = state.handle_message(line, &session_id, preference).await;
        eprint!("\r     \r");
        println!();
        print_result(&result);
        println!();
    }

    Ok(())
}

fn print_result(result: &GenerationResult) {
    for line in result.response.lines() {
        println!("  Aurora [{}] > {line}", result.persona_name);
    }
    if let Some(failure) = &result.failure {
        eprintln!("  [degraded] {failure}");
    }
}

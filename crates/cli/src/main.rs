//! Aurora CLI: the main entry point.
//!
//! Commands:
//! - `serve`    : Start the HTTP API server
//! - `chat`     : Interactive chat or single-message mode
//! - `classify` : Show which persona a message routes to
//! - `personas` : List the persona catalog
//! - `status`   : Show effective configuration
//! - `config`   : Print, locate, or initialize the config file

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "aurora",
    about = "Aurora multi-persona AI assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Chat with Aurora
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Session ID to continue (a new one is generated otherwise)
        #[arg(short, long)]
        session: Option<String>,

        /// Persona key to use instead of automatic routing
        #[arg(short, long)]
        persona: Option<String>,
    },

    /// Show which persona a message would be routed to
    Classify {
        /// The message to classify
        message: String,
    },

    /// List available personas
    Personas,

    /// Show system status
    Status {
        /// Also check that the generation backend is reachable
        #[arg(long)]
        probe: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file path
    Path,
    /// Write a default config file if none exists
    Init,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Chat {
            message,
            session,
            persona,
        } => commands::chat::run(message, session, persona).await?,
        Commands::Classify { message } => commands::classify::run(&message)?,
        Commands::Personas => commands::personas::run()?,
        Commands::Status { probe } => commands::status::run(probe).await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show()?,
            ConfigAction::Path => commands::config_cmd::path()?,
            ConfigAction::Init => commands::config_cmd::init()?,
        },
    }

    Ok(())
}

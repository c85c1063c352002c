mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use palace::config::PalaceConfig;
use palace::server;

#[derive(Parser)]
#[command(name = "palace", version, about = "Memory-palace scene generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API server
    Serve,
    /// Generate and save a palace for a user
    Generate {
        /// User id the palace is saved under
        #[arg(long)]
        user: String,
        /// Concept to remember
        #[arg(long)]
        topic: String,
        /// Familiar place the concept is set in
        #[arg(long)]
        location: String,
        /// Target language code (en, hi, ta, ...)
        #[arg(long)]
        language: Option<String>,
    },
    /// List a user's saved palaces, newest first
    List {
        #[arg(long)]
        user: String,
    },
    /// Check database health and generator configuration
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = PalaceConfig::load()?;

    // Logs go to stderr so `generate` and `list` output stays pipeable.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => server::serve_http(config).await?,
        Command::Generate {
            user,
            topic,
            location,
            language,
        } => {
            cli::generate(&config, &user, &topic, &location, language.as_deref()).await?;
        }
        Command::List { user } => cli::list(&config, &user)?,
        Command::Doctor => cli::doctor(&config)?,
    }

    Ok(())
}

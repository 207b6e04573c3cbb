//! Main entry point for the Parley CLI.

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use shared::config::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

mod commands;

/// Parley CLI
#[derive(Parser)]
#[command(name = "parley")]
#[command(about = "Command-line client for Parley group chat", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the Parley CLI
#[derive(Subcommand)]
enum Commands {
    /// Join the room and chat interactively
    Chat {
        /// Base URL of the chat server (e.g., http://localhost:8080)
        #[arg(
            long,
            short,
            help = "Base URL of the chat server (e.g., http://localhost:8080). Overrides the configuration file."
        )]
        server: Option<Url>,

        /// Path to the configuration file (optional)
        #[arg(
            long,
            short,
            help = "Path to the configuration file (e.g., config.yaml or config.json). If not provided, defaults will be used."
        )]
        config: Option<PathBuf>,

        /// Display name to join under when no identity is persisted
        #[arg(
            long,
            short,
            help = "Display name to join under when no identity is persisted from a previous session."
        )]
        name: Option<String>,
    },

    /// Generate shell completion scripts for the CLI
    Completion {
        /// The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)
        #[arg(
            long,
            short,
            help = "The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)"
        )]
        shell: String,
    },

    /// Generate a configuration file
    Config {
        /// Format of the configuration file to generate (yaml or json). Defaults to yaml.
        #[arg(
            long,
            short,
            help = "Format of the configuration file to generate (yaml or json). Defaults to yaml."
        )]
        format: Option<String>,
    },
}

fn initialize_tracing(config: &Config) {
    let env_filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Chat {
            server,
            config,
            name,
        } => {
            let resolved_config = Config::load_config(config, server)?;
            initialize_tracing(&resolved_config);
            commands::chat::start_chat(resolved_config, name).await?;
        }
        Commands::Completion { shell } => {
            let shell = shell
                .parse::<clap_complete::Shell>()
                .map_err(|err| anyhow::anyhow!("invalid shell type: {err}"))?;
            commands::completion::generate_completion(shell);
        }
        Commands::Config { format } => {
            let format = format.unwrap_or_else(|| "yaml".to_string());
            commands::config::generate_config(&format)?;
        }
    }

    Ok(())
}

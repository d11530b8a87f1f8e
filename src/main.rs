//! Main entry point for DeepLX Translator CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deeplx_translator::cli::commands::{self, Commands};
use deeplx_translator::{ApiVersion, TranslatorConfig};

/// DeepLX Translator - resilient DeepL / DeepLX translation client
#[derive(Parser, Debug)]
#[command(name = "deeplx-translator", version, about, long_about = None)]
struct Args {
    /// API key (optional, defaults to DEEPL_API_KEY / DEEPLX_API_KEY env var)
    #[arg(long)]
    api_key: Option<String>,

    /// Base URL; a /v1 or /v2 suffix selects the API version
    #[arg(long)]
    base_url: Option<String>,

    /// API version: free, pro or official
    #[arg(long)]
    api_version: Option<ApiVersion>,

    /// JSON configuration file (overrides environment variables)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}={}", env!("CARGO_CRATE_NAME"), log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Execute command
    match args.command {
        Some(Commands::Translate {
            text,
            target_lang,
            source_lang,
            formality,
            json,
            detail,
        }) => {
            let mut config = match &args.config {
                Some(path) => TranslatorConfig::from_file(path)?,
                None => TranslatorConfig::from_env()?,
            };

            // Override config with CLI args if provided
            if let Some(api_key) = args.api_key {
                config.api_key = api_key;
            }
            if let Some(base_url) = args.base_url {
                config.base_url = Some(base_url);
            }
            if let Some(api_version) = args.api_version {
                config.api_version = Some(api_version);
            }

            commands::handle_translate(
                config,
                text,
                target_lang,
                source_lang,
                formality,
                json,
                detail,
            )
            .await?;
        }
        Some(Commands::Segment { text }) => {
            commands::handle_segment(text)?;
        }
        None => {
            println!("Please specify a command. Use --help for more information.");
        }
    }

    Ok(())
}

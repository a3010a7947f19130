//! Main entry point for Yandex Translator CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yandex_translator::cli::{self, commands::Commands};

/// Yandex Translator - batch translation from the command line
#[derive(Parser, Debug)]
#[command(name = "yandex-translator", version, about, long_about = None)]
struct Args {
    /// API key (optional, defaults to YANDEX_API_KEY env var)
    #[arg(long)]
    api_key: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        "debug".to_string()
    } else {
        "info".to_string()
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}={}", env!("CARGO_CRATE_NAME"), log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Override config with CLI args if provided
    if let Some(api_key) = args.api_key {
        std::env::set_var("YANDEX_API_KEY", api_key);
    }

    match args.command {
        Commands::Translate {
            file,
            output,
            from,
            to,
            format,
            options,
            max_batch_size,
        } => {
            cli::commands::handle_translate(file, output, from, to, format, options, max_batch_size)
                .await?;
        }
        Commands::Detect { text, hint } => {
            cli::commands::handle_detect(text, hint).await?;
        }
        Commands::Langs { ui } => {
            cli::commands::handle_langs(ui).await?;
        }
    }

    Ok(())
}

//! Sasha dev host
//!
//! Run with: cargo run -- serve
//!
//! # Commands
//!
//! - `serve` (default): demo host page, widget bundle and `/health`
//! - `probe --api <url>`: run the widget's health probe from the terminal
//! - `init-config`: print a commented default config file
//!
//! Configuration comes from `--config`, `./sasha.toml`, or the user config
//! dir, with `SASHA_*` environment overrides. `RUST_LOG` overrides the log
//! filter.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use sasha::api::{serve, AppState};
use sasha::config::{generate_default_config, Config, LoggingConfig};
use sasha::probe::{probe, DEFAULT_TIMEOUT};
use sasha::ProbeResult;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sasha", version, about = "Development host for the Sasha embeddable widget")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the demo host page, widget bundle and health endpoint
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
        /// Directory containing the wasm-pack output
        #[arg(long)]
        widget_dir: Option<String>,
        /// Backend base URL written into the demo page's data-api
        #[arg(long)]
        api: Option<String>,
    },
    /// Probe <api>/health the way the widget does
    Probe {
        /// Backend base URL (defaults to the configured widget api_base)
        #[arg(long)]
        api: Option<String>,
        /// Request timeout in seconds
        #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
        timeout_secs: u64,
    },
    /// Print a default config file
    InitConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    init_logging(&config.logging);

    match cli.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
        widget_dir: None,
        api: None,
    }) {
        Command::Serve {
            host,
            port,
            widget_dir,
            api,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(dir) = widget_dir {
                config.server.widget_dir = dir;
            }
            if let Some(api) = api {
                config.widget.api_base = api;
            }

            tracing::info!("Starting Sasha dev host v{}", env!("CARGO_PKG_VERSION"));
            if !std::path::Path::new(&config.server.widget_dir).exists() {
                tracing::warn!(
                    "Widget bundle directory {:?} not found; run `wasm-pack build sasha-widget --target web`",
                    config.server.widget_dir
                );
            }

            serve(AppState::new(config.server, config.widget)).await?;
        }
        Command::Probe { api, timeout_secs } => {
            let api = api.unwrap_or(config.widget.api_base);
            let result = probe(&api, Duration::from_secs(timeout_secs)).await;
            println!("{}", result.message());
            if matches!(result, ProbeResult::Unreachable(_) | ProbeResult::Error) {
                std::process::exit(1);
            }
        }
        Command::InitConfig => {
            print!("{}", generate_default_config());
        }
    }

    Ok(())
}

/// Initialize tracing from the logging config; `RUST_LOG` wins when set
fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("sasha={},tower_http=debug", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

//! promptgate CLI: entry point.
//!
//! # Commands
//!
//! - `promptgate serve [--logs] [--config PATH]`: run the HTTP gateway
//! - `promptgate status [--config PATH]`: show configuration and provider status
//! - `promptgate ask <PROMPT>`: send a prompt to a running gateway
//! - `promptgate breakdown <TASK>`: decompose a task via a running gateway
//! - `promptgate ping`: check that a gateway is reachable

mod client;
mod helpers;
mod status;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use promptgate_core::config::load_config;

use crate::client::{GatewayClient, DEFAULT_GATEWAY_URL};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// 🚪 promptgate: rate-limited gateway in front of LLM providers
#[derive(Parser)]
#[command(name = "promptgate", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,

        /// Config file (default: ~/.promptgate/config.json)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show configuration and provider status
    Status {
        /// Config file (default: ~/.promptgate/config.json)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Send a prompt to a running gateway
    Ask {
        prompt: String,

        /// Gateway base URL
        #[arg(long, env = "PROMPTGATE_URL", default_value = DEFAULT_GATEWAY_URL)]
        url: String,
    },

    /// Break a task down into small steps via a running gateway
    Breakdown {
        task: String,

        /// Gateway base URL
        #[arg(long, env = "PROMPTGATE_URL", default_value = DEFAULT_GATEWAY_URL)]
        url: String,
    },

    /// Check whether a gateway is reachable
    Ping {
        /// Gateway base URL
        #[arg(long, env = "PROMPTGATE_URL", default_value = DEFAULT_GATEWAY_URL)]
        url: String,
    },
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Credentials usually live in a local .env; a missing file is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { logs, config } => {
            init_logging(if logs { LogLevel::Verbose } else { LogLevel::Server });
            run_server(config).await
        }
        Commands::Status { config } => status::run(config.as_deref()),
        Commands::Ask { prompt, url } => {
            init_logging(LogLevel::Quiet);
            let client = GatewayClient::new(url)?;
            let reply = client.generate(&prompt).await?;
            helpers::print_response(&reply);
            Ok(())
        }
        Commands::Breakdown { task, url } => {
            init_logging(LogLevel::Quiet);
            let client = GatewayClient::new(url)?;
            let steps = client.breakdown_task(&task).await?;
            helpers::print_steps(&task, &steps);
            Ok(())
        }
        Commands::Ping { url } => {
            init_logging(LogLevel::Quiet);
            run_ping(url).await
        }
    }
}

async fn run_server(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path.as_deref());
    helpers::print_banner();
    println!("  Provider: {}", config.provider);
    println!("  Listening on http://{}", config.server.bind_address());
    println!();

    info!(provider = %config.provider, "starting gateway");
    promptgate_gateway::serve(&config).await
}

async fn run_ping(url: String) -> Result<()> {
    let client = GatewayClient::new(url)?;
    if client.test_connection().await {
        println!("{} {} is up", "✓".green(), client.base_url());
        Ok(())
    } else {
        println!("{} {} is not reachable", "✗".red(), client.base_url());
        bail!("gateway health check failed")
    }
}

// ─────────────────────────────────────────────
// Logging
// ─────────────────────────────────────────────

enum LogLevel {
    /// `--logs`: debug output from our crates and the HTTP layer.
    Verbose,
    /// Default for `serve`.
    Server,
    /// Client commands: warnings only.
    Quiet,
}

/// Initialize tracing/logging. `RUST_LOG` wins when set.
fn init_logging(level: LogLevel) {
    use tracing_subscriber::EnvFilter;

    let default = match level {
        LogLevel::Verbose => "promptgate=debug,tower_http=debug,info",
        LogLevel::Server => "info",
        LogLevel::Quiet => "warn",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

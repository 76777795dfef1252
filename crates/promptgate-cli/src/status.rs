//! `promptgate status`: show configuration and provider status.
//!
//! - Shows config path and active provider
//! - Shows API key status and model for each provider
//! - Shows listener, rate limit, and timeout settings

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use promptgate_core::config::{get_config_path, load_config};
use promptgate_providers::registry::PROVIDERS;

/// Run the status command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path);
    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);

    println!();
    println!("{}", "🚪 promptgate Status".cyan().bold());
    println!();

    // Config
    let config_exists = config_path.exists();
    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_exists {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );

    // Active provider
    let active_known = PROVIDERS.iter().any(|spec| spec.name == config.provider);
    println!(
        "  {:<18} {} {}",
        "Active provider:".bold(),
        config.provider,
        if active_known {
            String::new()
        } else {
            "(unsupported)".red().to_string()
        }
    );

    // Server
    println!(
        "  {:<18} {}",
        "Listen:".bold(),
        config.server.bind_address()
    );
    println!(
        "  {:<18} {}",
        "Rate limit:".bold(),
        format!(
            "{} requests / {}s per client",
            config.rate_limit.max_requests, config.rate_limit.window_secs
        )
        .dimmed(),
    );
    println!(
        "  {:<18} {}",
        "Request timeout:".bold(),
        format!("{}s", config.server.request_timeout_secs).dimmed(),
    );

    // Providers
    println!();
    println!("  {}", "Providers:".bold());
    let providers_map = config.providers.to_map();

    for spec in PROVIDERS {
        let prov_config = providers_map.get(spec.name).cloned().unwrap_or_default();
        let status = if prov_config.is_configured() {
            format!("{} (key set)", "✓".green())
        } else {
            format!("{}", format!("· not configured ({})", spec.env_key).dimmed())
        };
        let marker = if spec.name == config.provider { "▸" } else { " " };
        println!(
            "  {} {:<18} {} {}",
            marker,
            spec.display_name,
            format!("{:<28}", spec.model(&prov_config)).dimmed(),
            status
        );
    }

    println!();

    Ok(())
}

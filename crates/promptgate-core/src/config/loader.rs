//! Config loader: reads `~/.promptgate/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.promptgate/config.json` (or an explicit path)
//! 3. Plain deployment variables (`LLM_PROVIDER`, `OPENAI_API_KEY`, `PORT`, …)
//! 4. Structured variables `PROMPTGATE_<SECTION>__<FIELD>` (override everything)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Provider names that accept per-provider env overrides.
const PROVIDER_NAMES: &[&str] = &["gemini", "openai", "huggingface"];

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path (or `path`) + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(get_config_path);

    apply_env_overrides(load_config_from_path(&config_path))
}

/// Load config from a specific file path, without env overrides.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            Config::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path
        .map(PathBuf::from)
        .unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides from the process environment.
pub fn apply_env_overrides(config: Config) -> Config {
    apply_env_overrides_with(config, |key| std::env::var(key).ok())
}

/// Apply environment overrides using an arbitrary variable lookup.
///
/// Supported plain variables:
/// - `LLM_PROVIDER` → `provider`
/// - `<NAME>_API_KEY` → `providers.<name>.api_key`
/// - `HUGGINGFACE_MODEL` → `providers.huggingface.model`
/// - `PORT` → `server.port`
///
/// Supported structured variables (double underscore as delimiter):
/// - `PROMPTGATE_PROVIDER` → `provider`
/// - `PROMPTGATE_PROVIDERS__<NAME>__API_KEY|API_BASE|MODEL`
/// - `PROMPTGATE_SERVER__HOST|PORT|REQUEST_TIMEOUT_SECS`
/// - `PROMPTGATE_RATE_LIMIT__WINDOW_SECS|MAX_REQUESTS`
///
/// Numeric values that fail to parse are ignored.
pub fn apply_env_overrides_with<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    // Plain deployment variables
    if let Some(val) = lookup("LLM_PROVIDER") {
        config.provider = val;
    }
    for name in PROVIDER_NAMES {
        let upper = name.to_uppercase();
        if let (Some(val), Some(provider)) = (
            lookup(&format!("{upper}_API_KEY")),
            config.providers.get_by_name_mut(name),
        ) {
            provider.api_key = val;
        }
    }
    if let Some(val) = lookup("HUGGINGFACE_MODEL") {
        config.providers.huggingface.model = Some(val);
    }
    if let Some(port) = lookup("PORT").and_then(|v| v.parse::<u16>().ok()) {
        config.server.port = port;
    }

    // Structured overrides
    if let Some(val) = lookup("PROMPTGATE_PROVIDER") {
        config.provider = val;
    }
    for name in PROVIDER_NAMES {
        let upper = name.to_uppercase();
        let Some(provider) = config.providers.get_by_name_mut(name) else {
            continue;
        };
        if let Some(val) = lookup(&format!("PROMPTGATE_PROVIDERS__{upper}__API_KEY")) {
            provider.api_key = val;
        }
        if let Some(val) = lookup(&format!("PROMPTGATE_PROVIDERS__{upper}__API_BASE")) {
            provider.api_base = Some(val);
        }
        if let Some(val) = lookup(&format!("PROMPTGATE_PROVIDERS__{upper}__MODEL")) {
            provider.model = Some(val);
        }
    }

    if let Some(val) = lookup("PROMPTGATE_SERVER__HOST") {
        config.server.host = val;
    }
    if let Some(port) = lookup("PROMPTGATE_SERVER__PORT").and_then(|v| v.parse::<u16>().ok()) {
        config.server.port = port;
    }
    if let Some(secs) = lookup("PROMPTGATE_SERVER__REQUEST_TIMEOUT_SECS")
        .and_then(|v| v.parse::<u64>().ok())
    {
        config.server.request_timeout_secs = secs;
    }

    if let Some(secs) = lookup("PROMPTGATE_RATE_LIMIT__WINDOW_SECS")
        .and_then(|v| v.parse::<u64>().ok())
    {
        config.rate_limit.window_secs = secs;
    }
    if let Some(max) = lookup("PROMPTGATE_RATE_LIMIT__MAX_REQUESTS")
        .and_then(|v| v.parse::<u32>().ok())
    {
        config.rate_limit.max_requests = max;
    }

    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

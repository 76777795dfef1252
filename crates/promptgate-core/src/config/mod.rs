//! Configuration system: schema, loading, and env var overrides.
//!
//! # Usage
//! ```no_run
//! use promptgate_core::config;
//!
//! let cfg = config::load_config(None);
//! println!("Provider: {}", cfg.provider);
//! ```

pub mod loader;
pub mod schema;

// Re-export key types
pub use loader::{
    apply_env_overrides, apply_env_overrides_with, get_config_path, load_config, save_config,
};
pub use schema::{Config, ProviderConfig, ProvidersConfig, RateLimitConfig, ServerConfig};

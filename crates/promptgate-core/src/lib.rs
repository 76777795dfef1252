//! Core building blocks for promptgate.
//!
//! - [`config`]: typed configuration, JSON file + environment loading
//! - [`types`]: the uniform response envelope and request bodies
//! - [`breakdown`]: task-decomposition prompt template and step parser
//! - [`utils`]: paths, timestamps, string helpers

pub mod breakdown;
pub mod config;
pub mod types;
pub mod utils;

pub use config::Config;
pub use types::{BreakdownRequest, GenerationRequest, GenerationResult, HealthStatus};

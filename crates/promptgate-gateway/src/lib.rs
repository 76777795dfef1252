//! Request gateway: the pipeline between an HTTP caller and an LLM provider.
//!
//! Per request: rate-limit gate → validation → provider resolution →
//! adapter call (bounded by a deadline) → uniform envelope.
//!
//! - [`rate_limit`]: fixed-window counter keyed by client address
//! - [`validator`]: body shape and bound checks
//! - [`classify`]: raw backend error → caller-facing category
//! - [`gateway::Gateway`]: orchestration shared by both LLM endpoints
//! - [`server`]: axum router and listener

pub mod classify;
pub mod error;
pub mod gateway;
pub mod rate_limit;
pub mod server;
pub mod validator;

pub use error::GatewayError;
pub use gateway::{Breakdown, Gateway, Generation};
pub use rate_limit::{FixedWindowLimiter, RateDecision};
pub use server::{router, serve, AppState};

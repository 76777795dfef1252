//! HTTP surface: axum router, handlers, rate-limit middleware, and the
//! listener with graceful shutdown.
//!
//! ```text
//! GET  /                   health
//! POST /api/ai/generate    {prompt}  ─┐ rate limited
//! POST /api/ai/breakdown   {task}    ─┘
//! *                        404 envelope
//! ```

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use tokio::signal;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use promptgate_core::{Config, GenerationResult, HealthStatus};
use promptgate_providers::ProviderRegistry;

use crate::error::GatewayError;
use crate::gateway::Gateway;
use crate::rate_limit::{FixedWindowLimiter, RateDecision};
use crate::validator;

/// Key shared by requests that carry no peer address.
const UNKNOWN_CLIENT: &str = "unknown";

const RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
const RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
const RATELIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");
const RATELIMIT_POLICY: HeaderName = HeaderName::from_static("ratelimit-policy");

// ─────────────────────────────────────────────
// State
// ─────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
    pub limiter: Arc<FixedWindowLimiter>,
}

impl AppState {
    pub fn new(gateway: Gateway, limiter: FixedWindowLimiter) -> Self {
        Self {
            gateway: Arc::new(gateway),
            limiter: Arc::new(limiter),
        }
    }

    /// Build the registry, gateway, and limiter from configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.server.request_timeout_secs);
        let registry = ProviderRegistry::from_config(&config.providers, timeout)
            .context("failed to build provider registry")?;

        if !registry.is_available(&config.provider) {
            warn!(
                provider = %config.provider,
                "active provider is unknown or has no API key; generation requests will fail"
            );
        }

        let gateway = Gateway::new(registry, config.provider.clone(), timeout);
        let limiter = FixedWindowLimiter::new(
            Duration::from_secs(config.rate_limit.window_secs),
            config.rate_limit.max_requests,
        );
        Ok(Self::new(gateway, limiter))
    }
}

// ─────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────

pub fn router(state: AppState) -> Router {
    let gated = Router::new()
        .route("/api/ai/generate", post(generate_handler))
        .route("/api/ai/breakdown", post(breakdown_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit_layer));

    Router::new()
        .route("/", get(health_handler))
        .merge(gated)
        .fallback(not_found_handler)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus::ok(state.gateway.provider_id()))
}

async fn generate_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<GenerationResult>, GatewayError> {
    let Json(body) = payload?;
    let request = validator::validate_prompt(&body)?;
    let generation = state.gateway.generate(&request.prompt).await?;
    Ok(Json(generation.into_result()))
}

async fn breakdown_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<GenerationResult>, GatewayError> {
    let Json(body) = payload?;
    let request = validator::validate_task(&body)?;
    let breakdown = state.gateway.breakdown(&request.task).await?;
    Ok(Json(breakdown.into_result()))
}

async fn not_found_handler() -> GatewayError {
    GatewayError::RouteNotFound
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    error!(panic = detail, "request handler panicked");
    GatewayError::Unhandled.into_response()
}

// ─────────────────────────────────────────────
// Rate limiting
// ─────────────────────────────────────────────

/// Middleware gating the LLM routes. Runs before body extraction, so a
/// rejected request is never validated and never reaches an adapter.
pub async fn rate_limit_layer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let key = client_key(&req);
    let decision = state.limiter.check(&key);

    let mut response = if decision.allowed {
        next.run(req).await
    } else {
        warn!(client = %key, limit = decision.limit, "rate limit exceeded");
        GatewayError::RateLimited.into_response()
    };

    apply_rate_limit_headers(response.headers_mut(), &decision, &state.limiter.policy());
    response
}

fn client_key(req: &Request) -> String {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn apply_rate_limit_headers(headers: &mut HeaderMap, decision: &RateDecision, policy: &str) {
    let reset = decision.reset_secs();
    if let Ok(policy) = HeaderValue::from_str(policy) {
        headers.insert(RATELIMIT_POLICY, policy);
    }
    headers.insert(RATELIMIT_LIMIT, HeaderValue::from(decision.limit));
    headers.insert(RATELIMIT_REMAINING, HeaderValue::from(decision.remaining));
    headers.insert(RATELIMIT_RESET, HeaderValue::from(reset));
    if !decision.allowed {
        headers.insert(RETRY_AFTER, HeaderValue::from(reset));
    }
}

// ─────────────────────────────────────────────
// Listener
// ─────────────────────────────────────────────

/// Bind `server.host:server.port` and serve until Ctrl+C / SIGTERM.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let state = AppState::from_config(config)?;
    let addr = config.server.bind_address();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(
        address = %addr,
        provider = %config.provider,
        window_secs = config.rate_limit.window_secs,
        max_requests = config.rate_limit.max_requests,
        "gateway listening"
    );

    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

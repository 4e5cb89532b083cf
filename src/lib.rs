//! tokengate - token-based authentication and session revocation for a
//! two-service deployment.
//!
//! An authority service authenticates users and issues short-lived access
//! tokens plus longer-lived refresh tokens; a resource service validates
//! those tokens per request. Both services share this library, so the token
//! protocol exists exactly once:
//! - HMAC-SHA256 signed tokens with per-type secrets
//! - session ids as the unit of revocation
//! - a tiered (memory + redb) revocation store with TTL records
//! - best-effort revocation propagation between the services
//! - a fixed role hierarchy for authorization

pub mod api;
pub mod authz;
pub mod config;
pub mod expiration;
pub mod propagation;
pub mod store;
#[cfg(test)]
pub mod testutil;
pub mod tokens;
pub mod users;

use std::sync::Arc;

use config::Config;
use propagation::RevocationPropagator;
use store::RevocationStore;
use tokens::{TokenIssuer, TokenValidator};
use users::UserDirectory;

/// The validation side of the protocol, identical in both services.
pub struct AuthContext {
    pub validator: TokenValidator,
    pub store: Arc<dyn RevocationStore>,
    pub users: Arc<dyn UserDirectory>,
}

/// Shared state of the authority service.
pub struct AuthorityState {
    pub auth: Arc<AuthContext>,
    pub config: Config,
    pub issuer: TokenIssuer,
    /// `None` disables cross-service propagation (single-service mode).
    pub propagator: Option<RevocationPropagator>,
}

/// Shared state of the resource service.
pub struct ResourceState {
    pub auth: Arc<AuthContext>,
    pub config: Config,
}

/// Initialize the tracing subscriber; `LOG_FORMAT=json` switches to
/// structured output.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format.eq_ignore_ascii_case("json") {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_span_list(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Resolve when SIGINT or SIGTERM arrives.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}

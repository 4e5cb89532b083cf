use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use tokengate::config::Config;
use tokengate::propagation::RevocationPropagator;
use tokengate::store::{RedbRevocationStore, RevocationStore, TieredRevocationStore};
use tokengate::tokens::{TokenCodec, TokenIssuer, TokenValidator};
use tokengate::users::{MemoryUserDirectory, UserDirectory};
use tokengate::{api, expiration, AuthContext, AuthorityState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tokengate::init_tracing();
    info!(version = env!("CARGO_PKG_VERSION"), "authority service starting");

    let config = Config::load()?;

    let durable = RedbRevocationStore::open(&config.node.data_dir)?;
    let store: Arc<dyn RevocationStore> = Arc::new(TieredRevocationStore::new(durable));
    info!("Revocation store opened at: {}", config.node.data_dir);

    let codec = Arc::new(TokenCodec::new(
        config.tokens.access_secret.clone(),
        config.tokens.refresh_secret.clone(),
    ));
    let issuer = TokenIssuer::new(Arc::clone(&codec), &config.tokens);
    let validator = TokenValidator::new(codec, Arc::clone(&store));

    let users: Arc<dyn UserDirectory> = Arc::new(build_directory(&config));

    let propagator = match &config.propagation.resource_url {
        Some(url) => {
            info!(resource_url = %url, "Revocation propagation enabled");
            Some(RevocationPropagator::new(
                url.clone(),
                Duration::from_millis(config.propagation.timeout_ms),
            )?)
        }
        None => {
            info!("No resource service configured; propagation disabled");
            None
        }
    };

    // Push the seeded admin to the resource service so it can resolve the
    // admin's role. The seed always lands at id 1.
    if let Some(propagator) = &propagator {
        if let Some(admin) = users.find(1) {
            if let Err(e) = propagator.notify_user_created(&admin).await {
                tracing::warn!(
                    error = %e,
                    "Failed to announce seeded admin (resource service may not be up yet)"
                );
            }
        }
    }

    let auth = Arc::new(AuthContext {
        validator,
        store: Arc::clone(&store),
        users,
    });

    let cleaner = expiration::start_revocation_cleaner(
        store,
        Duration::from_secs(config.tokens.cleanup_interval_seconds),
    );

    let state = Arc::new(AuthorityState {
        auth,
        config: config.clone(),
        issuer,
        propagator,
    });

    let app = api::authority_router(state);
    let listener = tokio::net::TcpListener::bind(&config.node.bind_address).await?;
    info!("Listening on: {}", config.node.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(tokengate::shutdown_signal())
        .await?;

    cleaner.abort();
    info!("Shutdown complete");
    Ok(())
}

fn build_directory(config: &Config) -> MemoryUserDirectory {
    match (&config.seed.admin_username, &config.seed.admin_password) {
        (Some(username), Some(password)) => {
            info!(username = %username, "Seeding bootstrap admin");
            MemoryUserDirectory::with_admin(username, password)
        }
        _ => {
            tracing::warn!("No seed admin configured; logins will fail until users exist");
            MemoryUserDirectory::new()
        }
    }
}

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use tokengate::config::Config;
use tokengate::store::{RedbRevocationStore, RevocationStore, TieredRevocationStore};
use tokengate::tokens::{TokenCodec, TokenValidator};
use tokengate::users::{MemoryUserDirectory, UserDirectory};
use tokengate::{api, expiration, AuthContext, ResourceState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tokengate::init_tracing();
    info!(version = env!("CARGO_PKG_VERSION"), "resource service starting");

    let config = Config::load()?;

    let durable = RedbRevocationStore::open(&config.node.data_dir)?;
    let store: Arc<dyn RevocationStore> = Arc::new(TieredRevocationStore::new(durable));
    info!("Revocation store opened at: {}", config.node.data_dir);

    let codec = Arc::new(TokenCodec::new(
        config.tokens.access_secret.clone(),
        config.tokens.refresh_secret.clone(),
    ));
    let validator = TokenValidator::new(codec, Arc::clone(&store));

    // Populated over the internal channel by the authority service.
    let users: Arc<dyn UserDirectory> = Arc::new(MemoryUserDirectory::new());

    let auth = Arc::new(AuthContext {
        validator,
        store: Arc::clone(&store),
        users,
    });

    let cleaner = expiration::start_revocation_cleaner(
        store,
        Duration::from_secs(config.tokens.cleanup_interval_seconds),
    );

    let state = Arc::new(ResourceState {
        auth,
        config: config.clone(),
    });

    let app = api::resource_router(state);
    let listener = tokio::net::TcpListener::bind(&config.node.bind_address).await?;
    info!("Listening on: {}", config.node.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(tokengate::shutdown_signal())
        .await?;

    cleaner.abort();
    info!("Shutdown complete");
    Ok(())
}

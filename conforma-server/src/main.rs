use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use conforma_auth::SessionTokens;
use conforma_server::{bootstrap, build_router, listen, AppState, ServerConfig};
use conforma_store::MemStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env();

    let tokens = SessionTokens::new(&config.jwt_secret).with_ttl_secs(config.token_ttl_secs);
    let state = AppState::new(Arc::new(MemStore::new()), tokens);

    bootstrap::ensure_admin(&state, &config).await?;

    let addr = config.addr();
    tracing::info!("conforma-server listening on http://{addr}");
    listen(build_router(state), addr).await
}

//! Server binary entry point.

use aide_server::{create_app, create_state, init_tracing, Config};
use data_store::SqliteDataStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(&config.log_level);

    tracing::info!(database_url = %config.database_url, "Connecting to database");
    let store = SqliteDataStore::connect(&config.database_url).await?;

    let addr = config.server_addr();
    let state = create_state(config, store);
    let app = create_app(state);

    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

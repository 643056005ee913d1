mod config;
mod envelope;
mod error;
mod payload;
mod routes;

use std::sync::Arc;

use config::{AppConfig, DatabaseLocation};
use routes::{app_router, AppState};
use voucher_core::Database;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Only load .env in development; production uses platform-native env injection.
    #[cfg(debug_assertions)]
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("voucher_api=info".parse()?),
        )
        .init();

    let config = Arc::new(AppConfig::from_env()?);
    tracing::info!("Starting voucher-api with config: {:?}", config);

    let db = match &config.database {
        DatabaseLocation::InMemory => Database::open_in_memory()?,
        DatabaseLocation::File(path) => Database::open(path)?,
    };

    let bind_addr = config.bind_addr.clone();
    let router = app_router(AppState::new(config, db));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("voucher-api listening on {}", bind_addr);
    axum::serve(listener, router).await?;
    Ok(())
}

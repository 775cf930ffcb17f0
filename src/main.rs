use anyhow::Context;

use readlist_api::database::DatabaseManager;
use readlist_api::{init_tracing, server, AppConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = AppConfig::from_env().context("loading configuration")?;
    tracing::info!("Starting Readlist API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("connecting to database")?;
    DatabaseManager::migrate(&pool).await.context("running migrations")?;

    server::serve(AppState::new(pool, config)).await?;
    Ok(())
}

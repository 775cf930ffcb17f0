use crate::cli::open_database;
use crate::config::AppConfig;
use crate::server;
use crate::state::AppState;

pub async fn handle(mut config: AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.api.port = port;
    }
    tracing::info!("Starting Readlist API in {:?} mode", config.environment);

    let pool = open_database(&config).await?;
    server::serve(AppState::new(pool, config)).await?;
    Ok(())
}

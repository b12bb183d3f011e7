use anyhow::Result;
use api::{build_router, jobs, AppState};
use migration::{Migrator, MigratorTrait};
use shared::{get_db_connection, init_tracing, Config};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config);

    info!("Starting {} v{}...", config.app_name, config.version);

    let db = get_db_connection(&config).await?;
    info!("Connected to database");
    Migrator::up(&db, None).await?;
    info!("Database migrations applied");

    let state = AppState::with_database(config.clone(), db);
    let _snapshots = jobs::spawn_snapshot_job(state.valuation.clone(), config.snapshot_interval_secs);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("API server listening on http://{}", address);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}

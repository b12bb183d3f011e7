use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::Config;
use crate::error::Result;

pub async fn get_db_connection(config: &Config) -> Result<DatabaseConnection> {
    info!("Connecting to database via Sea-ORM");
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(10)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(config.database_echo);
    let db = Database::connect(options).await?;
    Ok(db)
}

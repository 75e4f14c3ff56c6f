use crate::config::Config;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Opens the pooled connection shared by every data-access call.
#[tracing::instrument(skip(config), fields(environment = %config.environment))]
pub async fn connect(config: &Config) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options.sqlx_logging(false);

    let db = Database::connect(options).await?;
    tracing::info!("Connected to database");
    Ok(db)
}

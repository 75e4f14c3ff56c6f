use migration::{Migrator, MigratorTrait};
use sea_orm::{DatabaseConnection, DbErr};

/// Errors surfaced by the migration runner.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Error while migration up: {0}")]
    Up(#[source] DbErr),
    #[error("Error while migration down: {0}")]
    Down(#[source] DbErr),
}

/// Applies and reverts the schema migrations against one database.
pub struct MigrationRunner<'a> {
    db: &'a DatabaseConnection,
}

impl MigrationRunner<'_> {
    pub fn new(db: &DatabaseConnection) -> MigrationRunner<'_> {
        MigrationRunner { db }
    }

    /// Applies every pending migration in version order.
    #[tracing::instrument(skip(self))]
    pub async fn up(&self) -> Result<(), MigrationError> {
        let pending = self.pending().await.map_err(MigrationError::Up)?;
        if pending.is_empty() {
            tracing::info!("Database schema is up to date");
            return Ok(());
        }
        for name in &pending {
            tracing::info!("Applying migration {}", name);
        }

        Migrator::up(self.db, None)
            .await
            .map_err(MigrationError::Up)?;
        tracing::info!("Migration successful");
        Ok(())
    }

    /// Reverts the most recently applied migration.
    #[tracing::instrument(skip(self))]
    pub async fn down(&self) -> Result<(), MigrationError> {
        let applied = self.applied().await.map_err(MigrationError::Down)?;
        let Some(latest) = applied.last() else {
            tracing::warn!("No applied migration to roll back");
            return Ok(());
        };
        tracing::info!("Reverting migration {}", latest);

        Migrator::down(self.db, Some(1))
            .await
            .map_err(MigrationError::Down)?;
        tracing::info!("Migration successful");
        Ok(())
    }

    /// Names of migrations not yet applied, oldest first.
    pub async fn pending(&self) -> Result<Vec<String>, DbErr> {
        let migrations = Migrator::get_pending_migrations(self.db).await?;
        Ok(migrations.iter().map(|m| m.name().to_string()).collect())
    }

    /// Names of migrations already applied, oldest first.
    pub async fn applied(&self) -> Result<Vec<String>, DbErr> {
        let migrations = Migrator::get_applied_migrations(self.db).await?;
        Ok(migrations.iter().map(|m| m.name().to_string()).collect())
    }
}

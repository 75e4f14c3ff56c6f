use sea_orm::{Database, DatabaseConnection};
use testcontainers_modules::testcontainers::runners::AsyncRunner;
use testcontainers_modules::{postgres, testcontainers};
use todo_list::migrate::MigrationRunner;

pub async fn setup_container() -> anyhow::Result<testcontainers::ContainerAsync<postgres::Postgres>>
{
    let container = postgres::Postgres::default().start().await?;
    Ok(container)
}

pub async fn database_url(
    container: &testcontainers::ContainerAsync<postgres::Postgres>,
) -> anyhow::Result<String> {
    let host = container.get_host().await?;
    let port = container.get_host_port_ipv4(5432).await?;
    Ok(format!("postgres://postgres:postgres@{}:{}/postgres", host, port))
}

pub async fn setup_db(
    container: &testcontainers::ContainerAsync<postgres::Postgres>,
) -> anyhow::Result<DatabaseConnection> {
    let db = Database::connect(&database_url(container).await?).await?;
    MigrationRunner::new(&db).up().await?;
    Ok(db)
}

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::task::TaskState;
use crate::task::api::create_api_router;
use crate::task::web::create_task_page_router;

#[tracing::instrument(skip(config, db))]
pub async fn start_web_server(config: &Config, db: DatabaseConnection) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!(
        "{} v{} running on http://{}",
        config.app_name,
        config.app_version,
        server_address
    );

    let app = create_app(config, db);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Builds the full application router around one database connection.
pub fn create_app(config: &Config, db: DatabaseConnection) -> Router {
    let task_state = Arc::new(TaskState {
        db: Arc::new(db),
        app_name: config.app_name.clone(),
    });

    Router::new()
        .route("/health", axum::routing::get(health_check_handler))
        .merge(create_task_page_router(task_state.clone()))
        .merge(create_api_router(task_state))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}

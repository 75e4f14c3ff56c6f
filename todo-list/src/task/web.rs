use crate::task::{Task, TaskRepository, TaskService, TaskServiceError, TaskState};
use askama::Template;
use axum::{Router, extract::State, http::StatusCode, response::Html, routing::get};
use std::sync::Arc;

/// Custom error type for task page handlers.
#[derive(Debug, thiserror::Error)]
pub enum TaskPageError {
    /// Represents an error during template rendering.
    #[error("Template rendering failed")]
    Template(#[from] askama::Error),
    /// Represents a failure loading tasks.
    #[error("Failed to load tasks")]
    Task(#[from] TaskServiceError),
}

impl axum::response::IntoResponse for TaskPageError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!("Task page failed: {:?}", self);
        let user_facing_error_message =
            "An unexpected error occurred while processing your request. Please try again later.";
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(format!(
                "<h1>Internal Server Error</h1><p>{}</p>",
                user_facing_error_message
            )),
        )
            .into_response()
    }
}

#[derive(Template)]
#[template(path = "tasks/tasks.html")]
struct TasksTemplate {
    app_name: String,
    tasks: Vec<Task>,
}

impl TasksTemplate {
    pub fn new(app_name: String, tasks: Vec<Task>) -> Self {
        Self { app_name, tasks }
    }
}

/// Handler for the / endpoint that displays all tasks in a table.
#[tracing::instrument(skip(state))]
async fn tasks_page_handler(
    State(state): State<Arc<TaskState>>,
) -> Result<Html<String>, TaskPageError> {
    let service = TaskService::new(&state.db);
    let tasks = service.show_all().await?;
    let template = TasksTemplate::new(state.app_name.clone(), tasks);
    template.render().map(Html).map_err(TaskPageError::from)
}

/// Creates and returns the router serving the HTML task list.
pub fn create_task_page_router(state: Arc<TaskState>) -> Router {
    Router::new()
        .route("/", get(tasks_page_handler))
        .with_state(state)
}

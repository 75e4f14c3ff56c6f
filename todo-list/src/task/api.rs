use crate::task::{Task, TaskRepository, TaskService, TaskServiceError, TaskState};
use axum::{
    Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use axum_extra::extract::WithRejection;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// JSON representation of a Task for API responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskJson {
    task_id: i32,
    task: String,
    created_at: NaiveDate,
    status: bool,
}

impl From<Task> for TaskJson {
    fn from(task: Task) -> Self {
        Self {
            task_id: task.id(),
            task: task.text().to_string(),
            created_at: task.created_at(),
            status: task.is_done(),
        }
    }
}

/// API response for listing all tasks.
#[derive(Debug, Serialize)]
pub struct TasksResponse {
    tasks: Vec<TaskJson>,
    count: usize,
}

/// API response for a newly created task.
#[derive(Debug, Serialize)]
pub struct CreatedTaskResponse {
    task_id: i32,
}

/// Request body for creating or updating a task.
#[derive(Debug, Deserialize)]
pub struct TaskPayload {
    task: String,
}

/// JSON response for API errors
#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for TaskServiceError {
    fn into_response(self) -> Response {
        let (status_code, error) = match &self {
            TaskServiceError::EmptyTask | TaskServiceError::EmptyUpdate => {
                (StatusCode::BAD_REQUEST, "EMPTY_TASK")
            }
            TaskServiceError::TaskNotFound(_) => (StatusCode::NOT_FOUND, "TASK_NOT_FOUND"),
            TaskServiceError::Database(err) => {
                tracing::error!("Task operation failed: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR")
            }
        };
        let message = match self {
            TaskServiceError::Database(_) => {
                "An unexpected error occurred while processing your request. Please try again later."
                    .to_string()
            }
            other => other.to_string(),
        };

        (
            status_code,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

/// Error type for API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A task operation failed.
    #[error(transparent)]
    Task(#[from] TaskServiceError),
    /// The request body could not be read as a task payload.
    #[error(transparent)]
    InvalidBody(#[from] JsonRejection),
    /// The task ID in the path is not a number.
    #[error(transparent)]
    InvalidId(#[from] PathRejection),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error, message) = match self {
            ApiError::Task(err) => return err.into_response(),
            ApiError::InvalidBody(rejection) => {
                (rejection.status(), "INVALID_BODY", rejection.body_text())
            }
            ApiError::InvalidId(rejection) => {
                (StatusCode::BAD_REQUEST, "INVALID_ID", rejection.body_text())
            }
        };

        (
            status_code,
            Json(ErrorResponse {
                error: error.to_string(),
                message,
            }),
        )
            .into_response()
    }
}

/// Handler for GET /api/v1/tasks - Returns all tasks.
#[tracing::instrument(skip(state))]
pub async fn list_tasks_handler(
    State(state): State<Arc<TaskState>>,
) -> Result<Json<TasksResponse>, ApiError> {
    let service = TaskService::new(&state.db);
    let tasks: Vec<TaskJson> = service
        .show_all()
        .await?
        .into_iter()
        .map(TaskJson::from)
        .collect();
    let count = tasks.len();
    Ok(Json(TasksResponse { tasks, count }))
}

/// Handler for POST /api/v1/tasks - Creates a task.
#[tracing::instrument(skip(state))]
pub async fn create_task_handler(
    State(state): State<Arc<TaskState>>,
    WithRejection(Json(payload), _): WithRejection<Json<TaskPayload>, ApiError>,
) -> Result<(StatusCode, Json<CreatedTaskResponse>), ApiError> {
    let service = TaskService::new(&state.db);
    let task_id = service.create(&payload.task).await?;
    Ok((StatusCode::CREATED, Json(CreatedTaskResponse { task_id })))
}

/// Handler for GET /api/v1/tasks/{id} - Returns a single task.
#[tracing::instrument(skip(state))]
pub async fn get_task_handler(
    State(state): State<Arc<TaskState>>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ApiError>,
) -> Result<Json<TaskJson>, ApiError> {
    let service = TaskService::new(&state.db);
    let task = service.read(id).await?;
    Ok(Json(TaskJson::from(task)))
}

/// Handler for PUT /api/v1/tasks/{id} - Replaces the text of a task.
#[tracing::instrument(skip(state))]
pub async fn update_task_handler(
    State(state): State<Arc<TaskState>>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<TaskPayload>, ApiError>,
) -> Result<StatusCode, ApiError> {
    let service = TaskService::new(&state.db);
    service.update(id, &payload.task).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST /api/v1/tasks/{id}/done - Marks a task as done.
#[tracing::instrument(skip(state))]
pub async fn mark_done_handler(
    State(state): State<Arc<TaskState>>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ApiError>,
) -> Result<StatusCode, ApiError> {
    let service = TaskService::new(&state.db);
    service.mark_done(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for DELETE /api/v1/tasks/{id} - Deletes a task.
#[tracing::instrument(skip(state))]
pub async fn delete_task_handler(
    State(state): State<Arc<TaskState>>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ApiError>,
) -> Result<StatusCode, ApiError> {
    let service = TaskService::new(&state.db);
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Creates and returns the tasks API router.
pub fn create_api_router(state: Arc<TaskState>) -> Router {
    Router::new()
        .route(
            "/api/v1/tasks",
            get(list_tasks_handler).post(create_task_handler),
        )
        .route(
            "/api/v1/tasks/{id}",
            get(get_task_handler)
                .put(update_task_handler)
                .delete(delete_task_handler),
        )
        .route("/api/v1/tasks/{id}/done", post(mark_done_handler))
        .with_state(state)
}

use crate::entities::*;
use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub mod api;
pub mod web;

#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub struct Task {
    id: i32,
    text: String,
    created_at: NaiveDate,
    done: bool,
}

impl Task {
    pub fn new(id: i32, text: String, created_at: NaiveDate, done: bool) -> Self {
        Self {
            id,
            text,
            created_at,
            done,
        }
    }

    /// Returns the ID of the task.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Returns the task text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the date the task was created.
    pub fn created_at(&self) -> NaiveDate {
        self.created_at
    }

    /// Returns whether the task has been marked as done.
    pub fn is_done(&self) -> bool {
        self.done
    }
}

impl From<task::Model> for Task {
    fn from(model: task::Model) -> Self {
        Task::new(model.task_id, model.task, model.created_at, model.status)
    }
}

impl Display for Task {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mark = if self.done { "x" } else { " " };
        write!(
            f,
            "#{} [{}] {} (created {})",
            self.id, mark, self.text, self.created_at
        )
    }
}

/// Error type for task operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    /// Represents an attempt to create a task with no text.
    #[error("Cannot create an empty task")]
    EmptyTask,
    /// Represents an attempt to replace a task's text with nothing.
    #[error("Cannot update with an empty task")]
    EmptyUpdate,
    /// Represents a task ID that matches no row.
    #[error("Task with ID {0} not found")]
    TaskNotFound(i32),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Operations on the task list.
///
/// Every method issues at most one SQL statement, so each call either fully
/// succeeds or leaves the table untouched.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository {
    /// Inserts a pending task dated today and returns its ID.
    async fn create(&self, text: &str) -> Result<i32, TaskServiceError>;

    /// Retrieves a task by its ID.
    async fn read(&self, id: i32) -> Result<Task, TaskServiceError>;

    /// Retrieves every task, in whatever order the database returns them.
    async fn show_all(&self) -> Result<Vec<Task>, TaskServiceError>;

    /// Replaces the text of a task, leaving its date and status untouched.
    async fn update(&self, id: i32, text: &str) -> Result<(), TaskServiceError>;

    /// Marks a task as done. Marking a finished task again is not an error.
    async fn mark_done(&self, id: i32) -> Result<(), TaskServiceError>;

    /// Removes a task.
    async fn delete(&self, id: i32) -> Result<(), TaskServiceError>;
}

#[derive(Clone, Debug)]
pub struct TaskState {
    pub db: Arc<sea_orm::DatabaseConnection>,
    pub app_name: String,
}

pub struct TaskService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl TaskService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> TaskService<'_> {
        TaskService { db }
    }
}

#[async_trait]
impl TaskRepository for TaskService<'_> {
    #[tracing::instrument(skip(self))]
    async fn create(&self, text: &str) -> Result<i32, TaskServiceError> {
        if text.is_empty() {
            return Err(TaskServiceError::EmptyTask);
        }

        let active_model = task::ActiveModel {
            task: ActiveValue::Set(text.to_string()),
            created_at: ActiveValue::Set(chrono::Utc::now().date_naive()),
            status: ActiveValue::Set(false),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;
        tracing::info!("Created task {}", created_model.task_id);
        Ok(created_model.task_id)
    }

    #[tracing::instrument(skip(self))]
    async fn read(&self, id: i32) -> Result<Task, TaskServiceError> {
        let model = task::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(id))?;
        Ok(Task::from(model))
    }

    #[tracing::instrument(skip(self))]
    async fn show_all(&self) -> Result<Vec<Task>, TaskServiceError> {
        let tasks = task::Entity::find()
            .all(self.db)
            .await?
            .into_iter()
            .map(Task::from)
            .collect();
        Ok(tasks)
    }

    #[tracing::instrument(skip(self))]
    async fn update(&self, id: i32, text: &str) -> Result<(), TaskServiceError> {
        if text.is_empty() {
            return Err(TaskServiceError::EmptyUpdate);
        }

        let result = task::Entity::update_many()
            .col_expr(task::Column::Task, Expr::value(text.to_string()))
            .filter(task::Column::TaskId.eq(id))
            .exec(self.db)
            .await?;
        ensure_affected(id, result.rows_affected)
    }

    #[tracing::instrument(skip(self))]
    async fn mark_done(&self, id: i32) -> Result<(), TaskServiceError> {
        let result = task::Entity::update_many()
            .col_expr(task::Column::Status, Expr::value(true))
            .filter(task::Column::TaskId.eq(id))
            .exec(self.db)
            .await?;
        ensure_affected(id, result.rows_affected)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: i32) -> Result<(), TaskServiceError> {
        let result = task::Entity::delete_by_id(id).exec(self.db).await?;
        ensure_affected(id, result.rows_affected)
    }
}

/// Writes addressed by ID report a missing row as `TaskNotFound`.
fn ensure_affected(id: i32, rows_affected: u64) -> Result<(), TaskServiceError> {
    if rows_affected == 0 {
        tracing::warn!("No task with ID {} to modify", id);
        return Err(TaskServiceError::TaskNotFound(id));
    }
    Ok(())
}

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter,
};
use testcontainers_modules::{postgres, testcontainers};
use todo_list::entities::task;
use todo_list::task::{TaskRepository, TaskService, TaskServiceError};

mod common;

pub struct TestContext {
    #[allow(dead_code)] // container is kept to ensure it's not dropped
    pub container: testcontainers::ContainerAsync<postgres::Postgres>,
    pub db: DatabaseConnection,
}

async fn setup() -> anyhow::Result<TestContext> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let container = common::setup_container().await?;
    let db = common::setup_db(&container).await?;
    Ok(TestContext { db, container })
}

/// Inserts a row directly, bypassing the service.
async fn insert_task(db: &DatabaseConnection, text: &str) -> task::Model {
    task::ActiveModel {
        task: ActiveValue::Set(text.to_string()),
        created_at: ActiveValue::Set(Utc::now().date_naive()),
        status: ActiveValue::Set(false),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert task")
}

async fn count_by_id(db: &DatabaseConnection, id: i32) -> u64 {
    task::Entity::find()
        .filter(task::Column::TaskId.eq(id))
        .count(db)
        .await
        .expect("Failed to count tasks")
}

#[tokio::test]
async fn can_create_task() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&state.db);

    let id = service
        .create("some random testing task")
        .await
        .expect("Failed to create task");

    assert!(id > 0);
    let stored = task::Entity::find_by_id(id)
        .one(&state.db)
        .await
        .unwrap()
        .expect("Task was not stored");
    assert_eq!(stored.task, "some random testing task");
    assert!(!stored.status);
    assert_eq!(stored.created_at, Utc::now().date_naive());
}

#[tokio::test]
async fn cannot_create_empty_task() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&state.db);

    let result = service.create("").await;

    assert!(matches!(result, Err(TaskServiceError::EmptyTask)));
    assert_eq!(
        result.unwrap_err().to_string(),
        "Cannot create an empty task"
    );
    assert_eq!(task::Entity::find().count(&state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn can_read_existing_task() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&state.db);
    let inserted = insert_task(&state.db, "read existing test task").await;

    let task = service.read(inserted.task_id).await.expect("Failed to read");

    assert_eq!(task.id(), inserted.task_id);
    assert_eq!(task.text(), "read existing test task");
    assert_eq!(task.created_at(), inserted.created_at);
    assert!(!task.is_done());
}

#[tokio::test]
async fn cannot_read_non_existent_task() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&state.db);

    let result = service.read(-10000000).await;

    assert!(matches!(
        result,
        Err(TaskServiceError::TaskNotFound(-10000000))
    ));
}

#[tokio::test]
async fn can_show_all_tasks() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&state.db);
    assert!(service.show_all().await.unwrap().is_empty());

    let first = insert_task(&state.db, "first").await;
    let second = insert_task(&state.db, "second").await;

    let tasks = service.show_all().await.expect("Failed to list tasks");

    assert_eq!(tasks.len(), 2);
    let mut ids: Vec<i32> = tasks.iter().map(|task| task.id()).collect();
    ids.sort();
    assert_eq!(ids, vec![first.task_id, second.task_id]);
}

#[tokio::test]
async fn can_update_task_text_only() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&state.db);
    let inserted = insert_task(&state.db, "update test task").await;
    service.mark_done(inserted.task_id).await.unwrap();

    service
        .update(inserted.task_id, "updated task")
        .await
        .expect("Failed to update");

    let stored = task::Entity::find_by_id(inserted.task_id)
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.task, "updated task");
    assert_eq!(stored.created_at, inserted.created_at);
    assert!(stored.status);
}

#[tokio::test]
async fn cannot_update_with_empty_task() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&state.db);
    let inserted = insert_task(&state.db, "update test task").await;

    let result = service.update(inserted.task_id, "").await;

    assert!(matches!(result, Err(TaskServiceError::EmptyUpdate)));
    assert_eq!(
        result.unwrap_err().to_string(),
        "Cannot update with an empty task"
    );
    let task = service.read(inserted.task_id).await.unwrap();
    assert_eq!(task.text(), "update test task");
}

#[tokio::test]
async fn cannot_update_non_existent_task() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&state.db);

    let result = service.update(-100, "anything").await;

    assert!(matches!(result, Err(TaskServiceError::TaskNotFound(-100))));
}

#[tokio::test]
async fn can_mark_task_done() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&state.db);
    let inserted = insert_task(&state.db, "mark done test task").await;

    service
        .mark_done(inserted.task_id)
        .await
        .expect("Failed to mark done");
    service
        .mark_done(inserted.task_id)
        .await
        .expect("Marking done twice should succeed");

    let task = service.read(inserted.task_id).await.unwrap();
    assert!(task.is_done());
    assert_eq!(task.text(), "mark done test task");
}

#[tokio::test]
async fn cannot_mark_non_existent_task_done() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&state.db);

    let result = service.mark_done(-100).await;

    assert!(matches!(result, Err(TaskServiceError::TaskNotFound(-100))));
}

#[tokio::test]
async fn can_delete_task() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&state.db);
    let inserted = insert_task(&state.db, "delete test task").await;
    let other = insert_task(&state.db, "keep me").await;

    service
        .delete(inserted.task_id)
        .await
        .expect("Failed to delete");

    assert_eq!(count_by_id(&state.db, inserted.task_id).await, 0);
    assert_eq!(count_by_id(&state.db, other.task_id).await, 1);
}

#[tokio::test]
async fn cannot_delete_non_existent_task() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&state.db);

    let result = service.delete(-100).await;

    assert!(matches!(result, Err(TaskServiceError::TaskNotFound(-100))));
}

#[tokio::test]
async fn can_run_buy_milk_scenario() {
    let state = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&state.db);

    let id = service.create("buy milk").await.unwrap();
    let task = service.read(id).await.unwrap();
    assert_eq!(task.text(), "buy milk");
    assert!(!task.is_done());

    service.mark_done(id).await.unwrap();
    assert!(service.read(id).await.unwrap().is_done());

    service.delete(id).await.unwrap();
    assert_eq!(count_by_id(&state.db, id).await, 0);
}

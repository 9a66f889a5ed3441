use crate::dtos::{DeleteTodoResponse, TodoResponse};
use crate::extractors::{JsonPayload, TodoId};
use crate::models::{now_millis, Todo, TodoInput};
use crate::services::StoreError;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, Json};
use service_core::error::AppError;
use std::future::Future;
use std::sync::Arc;
use validator::Validate;

pub const TITLE_REQUIRED: &str = "Title is required";
pub const NOT_FOUND: &str = "Todo not found";

fn validate(input: &TodoInput) -> Result<(), AppError> {
    input
        .validate()
        .map_err(|_| AppError::bad_request(TITLE_REQUIRED))
}

/// Runs a store call on its own task so it completes even if the client goes
/// away and the request future is dropped.
async fn detached<T, F>(call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(call)
        .await
        .map_err(|e| StoreError::Task(anyhow::Error::new(e)))?
}

#[tracing::instrument(skip(state))]
pub async fn create_todo(
    State(state): State<AppState>,
    JsonPayload(input): JsonPayload<TodoInput>,
) -> Result<(StatusCode, Json<TodoResponse>), AppError> {
    validate(&input)?;

    let todo = Todo::new(input, now_millis());
    let store = Arc::clone(&state.store);
    let todo = detached(async move { store.insert(&todo).await.map(|_| todo) })
        .await
        .map_err(|e| AppError::internal("Failed to create todo", e))?;

    tracing::info!(todo_id = ?todo.id, "Todo created");
    Ok((StatusCode::CREATED, Json(TodoResponse::from(todo))))
}

#[tracing::instrument(skip(state))]
pub async fn list_todos(
    State(state): State<AppState>,
) -> Result<Json<Vec<TodoResponse>>, AppError> {
    let store = Arc::clone(&state.store);
    let todos = detached(async move { store.find_all().await })
        .await
        .map_err(|e| {
            let message = match &e {
                StoreError::Decode(_) => "Failed to decode todo",
                StoreError::Cursor(_) => "Cursor error",
                _ => "Failed to get todos",
            };
            AppError::internal(message, e)
        })?;

    Ok(Json(todos.into_iter().map(TodoResponse::from).collect()))
}

#[tracing::instrument(skip(state))]
pub async fn get_todo(
    State(state): State<AppState>,
    TodoId(id): TodoId,
) -> Result<Json<TodoResponse>, AppError> {
    let store = Arc::clone(&state.store);
    let todo = detached(async move { store.find_by_id(id).await })
        .await
        .map_err(|e| AppError::internal("Failed to get todo", e))?
        .ok_or_else(|| AppError::not_found(NOT_FOUND))?;

    Ok(Json(TodoResponse::from(todo)))
}

/// The id is extracted before the body, so a bad id wins over a bad payload.
#[tracing::instrument(skip(state))]
pub async fn update_todo(
    State(state): State<AppState>,
    TodoId(id): TodoId,
    JsonPayload(input): JsonPayload<TodoInput>,
) -> Result<Json<TodoResponse>, AppError> {
    validate(&input)?;

    let store = Arc::clone(&state.store);
    let matched = detached(async move { store.update(id, &input, now_millis()).await })
        .await
        .map_err(|e| AppError::internal("Failed to update todo", e))?;

    if matched == 0 {
        return Err(AppError::not_found(NOT_FOUND));
    }

    let store = Arc::clone(&state.store);
    let todo = detached(async move { store.find_by_id(id).await })
        .await
        .map_err(|e| AppError::internal("Failed to get updated todo", e))?
        .ok_or_else(|| {
            AppError::internal(
                "Failed to get updated todo",
                anyhow::anyhow!("todo {} disappeared after update", id),
            )
        })?;

    tracing::info!(todo_id = %id, "Todo updated");
    Ok(Json(TodoResponse::from(todo)))
}

#[tracing::instrument(skip(state))]
pub async fn delete_todo(
    State(state): State<AppState>,
    TodoId(id): TodoId,
) -> Result<Json<DeleteTodoResponse>, AppError> {
    let store = Arc::clone(&state.store);
    let deleted = detached(async move { store.delete(id).await })
        .await
        .map_err(|e| AppError::internal("Failed to delete todo", e))?;

    if deleted == 0 {
        return Err(AppError::not_found(NOT_FOUND));
    }

    tracing::info!(todo_id = %id, "Todo deleted");
    Ok(Json(DeleteTodoResponse::deleted()))
}

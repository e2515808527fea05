use axum::{
    Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::todo::{StorageError, Todo, TodoStorage};
use crate::web::api::ErrorResponse;

#[derive(Clone)]
pub struct TodoState {
    pub storage: Arc<dyn TodoStorage>,
}

impl TodoState {
    pub fn new(storage: Arc<dyn TodoStorage>) -> Self {
        Self { storage }
    }
}

/// JSON representation of a Todo for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TodoJson {
    /// Identifier assigned by storage
    pub id: i32,
    /// The task description
    pub task: String,
    /// When the todo was created
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<Todo> for TodoJson {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id(),
            task: todo.task().to_string(),
            created_at: todo.created_at(),
        }
    }
}

/// JSON request payload for creating or updating a todo.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TodoRequest {
    /// The task description
    pub task: String,
}

/// Every way a todo request can fail.
///
/// Handlers only return this; the `IntoResponse` impl is the one place
/// failures become `{"error": ...}` bodies.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body is not valid JSON for the expected shape.
    #[error("{}", .0.body_text())]
    Decode(#[from] JsonRejection),
    /// The `{id}` path segment is not an integer.
    #[error("The ID must be an integer value")]
    InvalidId,
    /// Storage failed, including when the todo does not exist.
    #[error("{0}")]
    Storage(#[from] StorageError),
    /// The route exists but not for this HTTP method.
    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Storage(err) => {
                tracing::error!("Todo storage operation failed: {}", err);
                StatusCode::BAD_REQUEST
            }
            ApiError::Decode(_) | ApiError::InvalidId => StatusCode::BAD_REQUEST,
        };

        (status_code, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

fn parse_id(raw_id: &str) -> Result<i32, ApiError> {
    raw_id.parse().map_err(|_| ApiError::InvalidId)
}

/// Segments axum cannot decode at all, such as invalid UTF-8, are reported
/// the same way as non-integer ones.
fn id_from_path(path: Result<Path<String>, PathRejection>) -> Result<i32, ApiError> {
    let Path(raw_id) = path.map_err(|_| ApiError::InvalidId)?;
    parse_id(&raw_id)
}

/// Handler for GET /todo - Returns every todo.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/todo",
    responses(
        (status = 200, description = "Successfully retrieved todos", body = [TodoJson]),
        (status = 400, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn list_todos_handler(
    State(state): State<TodoState>,
) -> Result<Json<Vec<TodoJson>>, ApiError> {
    let todos = state.storage.get_all().await?;
    Ok(Json(todos.into_iter().map(TodoJson::from).collect()))
}

/// Handler for POST /todo - Creates a todo from `{"task": ...}`.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    post,
    path = "/todo",
    request_body = TodoRequest,
    responses(
        (status = 200, description = "Todo created", body = TodoJson),
        (status = 400, description = "Malformed body or storage failure", body = ErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn create_todo_handler(
    State(state): State<TodoState>,
    payload: Result<Json<TodoRequest>, JsonRejection>,
) -> Result<Json<TodoJson>, ApiError> {
    let Json(request) = payload?;
    let todo = state.storage.create(request.task).await?;
    tracing::info!("Created todo {}", todo.id());
    Ok(Json(TodoJson::from(todo)))
}

/// Handler for GET /todo/{id}.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/todo/{id}",
    params(("id" = i32, Path, description = "Todo identifier")),
    responses(
        (status = 200, description = "Todo found", body = TodoJson),
        (status = 400, description = "Invalid ID or todo not found", body = ErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn get_todo_handler(
    State(state): State<TodoState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<TodoJson>, ApiError> {
    let id = id_from_path(id)?;
    let todo = state.storage.get_by_id(id).await?;
    tracing::debug!("Fetched {:?}", todo);
    Ok(Json(TodoJson::from(todo)))
}

/// Handler for PATCH /todo/{id} - Replaces the task of a todo.
///
/// The body is decoded before the ID is checked.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    patch,
    path = "/todo/{id}",
    params(("id" = i32, Path, description = "Todo identifier")),
    request_body = TodoRequest,
    responses(
        (status = 200, description = "Todo updated", body = TodoJson),
        (status = 400, description = "Malformed body, invalid ID or todo not found", body = ErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn update_todo_handler(
    State(state): State<TodoState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<TodoRequest>, JsonRejection>,
) -> Result<Json<TodoJson>, ApiError> {
    let Json(request) = payload?;
    let id = id_from_path(id)?;
    let todo = state.storage.update(id, request.task).await?;
    Ok(Json(TodoJson::from(todo)))
}

/// Handler for DELETE /todo/{id} - Returns the removed todo.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/todo/{id}",
    params(("id" = i32, Path, description = "Todo identifier")),
    responses(
        (status = 200, description = "Todo deleted", body = TodoJson),
        (status = 400, description = "Invalid ID or todo not found", body = ErrorResponse)
    ),
    tag = "Todos"
)]
pub async fn delete_todo_handler(
    State(state): State<TodoState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<TodoJson>, ApiError> {
    let id = id_from_path(id)?;
    let todo = state.storage.delete(id).await?;
    tracing::info!("Deleted todo {}", todo.id());
    Ok(Json(TodoJson::from(todo)))
}

async fn method_not_allowed_handler() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Creates and returns the todo router.
pub fn create_todo_router(state: TodoState) -> Router {
    Router::new()
        .route(
            "/todo",
            get(list_todos_handler)
                .post(create_todo_handler)
                .fallback(method_not_allowed_handler),
        )
        .route(
            "/todo/{id}",
            get(get_todo_handler)
                .patch(update_todo_handler)
                .delete(delete_todo_handler)
                .fallback(method_not_allowed_handler),
        )
        .with_state(state)
}

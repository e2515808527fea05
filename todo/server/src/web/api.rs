use axum::{Router, response::Json, routing::get};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::todo::api::{TodoJson, TodoRequest};

/// JSON response for API errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human readable description of what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: String) -> Self {
        Self { error }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::todo::api::list_todos_handler,
        crate::todo::api::create_todo_handler,
        crate::todo::api::get_todo_handler,
        crate::todo::api::update_todo_handler,
        crate::todo::api::delete_todo_handler,
    ),
    components(schemas(TodoJson, TodoRequest, ErrorResponse)),
    tags((name = "Todos", description = "Todo management endpoints"))
)]
pub struct ApiDoc;

#[tracing::instrument]
async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Creates the router serving the OpenAPI document for the JSON API.
pub fn create_api_docs_router() -> Router {
    Router::new().route("/api-docs/openapi.json", get(openapi_handler))
}

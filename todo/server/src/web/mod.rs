use axum::Router;
use migration::MigratorTrait;
use sea_orm::Database;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::todo::DatabaseTodoStorage;
use crate::todo::api::{TodoState, create_todo_router};

pub mod api;

/// Connects to the database, applies migrations and serves the JSON API
/// until the listener fails.
#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let db = Database::connect(&config.db_url).await?;
    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    let todo_state = TodoState::new(Arc::new(DatabaseTodoStorage::new(db)));
    let app = create_app(todo_state);

    let server_address = config.server_address();
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("JSON API listening on http://{}", server_address);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Assembles every route with the HTTP tracing layer applied.
pub fn create_app(todo_state: TodoState) -> Router {
    Router::new()
        .route("/health", axum::routing::get(health_check_handler))
        .merge(create_todo_router(todo_state))
        .merge(api::create_api_docs_router())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}

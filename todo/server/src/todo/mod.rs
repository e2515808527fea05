//! Todo records and the storage they live in.
//!
//! This module provides:
//! - The [`Todo`] domain type handed between the HTTP layer and storage
//! - The [`TodoStorage`] trait, the only seam the HTTP handlers depend on
//! - A sea-orm backed implementation ([`database::DatabaseTodoStorage`])
//! - An in-process implementation ([`memory::InMemoryTodoStorage`])

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};

use crate::entities::todo;

pub mod api;
pub mod database;
pub mod memory;

pub use database::DatabaseTodoStorage;
pub use memory::InMemoryTodoStorage;

#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub struct Todo {
    id: i32,
    task: String,
    created_at: DateTime<Utc>,
}

impl Todo {
    pub fn new(id: i32, task: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            task,
            created_at,
        }
    }

    /// Returns the ID of the todo.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Returns the task description.
    pub fn task(&self) -> &str {
        &self.task
    }

    /// Returns when the todo was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl From<todo::Model> for Todo {
    fn from(model: todo::Model) -> Self {
        Todo::new(model.id, model.task, model.created_at)
    }
}

/// Error type for TodoStorage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No todo matches the requested ID.
    #[error("Todo with ID {0} not found")]
    NotFound(i32),
    /// The ID counter has reached `i32::MAX`.
    #[error("No todo IDs left to assign")]
    IdsExhausted,
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Persistence operations for todo records.
///
/// Implementations assign the ID and creation timestamp themselves; callers
/// only ever supply the task text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoStorage: Send + Sync {
    /// Stores a new todo and returns it with its generated ID and timestamp.
    async fn create(&self, task: String) -> Result<Todo, StorageError>;

    /// Removes the todo with the given ID and returns its last state.
    ///
    /// # Errors
    ///
    /// * `StorageError::NotFound` - No todo has this ID
    async fn delete(&self, id: i32) -> Result<Todo, StorageError>;

    /// Replaces the task of the todo with the given ID.
    ///
    /// # Errors
    ///
    /// * `StorageError::NotFound` - No todo has this ID
    async fn update(&self, id: i32, task: String) -> Result<Todo, StorageError>;

    /// Retrieves the todo with the given ID.
    async fn get_by_id(&self, id: i32) -> Result<Todo, StorageError>;

    /// Retrieves every todo. Order is whatever the backend yields.
    async fn get_all(&self) -> Result<Vec<Todo>, StorageError>;
}

/// Current UTC time at the microsecond precision PostgreSQL stores.
pub(crate) fn current_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn can_convert_model_into_todo() {
        let created_at = current_timestamp();
        let model = todo::Model {
            id: 7,
            task: "buy milk".to_string(),
            created_at,
        };

        let todo = Todo::from(model);

        assert_eq!(todo, Todo::new(7, "buy milk".to_string(), created_at));
        assert_eq!(todo.id(), 7);
        assert_eq!(todo.task(), "buy milk");
        assert_eq!(todo.created_at(), created_at);
    }

    #[test]
    fn current_timestamp_has_microsecond_precision() {
        let timestamp = current_timestamp();
        assert_eq!(timestamp.nanosecond() % 1_000, 0);
    }

    #[test]
    fn not_found_error_names_the_id() {
        assert_eq!(
            StorageError::NotFound(42).to_string(),
            "Todo with ID 42 not found"
        );
    }
}

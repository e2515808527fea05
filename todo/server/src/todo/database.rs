use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::*;

use crate::entities::todo;
use crate::todo::{StorageError, Todo, TodoStorage, current_timestamp};

/// [`TodoStorage`] backed by the `todo` table through sea-orm.
///
/// The connection is sea-orm's pooled handle, so one instance is shared by
/// every request.
#[derive(Debug, Clone)]
pub struct DatabaseTodoStorage {
    db: DatabaseConnection,
}

impl DatabaseTodoStorage {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TodoStorage for DatabaseTodoStorage {
    /// Inserts a new todo row stamped with the current UTC time.
    ///
    /// # Arguments
    ///
    /// * `task` - The task description.
    ///
    /// # Returns
    ///
    /// A `Result` containing the created `Todo` with its generated ID, or an error otherwise.
    #[tracing::instrument(skip(self))]
    async fn create(&self, task: String) -> Result<Todo, StorageError> {
        let active_model = todo::ActiveModel {
            task: ActiveValue::Set(task),
            created_at: ActiveValue::Set(current_timestamp()),
            ..Default::default()
        };
        let created_model = active_model.insert(&self.db).await?;
        Ok(Todo::from(created_model))
    }

    /// Deletes a todo row by its ID in a single `DELETE ... RETURNING`.
    ///
    /// # Returns
    ///
    /// A `Result` containing the deleted `Todo` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: i32) -> Result<Todo, StorageError> {
        todo::Entity::delete_many()
            .filter(todo::Column::Id.eq(id))
            .exec_with_returning(&self.db)
            .await?
            .into_iter()
            .next()
            .map(Todo::from)
            .ok_or(StorageError::NotFound(id))
    }

    /// Changes the task of a todo row in a single `UPDATE ... RETURNING`.
    ///
    /// # Returns
    ///
    /// A `Result` containing the updated `Todo` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    async fn update(&self, id: i32, task: String) -> Result<Todo, StorageError> {
        todo::Entity::update_many()
            .col_expr(todo::Column::Task, Expr::value(task))
            .filter(todo::Column::Id.eq(id))
            .exec_with_returning(&self.db)
            .await?
            .into_iter()
            .next()
            .map(Todo::from)
            .ok_or(StorageError::NotFound(id))
    }

    #[tracing::instrument(skip(self))]
    async fn get_by_id(&self, id: i32) -> Result<Todo, StorageError> {
        todo::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Todo::from)
            .ok_or(StorageError::NotFound(id))
    }

    #[tracing::instrument(skip(self))]
    async fn get_all(&self) -> Result<Vec<Todo>, StorageError> {
        let todos = todo::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(Todo::from)
            .collect();
        Ok(todos)
    }
}

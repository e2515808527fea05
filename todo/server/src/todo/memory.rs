use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::todo::{StorageError, Todo, TodoStorage, current_timestamp};

#[derive(Debug, Default)]
struct Inner {
    todos: BTreeMap<i32, Todo>,
    last_id: i32,
}

/// [`TodoStorage`] kept in process memory.
///
/// IDs start at 1 and are never reused, mirroring a serial primary key.
/// Everything is lost when the value is dropped.
#[derive(Debug, Default)]
pub struct InMemoryTodoStorage {
    inner: RwLock<Inner>,
}

impl InMemoryTodoStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStorage for InMemoryTodoStorage {
    async fn create(&self, task: String) -> Result<Todo, StorageError> {
        let mut inner = self.inner.write().await;
        inner.last_id = inner
            .last_id
            .checked_add(1)
            .ok_or(StorageError::IdsExhausted)?;
        let todo = Todo::new(inner.last_id, task, current_timestamp());
        inner.todos.insert(todo.id(), todo.clone());
        Ok(todo)
    }

    async fn delete(&self, id: i32) -> Result<Todo, StorageError> {
        self.inner
            .write()
            .await
            .todos
            .remove(&id)
            .ok_or(StorageError::NotFound(id))
    }

    async fn update(&self, id: i32, task: String) -> Result<Todo, StorageError> {
        let mut inner = self.inner.write().await;
        let todo = inner
            .todos
            .get_mut(&id)
            .ok_or(StorageError::NotFound(id))?;
        todo.task = task;
        Ok(todo.clone())
    }

    async fn get_by_id(&self, id: i32) -> Result<Todo, StorageError> {
        self.inner
            .read()
            .await
            .todos
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound(id))
    }

    async fn get_all(&self) -> Result<Vec<Todo>, StorageError> {
        Ok(self.inner.read().await.todos.values().cloned().collect())
    }
}

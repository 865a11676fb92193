//! Owner-scoped todo item operations.
//!
//! Every call takes the caller's user ID. An item owned by someone else is
//! reported exactly like a missing one.

use crate::{
    models::todo_item::{TodoFields, TodoFilter, TodoItem},
    store::{StoreError, TodoRepository},
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Errors from [`TodoService`]
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    #[error("todo item {id} not found")]
    NotFound { id: i32 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct TodoService {
    repo: Arc<dyn TodoRepository>,
}

impl TodoService {
    pub fn new(repo: Arc<dyn TodoRepository>) -> Self {
        Self { repo }
    }

    pub async fn list_all(
        &self,
        owner: Uuid,
        filter: &TodoFilter,
    ) -> Result<Vec<TodoItem>, TodoError> {
        Ok(self.repo.list(owner, filter).await?)
    }

    pub async fn get_one(&self, id: i32, owner: Uuid) -> Result<Option<TodoItem>, TodoError> {
        Ok(self.repo.get_by_id(id, owner).await?)
    }

    /// Stores a new item owned by `owner`
    pub async fn create(&self, fields: TodoFields, owner: Uuid) -> Result<TodoItem, TodoError> {
        let item = self.repo.add(owner, fields).await?;
        debug!(id = item.id, %owner, "Created todo item");
        Ok(item)
    }

    /// Replaces every editable field of the owner's item
    ///
    /// Read and write are separate statements; concurrent replaces resolve
    /// as last writer wins.
    pub async fn replace(
        &self,
        id: i32,
        fields: TodoFields,
        owner: Uuid,
    ) -> Result<TodoItem, TodoError> {
        let mut item = self
            .repo
            .get_by_id(id, owner)
            .await?
            .ok_or(TodoError::NotFound { id })?;

        item.apply(fields);
        if !self.repo.update(&item).await? {
            return Err(TodoError::NotFound { id });
        }

        debug!(id, %owner, "Replaced todo item");
        Ok(item)
    }

    /// Deletes the owner's item and returns it as it was before deletion
    pub async fn remove(&self, id: i32, owner: Uuid) -> Result<Option<TodoItem>, TodoError> {
        let Some(item) = self.repo.get_by_id(id, owner).await? else {
            return Ok(None);
        };

        if !self.repo.delete(&item).await? {
            return Ok(None);
        }
        debug!(id, %owner, "Deleted todo item");
        Ok(Some(item))
    }
}

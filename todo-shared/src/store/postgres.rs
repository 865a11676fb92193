//! PostgreSQL store adapters.

use super::{StoreError, TodoRepository, UserStore};
use crate::models::{
    todo_item::{TodoFields, TodoFilter, TodoItem},
    user::{CreateUser, User, EMAIL_UNIQUE_CONSTRAINT, USERNAME_UNIQUE_CONSTRAINT},
};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

/// [`UserStore`] backed by the `users` table
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps unique-constraint violations on insert to the matching duplicate variant
///
/// Two concurrent registrations can both pass the service's lookups; the
/// constraint is what finally decides.
fn map_insert_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.constraint() {
            Some(USERNAME_UNIQUE_CONSTRAINT) => return StoreError::DuplicateUsername,
            Some(EMAIL_UNIQUE_CONSTRAINT) => return StoreError::DuplicateEmail,
            _ => {}
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_username(&self.pool, username).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn create(&self, data: CreateUser) -> Result<User, StoreError> {
        User::create(&self.pool, data).await.map_err(map_insert_error)
    }

    async fn record_login(&self, id: Uuid) -> Result<(), StoreError> {
        User::update_last_login(&self.pool, id).await?;
        Ok(())
    }
}

/// [`TodoRepository`] backed by the `todo_items` table
#[derive(Debug, Clone)]
pub struct PgTodoRepository {
    pool: PgPool,
}

impl PgTodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    async fn list(&self, owner: Uuid, filter: &TodoFilter) -> Result<Vec<TodoItem>, StoreError> {
        debug!(%owner, ?filter, "Listing todo items");
        Ok(TodoItem::list_for_owner(&self.pool, owner, filter).await?)
    }

    async fn get_by_id(&self, id: i32, owner: Uuid) -> Result<Option<TodoItem>, StoreError> {
        Ok(TodoItem::find_for_owner(&self.pool, id, owner).await?)
    }

    async fn add(&self, owner: Uuid, fields: TodoFields) -> Result<TodoItem, StoreError> {
        let item = TodoItem::create(&self.pool, owner, fields).await?;
        debug!(id = item.id, %owner, "Inserted todo item");
        Ok(item)
    }

    async fn update(&self, item: &TodoItem) -> Result<bool, StoreError> {
        let updated = item.update(&self.pool).await?;
        if !updated {
            debug!(id = item.id, owner = %item.user_id, "Todo item vanished before update");
        }
        Ok(updated)
    }

    async fn delete(&self, item: &TodoItem) -> Result<bool, StoreError> {
        let deleted = item.delete(&self.pool).await?;
        if !deleted {
            debug!(id = item.id, owner = %item.user_id, "Todo item vanished before delete");
        }
        Ok(deleted)
    }

    async fn exists(&self, id: i32, owner: Uuid) -> Result<bool, StoreError> {
        Ok(TodoItem::exists_for_owner(&self.pool, id, owner).await?)
    }
}

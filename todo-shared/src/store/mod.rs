//! Storage ports for users and todo items.
//!
//! Services talk to these traits rather than to a pool directly so the HTTP
//! layer can be exercised against in-memory adapters. The PostgreSQL adapters
//! in [`postgres`] delegate to the model methods in [`crate::models`].
//!
//! Every todo operation takes the caller's user ID explicitly; there is no
//! ambient "current user".

use crate::models::{
    todo_item::{TodoFields, TodoFilter, TodoItem},
    user::{CreateUser, User},
};
use async_trait::async_trait;
use uuid::Uuid;

#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod postgres;

/// Errors raised by store adapters
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Username is already registered
    #[error("username already exists")]
    DuplicateUsername,

    /// Email is already registered
    #[error("email already exists")]
    DuplicateEmail,

    /// Query or connection failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Credential store
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Case-insensitive lookup by username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Case-insensitive lookup by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Inserts a user, failing with a duplicate variant if username or email is taken
    async fn create(&self, data: CreateUser) -> Result<User, StoreError>;

    /// Stamps the user's last login time
    async fn record_login(&self, id: Uuid) -> Result<(), StoreError>;
}

/// Owner-scoped todo item storage
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Lists the owner's items matching every bound in `filter`
    ///
    /// Order is unspecified.
    async fn list(&self, owner: Uuid, filter: &TodoFilter) -> Result<Vec<TodoItem>, StoreError>;

    /// Returns `None` unless an item with this id exists AND belongs to `owner`
    async fn get_by_id(&self, id: i32, owner: Uuid) -> Result<Option<TodoItem>, StoreError>;

    /// Inserts a new item owned by `owner`; the store assigns the id
    async fn add(&self, owner: Uuid, fields: TodoFields) -> Result<TodoItem, StoreError>;

    /// Persists every editable field of an already fetched, owner-checked item
    ///
    /// Returns `false` if the row no longer exists.
    async fn update(&self, item: &TodoItem) -> Result<bool, StoreError>;

    /// Removes the item's row, returning `false` if it was already gone
    async fn delete(&self, item: &TodoItem) -> Result<bool, StoreError>;

    /// Whether `owner` has an item with this id
    async fn exists(&self, id: i32, owner: Uuid) -> Result<bool, StoreError>;
}

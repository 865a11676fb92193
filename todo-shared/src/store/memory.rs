//! In-memory store adapters for tests.
//!
//! Behave like the PostgreSQL adapters where callers can observe it:
//! case-insensitive uniqueness for usernames and emails, store-assigned
//! increasing ids, owner scoping on every todo lookup.

use super::{StoreError, TodoRepository, UserStore};
use crate::models::{
    todo_item::{TodoFields, TodoFilter, TodoItem},
    user::{CreateUser, User},
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::Mutex;
use uuid::Uuid;

/// [`UserStore`] holding users in a vector
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a stored user, for assertions
    pub async fn get(&self, id: Uuid) -> Option<User> {
        self.users.lock().await.iter().find(|u| u.id == id).cloned()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().await;
        Ok(users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().await;
        Ok(users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create(&self, data: CreateUser) -> Result<User, StoreError> {
        let mut users = self.users.lock().await;

        if users.iter().any(|u| u.username.eq_ignore_ascii_case(&data.username)) {
            return Err(StoreError::DuplicateUsername);
        }
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&data.email)) {
            return Err(StoreError::DuplicateEmail);
        }

        let user = User {
            id: Uuid::new_v4(),
            username: data.username,
            email: data.email,
            password_hash: data.password_hash,
            created_at: Utc::now(),
            last_login_at: None,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn record_login(&self, id: Uuid) -> Result<(), StoreError> {
        let mut users = self.users.lock().await;
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.last_login_at = Some(Utc::now());
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct TodoTable {
    next_id: i32,
    rows: BTreeMap<i32, TodoItem>,
}

/// [`TodoRepository`] holding items in an ordered map
#[derive(Debug, Default)]
pub struct MemoryTodoRepository {
    table: Mutex<TodoTable>,
}

impl MemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored items across all owners
    pub async fn len(&self) -> usize {
        self.table.lock().await.rows.len()
    }

    /// Whether no items are stored
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TodoRepository for MemoryTodoRepository {
    async fn list(&self, owner: Uuid, filter: &TodoFilter) -> Result<Vec<TodoItem>, StoreError> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .values()
            .filter(|item| item.user_id == owner && filter.matches(item))
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: i32, owner: Uuid) -> Result<Option<TodoItem>, StoreError> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .get(&id)
            .filter(|item| item.user_id == owner)
            .cloned())
    }

    async fn add(&self, owner: Uuid, fields: TodoFields) -> Result<TodoItem, StoreError> {
        let mut table = self.table.lock().await;
        table.next_id += 1;

        let mut item = TodoItem {
            id: table.next_id,
            user_id: owner,
            title: None,
            description: None,
            is_complete: false,
            scheduled_date_time: None,
            due_date_time: None,
        };
        item.apply(fields);

        table.rows.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update(&self, item: &TodoItem) -> Result<bool, StoreError> {
        let mut table = self.table.lock().await;
        match table
            .rows
            .get_mut(&item.id)
            .filter(|row| row.user_id == item.user_id)
        {
            Some(row) => {
                *row = item.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, item: &TodoItem) -> Result<bool, StoreError> {
        let mut table = self.table.lock().await;
        if table
            .rows
            .get(&item.id)
            .is_some_and(|row| row.user_id == item.user_id)
        {
            table.rows.remove(&item.id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn exists(&self, id: i32, owner: Uuid) -> Result<bool, StoreError> {
        let table = self.table.lock().await;
        Ok(table.rows.get(&id).is_some_and(|item| item.user_id == owner))
    }
}

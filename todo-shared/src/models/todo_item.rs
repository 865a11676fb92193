/// Todo item model and owner-scoped database operations
///
/// Every query takes the owner's user ID and filters on it, so a row owned by
/// someone else behaves exactly like a row that does not exist.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE todo_items (
///     id INTEGER GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(200),
///     description VARCHAR(1000),
///     is_complete BOOLEAN NOT NULL DEFAULT FALSE,
///     scheduled_date_time TIMESTAMPTZ,
///     due_date_time TIMESTAMPTZ
/// );
/// ```
///
/// # Wire format
///
/// ```json
/// {
///   "id": 7,
///   "userId": "6f0c...",
///   "title": "Dentist",
///   "description": null,
///   "isComplete": false,
///   "scheduledDateTime": "2024-01-15T09:00:00Z",
///   "dueDateTime": null
/// }
/// ```

use super::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Maximum title length in characters
pub const TITLE_MAX_LENGTH: u64 = 200;

/// Maximum description length in characters
pub const DESCRIPTION_MAX_LENGTH: u64 = 1000;

/// A stored todo item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    /// Store-assigned identifier
    pub id: i32,

    /// Owning user
    pub user_id: Uuid,

    pub title: Option<String>,

    pub description: Option<String>,

    pub is_complete: bool,

    pub scheduled_date_time: Option<DateTime<Utc>>,

    pub due_date_time: Option<DateTime<Utc>>,
}

/// The editable fields of a todo item
///
/// This is the request body for create and replace. Identifier and owner are
/// never taken from the client, so any `id` or `userId` in the JSON is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TodoFields {
    #[serde(default)]
    #[validate(length(max = TITLE_MAX_LENGTH, message = "Title must be at most 200 characters"))]
    pub title: Option<String>,

    #[serde(default)]
    #[validate(length(max = DESCRIPTION_MAX_LENGTH, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    pub is_complete: bool,

    #[serde(default, deserialize_with = "timestamp::option::deserialize")]
    pub scheduled_date_time: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "timestamp::option::deserialize")]
    pub due_date_time: Option<DateTime<Utc>>,
}

/// Optional inclusive date bounds for listing
///
/// Absent bounds impose no constraint. An item whose timestamp is NULL never
/// satisfies a bound on that field, mirroring SQL comparison semantics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoFilter {
    #[serde(default, deserialize_with = "timestamp::option::deserialize")]
    pub scheduled_date_time_from: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "timestamp::option::deserialize")]
    pub scheduled_date_time_to: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "timestamp::option::deserialize")]
    pub due_date_time_from: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "timestamp::option::deserialize")]
    pub due_date_time_to: Option<DateTime<Utc>>,
}

impl TodoFilter {
    /// Returns true if the item satisfies every bound that is set
    pub fn matches(&self, item: &TodoItem) -> bool {
        within(
            item.scheduled_date_time,
            self.scheduled_date_time_from,
            self.scheduled_date_time_to,
        ) && within(item.due_date_time, self.due_date_time_from, self.due_date_time_to)
    }

    /// Returns true if no bound is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn within(
    value: Option<DateTime<Utc>>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> bool {
    if from.is_none() && to.is_none() {
        return true;
    }

    match value {
        None => false,
        Some(value) => from.map_or(true, |from| value >= from) && to.map_or(true, |to| value <= to),
    }
}

impl TodoItem {
    /// Replaces every editable field with the given values; `id` and owner stay fixed
    pub fn apply(&mut self, fields: TodoFields) {
        self.title = fields.title;
        self.description = fields.description;
        self.is_complete = fields.is_complete;
        self.scheduled_date_time = fields.scheduled_date_time;
        self.due_date_time = fields.due_date_time;
    }

    /// Lists the owner's items matching the filter
    ///
    /// Rows come back ordered by id, which callers should treat as incidental.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner: Uuid,
        filter: &TodoFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, TodoItem>(
            r#"
            SELECT id, user_id, title, description, is_complete,
                   scheduled_date_time, due_date_time
            FROM todo_items
            WHERE user_id = $1
              AND ($2::TIMESTAMPTZ IS NULL OR scheduled_date_time >= $2)
              AND ($3::TIMESTAMPTZ IS NULL OR scheduled_date_time <= $3)
              AND ($4::TIMESTAMPTZ IS NULL OR due_date_time >= $4)
              AND ($5::TIMESTAMPTZ IS NULL OR due_date_time <= $5)
            ORDER BY id
            "#,
        )
        .bind(owner)
        .bind(filter.scheduled_date_time_from)
        .bind(filter.scheduled_date_time_to)
        .bind(filter.due_date_time_from)
        .bind(filter.due_date_time_to)
        .fetch_all(pool)
        .await
    }

    /// Finds an item by id, only if `owner` owns it
    pub async fn find_for_owner(
        pool: &PgPool,
        id: i32,
        owner: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, TodoItem>(
            r#"
            SELECT id, user_id, title, description, is_complete,
                   scheduled_date_time, due_date_time
            FROM todo_items
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(pool)
        .await
    }

    /// Inserts a new item owned by `owner`
    pub async fn create(
        pool: &PgPool,
        owner: Uuid,
        fields: TodoFields,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, TodoItem>(
            r#"
            INSERT INTO todo_items
                (user_id, title, description, is_complete, scheduled_date_time, due_date_time)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, title, description, is_complete,
                      scheduled_date_time, due_date_time
            "#,
        )
        .bind(owner)
        .bind(fields.title)
        .bind(fields.description)
        .bind(fields.is_complete)
        .bind(fields.scheduled_date_time)
        .bind(fields.due_date_time)
        .fetch_one(pool)
        .await
    }

    /// Writes every editable field of `self` back to its row
    pub async fn update(&self, pool: &PgPool) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE todo_items
            SET title = $3,
                description = $4,
                is_complete = $5,
                scheduled_date_time = $6,
                due_date_time = $7
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(self.id)
        .bind(self.user_id)
        .bind(&self.title)
        .bind(&self.description)
        .bind(self.is_complete)
        .bind(self.scheduled_date_time)
        .bind(self.due_date_time)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes the row backing `self`
    pub async fn delete(&self, pool: &PgPool) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todo_items WHERE id = $1 AND user_id = $2")
            .bind(self.id)
            .bind(self.user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Checks whether `owner` has an item with this id
    pub async fn exists_for_owner(pool: &PgPool, id: i32, owner: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM todo_items WHERE id = $1 AND user_id = $2)",
        )
        .bind(id)
        .bind(owner)
        .fetch_one(pool)
        .await
    }
}

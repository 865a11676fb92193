/// Todo item endpoints
///
/// All routes require a bearer token and only ever see the caller's own
/// items; another user's item answers 404 exactly like a missing one.
///
/// - `GET    /api/todoitems` - list, with optional inclusive date bounds
///   `scheduledDateTimeFrom`, `scheduledDateTimeTo`, `dueDateTimeFrom`,
///   `dueDateTimeTo`
/// - `GET    /api/todoitems/:id`
/// - `POST   /api/todoitems` - 201 with `Location: /api/todoitems/{id}`
/// - `PUT    /api/todoitems/:id` - replace every editable field
/// - `DELETE /api/todoitems/:id` - returns the deleted item

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath, ApiQuery},
};
use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use todo_shared::{
    auth::middleware::AuthContext,
    models::todo_item::{TodoFields, TodoFilter, TodoItem},
};
use validator::Validate;

fn not_found(id: i32) -> ApiError {
    ApiError::NotFound(format!("Todo item {} not found", id))
}

pub async fn list_todo_items(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiQuery(filter): ApiQuery<TodoFilter>,
) -> ApiResult<Json<Vec<TodoItem>>> {
    let items = state.todos.list_all(auth.user_id, &filter).await?;
    Ok(Json(items))
}

pub async fn get_todo_item(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<Json<TodoItem>> {
    let item = state
        .todos
        .get_one(id, auth.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(item))
}

/// Creates an item owned by the caller
///
/// Any `id` or `userId` in the body is ignored.
pub async fn create_todo_item(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiJson(fields): ApiJson<TodoFields>,
) -> ApiResult<Response> {
    fields.validate()?;

    let item = state.todos.create(fields, auth.user_id).await?;

    let location = HeaderValue::from_str(&format!("/api/todoitems/{}", item.id))
        .map_err(|e| ApiError::InternalError(format!("Invalid location header: {}", e)))?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(item),
    )
        .into_response())
}

/// Replaces every editable field; omitted fields become null (or false)
pub async fn update_todo_item(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiPath(id): ApiPath<i32>,
    ApiJson(fields): ApiJson<TodoFields>,
) -> ApiResult<Json<TodoItem>> {
    fields.validate()?;

    let item = state.todos.replace(id, fields, auth.user_id).await?;
    Ok(Json(item))
}

pub async fn delete_todo_item(
    State(state): State<AppState>,
    auth: AuthContext,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<Json<TodoItem>> {
    let item = state
        .todos
        .remove(id, auth.user_id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(item))
}

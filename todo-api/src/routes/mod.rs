/// API route handlers
///
/// - `health`: liveness check
/// - `auth`: registration and login
/// - `todo_items`: owner-scoped todo item CRUD

pub mod auth;
pub mod health;
pub mod todo_items;

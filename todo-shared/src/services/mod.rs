//! Business operations sitting between the HTTP handlers and the stores.
//!
//! - [`auth`]: registration and login
//! - [`todo`]: owner-scoped todo item operations

pub mod auth;
pub mod todo;

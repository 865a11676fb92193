//! # Todo Shared Library
//!
//! Types, persistence and business logic used by the todo API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models, wire shapes and their SQL operations
//! - `store`: Storage ports (`UserStore`, `TodoRepository`) and adapters
//! - `auth`: Password hashing, password policy, bearer tokens, request identity
//! - `services`: Registration/login and owner-scoped todo operations
//! - `db`: Connection pool and embedded migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! # Todo API Server Library
//!
//! HTTP layer over `todo-shared`: configuration, router, middleware and
//! handlers. The binary in `main.rs` wires these to a PostgreSQL pool.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Environment configuration
//! - `error`: Error type and HTTP response mapping
//! - `extract`: Extractors that reject with `ApiError`
//! - `middleware`: Bearer-token authentication and security headers
//! - `routes`: Route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;

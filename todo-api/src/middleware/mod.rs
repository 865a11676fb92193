/// Middleware for the API server
///
/// - `auth`: bearer-token identity extraction for protected routes
/// - `security`: security response headers

pub mod auth;
pub mod security;

/// Authentication endpoints
///
/// - `POST /api/auth/register` - create an account and receive a token
/// - `POST /api/auth/login` - exchange credentials for a token
///
/// Both respond with:
///
/// ```json
/// {
///   "token": "eyJ...",
///   "expiration": "2024-01-15T10:00:00Z",
///   "userName": "alice",
///   "email": "alice@example.com"
/// }
/// ```

use crate::{app::AppState, error::ApiResult, extract::ApiJson};
use axum::{extract::State, Json};
use serde::Deserialize;
use todo_shared::services::auth::AuthResponse;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 3, max = 50, message = "User name must be between 3 and 50 characters"))]
    pub user_name: String,

    /// Strength rules are checked by the auth service
    #[validate(length(max = 100, message = "Password must be at most 100 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "User name is required"))]
    pub user_name: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Registers a new user
///
/// # Errors
///
/// - `400 Bad Request`: malformed body, invalid fields, username or email
///   already registered, or a password that fails the policy (one detail
///   per unmet rule)
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let response = state
        .auth
        .register(&req.user_name, &req.email, &req.password)
        .await?;

    Ok(Json(response))
}

/// Logs a user in
///
/// # Errors
///
/// - `400 Bad Request`: malformed body or empty fields
/// - `401 Unauthorized`: unknown user or wrong password (indistinguishable)
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let response = state.auth.login(&req.user_name, &req.password).await?;

    Ok(Json(response))
}

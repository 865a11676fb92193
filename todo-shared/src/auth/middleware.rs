/// Request identity extraction
///
/// Turns an `Authorization: Bearer <token>` header into an [`AuthContext`] or
/// an [`AuthError`]. The API's middleware layer runs this once per request
/// and stores the context in request extensions; handlers then take
/// `AuthContext` as an extractor.
///
/// A token that validates but carries no usable `userId` claim is treated as
/// unauthenticated, never as a server error.
///
/// # Example
///
/// ```
/// use todo_shared::auth::middleware::AuthContext;
///
/// async fn handler(auth: AuthContext) -> String {
///     format!("Hello, {}!", auth.username)
/// }
/// ```

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::jwt::{Claims, JwtError, TokenService};

/// Identity of an authenticated caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Owner ID used to scope every todo operation
    pub user_id: Uuid,

    /// Username from the token, for logging
    pub username: String,
}

impl AuthContext {
    /// Builds the context from validated claims
    ///
    /// # Errors
    ///
    /// `AuthError::InvalidToken` if the `userId` claim is missing, empty or not a UUID.
    pub fn from_claims(claims: &Claims) -> Result<Self, AuthError> {
        let raw = claims
            .user_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AuthError::InvalidToken("Token has no user identifier".to_string()))?;

        let user_id = Uuid::parse_str(raw)
            .map_err(|_| AuthError::InvalidToken("Token has a malformed user identifier".to_string()))?;

        Ok(Self {
            user_id,
            username: claims.unique_name.clone(),
        })
    }
}

/// Error type for request authentication
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Authorization header present but not `Bearer <token>`
    InvalidFormat(String),

    /// Token validation failed
    InvalidToken(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingCredentials => write!(f, "Missing credentials"),
            AuthError::InvalidFormat(msg) => write!(f, "{}", msg),
            AuthError::InvalidToken(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
            JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid token issuer".to_string()),
            JwtError::InvalidAudience => {
                AuthError::InvalidToken("Invalid token audience".to_string())
            }
            other => AuthError::InvalidToken(format!("Invalid token: {}", other)),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Every authentication failure is a 401
        let body = Json(json!({
            "error": "unauthorized",
            "message": self.to_string(),
        }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let (scheme, token) = auth_header
        .split_once(' ')
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidFormat("Expected Bearer token".to_string()));
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    Ok(token)
}

/// Authenticates a request from its headers
pub fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> Result<AuthContext, AuthError> {
    let token = bearer_token(headers)?;
    let claims = tokens.validate(token)?;
    AuthContext::from_claims(&claims)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AuthError::MissingCredentials)
    }
}

/// Registration and login
///
/// Both operations end by issuing a bearer token and return the same
/// [`AuthResponse`] shape. Login never reveals whether the username exists:
/// an unknown user and a wrong password both yield
/// [`AuthServiceError::InvalidCredentials`].
///
/// Registration checks run in a fixed order: username taken, email taken,
/// then the password policy. The unique constraints in the store still decide
/// when two registrations race past the lookups.

use crate::{
    auth::{
        jwt::{JwtError, TokenService},
        password::{
            check_password_policy, hash_password_blocking, verify_password_blocking,
            PasswordError, PasswordViolation,
        },
    },
    models::user::{CreateUser, User},
    store::{StoreError, UserStore},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Token payload returned by register and login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,

    /// Equal to the token's `exp` claim
    pub expiration: DateTime<Utc>,

    #[serde(rename = "userName")]
    pub username: String,

    pub email: String,
}

/// Errors from [`AuthService`]
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("username is already taken")]
    DuplicateUsername,

    #[error("email is already registered")]
    DuplicateEmail,

    /// Every unmet password rule, in policy order
    #[error("password does not meet the policy")]
    WeakPassword(Vec<PasswordViolation>),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] JwtError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AuthServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername => AuthServiceError::DuplicateUsername,
            StoreError::DuplicateEmail => AuthServiceError::DuplicateEmail,
            other => AuthServiceError::Store(other),
        }
    }
}

/// Registration and login over a [`UserStore`]
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<TokenService>) -> Self {
        Self { users, tokens }
    }

    /// Creates an account and returns a token for it
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, AuthServiceError> {
        if self.users.find_by_username(username).await?.is_some() {
            info!(username, "Registration rejected: username taken");
            return Err(AuthServiceError::DuplicateUsername);
        }

        if self.users.find_by_email(email).await?.is_some() {
            info!(username, "Registration rejected: email taken");
            return Err(AuthServiceError::DuplicateEmail);
        }

        let violations = check_password_policy(password);
        if !violations.is_empty() {
            info!(username, rules = violations.len(), "Registration rejected: weak password");
            return Err(AuthServiceError::WeakPassword(violations));
        }

        let password_hash = hash_password_blocking(password.to_string()).await?;

        let user = self
            .users
            .create(CreateUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "User registered");
        self.respond(&user)
    }

    /// Checks credentials, records the login and returns a fresh token
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthResponse, AuthServiceError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            warn!(username, "Login failed");
            return Err(AuthServiceError::InvalidCredentials);
        };

        let matches =
            verify_password_blocking(password.to_string(), user.password_hash.clone()).await?;
        if !matches {
            warn!(username, "Login failed");
            return Err(AuthServiceError::InvalidCredentials);
        }

        self.users.record_login(user.id).await?;

        info!(user_id = %user.id, "User logged in");
        self.respond(&user)
    }

    fn respond(&self, user: &User) -> Result<AuthResponse, AuthServiceError> {
        let issued = self.tokens.issue(user)?;
        Ok(AuthResponse {
            token: issued.token,
            expiration: issued.expires_at,
            username: user.username.clone(),
            email: user.email.clone(),
        })
    }
}

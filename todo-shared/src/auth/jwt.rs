/// Bearer token issuance and validation
///
/// Tokens are JWTs signed with HS256 (HMAC-SHA256) under a symmetric key from
/// configuration.
///
/// # Claims
///
/// - `sub`: user ID
/// - `unique_name`: username
/// - `email`: email address
/// - `jti`: unique token ID (UUID v4)
/// - `iss` / `aud`: configured issuer and audience
/// - `iat` / `nbf` / `exp`: issue, not-before and expiry (Unix seconds)
/// - `userId`: user ID again, as the claim the HTTP layer reads identity from
///
/// # Validation
///
/// Signature, issuer, audience, expiry and not-before are all checked. There
/// is no revocation list: a token stays valid until `exp` even if the user's
/// password changes.
///
/// # Example
///
/// ```
/// use todo_shared::auth::jwt::{TokenService, TokenSettings};
/// use todo_shared::models::user::User;
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tokens = TokenService::new(TokenSettings::new("a-secret-key-that-is-at-least-32-bytes"))?;
///
/// let user = User {
///     id: Uuid::new_v4(),
///     username: "alice".into(),
///     email: "alice@example.com".into(),
///     password_hash: String::new(),
///     created_at: Utc::now(),
///     last_login_at: None,
/// };
///
/// let issued = tokens.issue(&user)?;
/// let claims = tokens.validate(&issued.token)?;
/// assert_eq!(claims.user_id.as_deref(), Some(user.id.to_string().as_str()));
/// # Ok(())
/// # }
/// ```

use crate::models::user::User;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default issuer when none is configured
pub const DEFAULT_ISSUER: &str = "TodoBackend";

/// Default audience when none is configured
pub const DEFAULT_AUDIENCE: &str = "TodoBackendUsers";

/// Default token lifetime in minutes
pub const DEFAULT_LIFETIME_MINUTES: i64 = 60;

/// Longest accepted token lifetime in minutes (one year)
pub const MAX_LIFETIME_MINUTES: i64 = 525_600;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// No signing key configured
    #[error("JWT signing key is not configured")]
    MissingSecret,

    /// Lifetime is not positive or exceeds [`MAX_LIFETIME_MINUTES`]
    #[error("Token lifetime of {0} minutes is out of range")]
    InvalidLifetime(i64),

    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Issuer does not match configuration
    #[error("Invalid token issuer")]
    InvalidIssuer,

    /// Audience does not match configuration
    #[error("Invalid token audience")]
    InvalidAudience,
}

/// Signing and validation settings
#[derive(Debug, Clone)]
pub struct TokenSettings {
    /// Symmetric signing key
    pub secret: String,

    pub issuer: String,

    pub audience: String,

    /// Token lifetime in minutes
    pub lifetime_minutes: i64,
}

impl TokenSettings {
    /// Settings with the given key and default issuer, audience and lifetime
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: DEFAULT_ISSUER.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
            lifetime_minutes: DEFAULT_LIFETIME_MINUTES,
        }
    }
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: String,

    /// Username
    #[serde(default)]
    pub unique_name: String,

    #[serde(default)]
    pub email: String,

    /// Unique token ID
    pub jti: String,

    pub iss: String,

    pub aud: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Owning user's ID (custom claim)
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Claims {
    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Expiry as a timestamp
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// A freshly signed token and its expiry
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and validates bearer tokens
///
/// Built once at startup from configuration and shared behind an `Arc`.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    lifetime: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Creates a token service
    ///
    /// # Errors
    ///
    /// Returns `JwtError::MissingSecret` if the key is empty and
    /// `JwtError::InvalidLifetime` if the lifetime is out of range.
    pub fn new(settings: TokenSettings) -> Result<Self, JwtError> {
        if settings.secret.is_empty() {
            return Err(JwtError::MissingSecret);
        }

        let minutes = settings.lifetime_minutes;
        let lifetime = Some(minutes)
            .filter(|m| (1..=MAX_LIFETIME_MINUTES).contains(m))
            .and_then(Duration::try_minutes)
            .ok_or(JwtError::InvalidLifetime(minutes))?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            issuer: settings.issuer,
            audience: settings.audience,
            lifetime,
        })
    }

    /// Configured token lifetime
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Builds the claims for `user` with the configured lifetime
    pub fn claims_for(&self, user: &User) -> Result<Claims, JwtError> {
        self.claims_with_expiration(user, self.lifetime)
    }

    /// Builds the claims for `user` expiring after `expires_in`
    ///
    /// # Errors
    ///
    /// `JwtError::CreateError` if the expiry falls outside the representable range.
    pub fn claims_with_expiration(
        &self,
        user: &User,
        expires_in: Duration,
    ) -> Result<Claims, JwtError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(expires_in)
            .ok_or_else(|| JwtError::CreateError("Token expiry out of range".to_string()))?;
        let user_id = user.id.to_string();

        Ok(Claims {
            sub: user_id.clone(),
            unique_name: user.username.clone(),
            email: user.email.clone(),
            jti: Uuid::new_v4().to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
            user_id: Some(user_id),
        })
    }

    /// Signs arbitrary claims with the configured key
    pub fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
    }

    /// Issues a token for `user`
    pub fn issue(&self, user: &User) -> Result<IssuedToken, JwtError> {
        let claims = self.claims_for(user)?;
        let token = self.sign(&claims)?;

        Ok(IssuedToken {
            token,
            expires_at: claims.expires_at(),
        })
    }

    /// Validates a token and returns its claims
    ///
    /// # Errors
    ///
    /// - `JwtError::Expired` if `exp` has passed
    /// - `JwtError::InvalidIssuer` / `JwtError::InvalidAudience` on mismatch
    /// - `JwtError::ValidationError` for a bad signature or malformed token
    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
                jsonwebtoken::errors::ErrorKind::InvalidAudience => JwtError::InvalidAudience,
                _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }
}

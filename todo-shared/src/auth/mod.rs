/// Authentication building blocks
///
/// # Modules
///
/// - [`password`]: Argon2id hashing and the registration password policy
/// - [`jwt`]: access token issuing and validation
/// - [`middleware`]: bearer header parsing and the [`middleware::AuthContext`] extractor
///
/// # Example
///
/// ```
/// use todo_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("Secret123")?;
/// assert!(verify_password("Secret123", &hash)?);
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;

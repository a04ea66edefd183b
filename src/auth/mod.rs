pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

use crate::error::AppError;
use crate::models::User;

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::PasswordHasher;
pub use token::{Claims, TokenCodec};

/// Represents the payload for a login request.
///
/// `username` carries the account email, following the password-grant field
/// naming. It is deliberately not format-validated here: an address that was
/// never registered must fail exactly like a wrong password.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name for the new account.
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
    /// Email address for the new account, used as the login username.
    /// Must be a valid email format and is unique across accounts.
    #[validate(email)]
    pub email: String,
    /// Password for the new account.
    /// Must be at least 6 characters long.
    #[validate(length(min = 6))]
    pub password: String,
}

/// Response structure for a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The signed bearer token.
    pub access_token: String,
    /// Literal type tag; always "bearer".
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Verifies an email/password pair against the stored credentials.
///
/// Unknown email, wrong password, and a stored hash that fails verification
/// all collapse to `AppError::InvalidCredentials`; only a datastore transport
/// failure surfaces differently (as a generic server error).
pub async fn authenticate_user(
    pool: &PgPool,
    hasher: &PasswordHasher,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    let user = User::find_by_email(pool, email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let matches = hasher
        .verify(password, &user.password_hash)
        .map_err(|_| AppError::InvalidCredentials)?;

    if !matches {
        return Err(AppError::InvalidCredentials);
    }

    Ok(user)
}

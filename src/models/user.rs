use serde::Serialize;
use sqlx::{FromRow, PgPool};

/// A user row as stored in the database.
///
/// Deliberately not `Serialize`: the password hash must never leave the
/// process. Responses use the `UserPublic` projection instead.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
}

impl User {
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, full_name, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &PgPool,
        full_name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (full_name, email, password_hash) VALUES ($1, $2, $3)
             RETURNING id, full_name, email, password_hash",
        )
        .bind(full_name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await
    }
}

/// The client-visible shape of a user account.
#[derive(Debug, Clone, Serialize)]
pub struct UserPublic {
    pub id: i32,
    pub full_name: String,
    pub email: String,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
        }
    }
}

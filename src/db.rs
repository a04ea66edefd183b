//! Schema bootstrap for the backing store.
//!
//! Tables are created at startup if they do not already exist, so a fresh
//! database needs no out-of-band migration step.

use sqlx::PgPool;

pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
             id SERIAL PRIMARY KEY,
             full_name TEXT NOT NULL,
             email TEXT NOT NULL UNIQUE,
             password_hash TEXT NOT NULL
         )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS todos (
             id UUID PRIMARY KEY,
             task TEXT NOT NULL,
             completed BOOLEAN NOT NULL DEFAULT FALSE,
             created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
             updated_at TIMESTAMPTZ,
             user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
         )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

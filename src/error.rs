//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the
//! application. It centralizes error management, providing a consistent way to
//! handle and represent the error conditions that can occur, from database
//! issues to failed credential checks.
//!
//! `AppError` implements `actix_web::error::ResponseError` to seamlessly
//! convert application errors into appropriate HTTP responses with JSON
//! bodies. It also provides `From` trait implementations for common error
//! types like `sqlx::Error`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error`, and `bcrypt::BcryptError`, allowing for
//! easy conversion using the `?` operator.

use actix_web::{error::ResponseError, http::header, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
///
/// The credential variants are deliberately message-free: every login failure
/// renders the same body, and every token failure renders the same body, so a
/// caller cannot tell an unknown account from a wrong password, or a forged
/// token from a vanished user.
#[derive(Debug)]
pub enum AppError {
    /// Login failed: unknown email or wrong password, merged into one
    /// indistinguishable outcome (HTTP 400).
    InvalidCredentials,
    /// Bearer token rejected: missing, malformed, badly signed, expired, or
    /// its subject no longer resolves to a user (HTTP 401 with a
    /// `WWW-Authenticate: Bearer` challenge).
    InvalidToken,
    /// A requested resource does not exist for this caller (HTTP 404).
    /// Covers both "no such id" and "owned by someone else".
    NotFound(String),
    /// A uniqueness constraint was hit, e.g. registering an email twice
    /// (HTTP 409).
    Conflict(String),
    /// Failed input validation (HTTP 422 Unprocessable Entity).
    /// Wraps errors from the `validator` crate.
    ValidationError(String),
    /// An error originating from database operations (HTTP 500).
    /// Wraps errors from the `sqlx` crate; the detail is logged, not sent.
    DatabaseError(String),
    /// An unexpected server-side error (HTTP 500); the detail is logged,
    /// not sent.
    InternalServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::InvalidCredentials => write!(f, "Invalid credentials"),
            AppError::InvalidToken => write!(f, "Could not validate credentials"),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// This implementation allows Actix Web to automatically translate `AppError`
/// results from handlers into the correct HTTP status codes and JSON error
/// responses.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::InvalidCredentials => HttpResponse::BadRequest().json(json!({
                "error": "Invalid credentials"
            })),
            AppError::InvalidToken => HttpResponse::Unauthorized()
                .insert_header((header::WWW_AUTHENTICATE, "Bearer"))
                .json(json!({
                    "error": "Could not validate credentials"
                })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            AppError::Conflict(msg) => HttpResponse::Conflict().json(json!({
                "error": msg
            })),
            AppError::ValidationError(msg) => HttpResponse::UnprocessableEntity().json(json!({
                "error": msg
            })),
            // Server faults are logged in full and presented to the client as
            // a generic internal error.
            AppError::DatabaseError(msg) => {
                log::error!("database error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "error": "Internal server error"
                }))
            }
            AppError::InternalServerError(msg) => {
                log::error!("internal error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "error": "Internal server error"
                }))
            }
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `sqlx::Error::RowNotFound` is mapped to `AppError::NotFound`, while other
/// database errors become `AppError::DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::InvalidToken`.
///
/// Every decoding failure collapses to the same rejection: malformed token,
/// bad signature, expired, or missing claims.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_error: jsonwebtoken::errors::Error) -> AppError {
        AppError::InvalidToken
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
///
/// This handles errors during password hashing. During login, verification
/// errors are masked to `InvalidCredentials` before they reach this impl.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

use crate::config::AuthConfig;
use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Represents the claims encoded within a bearer token.
///
/// `sub` is required: a token whose payload lacks a subject fails
/// deserialization and is rejected like any other invalid token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the email of the user it was minted for.
    pub sub: String,
    /// Expiration timestamp (seconds since epoch) for the token.
    pub exp: usize,
}

/// Signs and verifies bearer tokens.
///
/// Built once at startup from `AuthConfig` and shared read-only across
/// requests; the signing secret and algorithm are never read from ambient
/// process state inside the issue/verify paths.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    header: Header,
    validation: Validation,
    validity: chrono::Duration,
}

impl TokenCodec {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            header: Header::new(config.algorithm),
            validation: Validation::new(config.algorithm),
            validity: chrono::Duration::minutes(config.token_ttl_minutes),
        }
    }

    /// Mints a signed token for the given subject, expiring after the
    /// configured validity window.
    pub fn issue(&self, subject: &str) -> Result<String, AppError> {
        let expires_at = chrono::Utc::now()
            .checked_add_signed(self.validity)
            .ok_or_else(|| AppError::InternalServerError("token expiry out of range".into()))?;

        let claims = Claims {
            sub: subject.to_owned(),
            exp: expires_at.timestamp() as usize,
        };

        encode(&self.header, &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to issue token: {}", e)))
    }

    /// Verifies a token's signature and expiry and decodes its claims.
    ///
    /// Any failure (malformed token, bad signature, expired, missing subject)
    /// collapses to `AppError::InvalidToken`.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}

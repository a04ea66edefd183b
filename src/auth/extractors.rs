use actix_web::dev::Payload;
use actix_web::{web, Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use sqlx::PgPool;

use crate::auth::token::Claims;
use crate::error::AppError;
use crate::models::User;

/// Resolves the authenticated caller to a concrete user record.
///
/// This extractor is intended for routes protected by `AuthMiddleware`, which
/// validates the bearer token and inserts the decoded `Claims` into request
/// extensions. The subject claim (the user's email) is then looked up in the
/// datastore; a token whose subject no longer resolves is rejected exactly
/// like an invalid token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl FromRequest for AuthenticatedUser {
    type Error = ActixError; // AppError is converted into ActixError via ResponseError
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<Claims>().cloned();
        let pool = req.app_data::<web::Data<PgPool>>().cloned();

        Box::pin(async move {
            // Absent claims mean AuthMiddleware did not run on this route;
            // rejecting is the safe default.
            let claims = claims.ok_or(AppError::InvalidToken)?;
            let pool = pool.ok_or_else(|| {
                AppError::InternalServerError("PgPool not registered in app data".to_string())
            })?;

            let user = User::find_by_email(&pool, &claims.sub)
                .await
                .map_err(AppError::from)?
                .ok_or(AppError::InvalidToken)?;

            Ok(AuthenticatedUser(user))
        })
    }
}

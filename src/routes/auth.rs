use crate::{
    auth::{
        authenticate_user, LoginRequest, PasswordHasher, RegisterRequest, TokenCodec,
        TokenResponse,
    },
    error::AppError,
    models::{User, UserPublic},
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Register a new user
///
/// Creates a new user account and returns its public projection. The email
/// doubles as the login username and must be unused.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    hasher: web::Data<PasswordHasher>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    register_data.validate()?;

    // Check if email already exists
    let existing_user = User::find_by_email(&pool, &register_data.email).await?;
    if existing_user.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    // Hash password and insert the new user
    let password_hash = hasher.hash(&register_data.password)?;
    let user = User::create(
        &pool,
        &register_data.full_name,
        &register_data.email,
        &password_hash,
    )
    .await?;

    Ok(HttpResponse::Created().json(UserPublic::from(user)))
}

/// Login user
///
/// Authenticates an email/password pair and mints a bearer token whose
/// subject is the account email. Unknown email and wrong password are the
/// same failure.
#[post("/token")]
pub async fn login(
    pool: web::Data<PgPool>,
    hasher: web::Data<PasswordHasher>,
    codec: web::Data<TokenCodec>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    // Validate input
    login_data.validate()?;

    let user = authenticate_user(&pool, &hasher, &login_data.username, &login_data.password).await?;
    let token = codec.issue(&user.email)?;

    Ok(HttpResponse::Ok().json(TokenResponse::bearer(token)))
}

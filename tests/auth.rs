use actix_cors::Cors;
use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use dotenv::dotenv;
use jsonwebtoken::Algorithm;
use serde_json::json;
use sqlx::PgPool;

use tickbox::auth::{PasswordHasher, TokenCodec};
use tickbox::config::AuthConfig;
use tickbox::routes;
use tickbox::routes::health;

const TEST_SECRET: &str = "integration-test-secret";

/// Connects to the test database, or skips the test when no DATABASE_URL is
/// configured so the suite still passes on a database-less checkout.
async fn test_pool() -> Option<PgPool> {
    dotenv().ok();
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("skipping: DATABASE_URL not set");
        return None;
    };
    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test DB");
    tickbox::db::init_schema(&pool)
        .await
        .expect("Failed to initialize schema");
    Some(pool)
}

fn test_auth_config(ttl_minutes: i64) -> AuthConfig {
    AuthConfig {
        secret: TEST_SECRET.to_string(),
        algorithm: Algorithm::HS256,
        token_ttl_minutes: ttl_minutes,
    }
}

/// Calls the service, tolerating requests the auth middleware rejects before
/// routing (those surface as service-level errors rather than responses).
/// Returns the status and the WWW-Authenticate challenge, if any.
async fn call_allowing_auth_error<S, B>(app: &S, req: Request) -> (StatusCode, Option<String>)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    match test::try_call_service(app, req).await {
        Ok(resp) => (
            resp.status(),
            resp.headers()
                .get(header::WWW_AUTHENTICATE)
                .map(|v| v.to_str().unwrap().to_string()),
        ),
        Err(err) => {
            let resp = err.error_response();
            (
                resp.status(),
                resp.headers()
                    .get(header::WWW_AUTHENTICATE)
                    .map(|v| v.to_str().unwrap().to_string()),
            )
        }
    }
}

macro_rules! test_app {
    ($pool:expr, $codec:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($pool.clone()))
                .app_data(web::Data::new($codec))
                .app_data(web::Data::new(PasswordHasher::new(4)))
                .wrap(
                    Cors::default()
                        .allow_any_origin()
                        .allow_any_method()
                        .allow_any_header()
                        .max_age(3600),
                )
                .wrap(Logger::default())
                .service(health::health)
                .configure(routes::config),
        )
        .await
    };
}

async fn delete_user(pool: &PgPool, email: &str) {
    let _ = sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await;
}

#[actix_rt::test]
async fn test_register_and_login_flow() {
    let Some(pool) = test_pool().await else { return };
    let email = "integration@example.com";
    delete_user(&pool, email).await;

    let app = test_app!(pool, TokenCodec::new(&test_auth_config(30)));

    // Register a new user
    let register_payload = json!({
        "full_name": "Integration User",
        "email": email,
        "password": "Password123!"
    });
    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(&register_payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(status, StatusCode::CREATED, "Registration failed. Body: {:?}", body);
    assert_eq!(body["email"], email);
    assert_eq!(body["full_name"], "Integration User");
    assert!(body["id"].is_number());
    // The stored hash must never appear in a response.
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());

    // Registering the same email again must conflict
    let req_conflict = test::TestRequest::post()
        .uri("/register")
        .set_json(&register_payload)
        .to_request();
    let resp_conflict = test::call_service(&app, req_conflict).await;
    assert_eq!(resp_conflict.status(), StatusCode::CONFLICT);

    // Login with the registered credentials
    let req_login = test::TestRequest::post()
        .uri("/token")
        .set_json(json!({ "username": email, "password": "Password123!" }))
        .to_request();
    let resp_login = test::call_service(&app, req_login).await;
    let status_login = resp_login.status();
    let login_body: serde_json::Value = test::read_body_json(resp_login).await;
    assert_eq!(status_login, StatusCode::OK, "Login failed. Body: {:?}", login_body);
    assert_eq!(login_body["token_type"], "bearer");
    let token = login_body["access_token"]
        .as_str()
        .expect("access_token must be a string")
        .to_string();
    assert!(!token.is_empty(), "Token should be a non-empty string");

    // Use the token to create a to-do item
    let req_create = test::TestRequest::post()
        .uri("/todos")
        .append_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({ "task": "buy milk" }))
        .to_request();
    let resp_create = test::call_service(&app, req_create).await;
    let status_create = resp_create.status();
    let created: serde_json::Value = test::read_body_json(resp_create).await;
    assert_eq!(
        status_create,
        StatusCode::CREATED,
        "Create todo with token failed. Body: {:?}",
        created
    );
    assert_eq!(created["task"], "buy milk");
    assert_eq!(created["completed"], false);
    assert_eq!(created["owner"]["email"], email);

    // The same request with no token must be challenged
    let req_no_token = test::TestRequest::post()
        .uri("/todos")
        .set_json(json!({ "task": "buy milk" }))
        .to_request();
    let (status, challenge) = call_allowing_auth_error(&app, req_no_token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(challenge.as_deref(), Some("Bearer"));

    delete_user(&pool, email).await;
}

#[actix_rt::test]
async fn test_login_failures_are_uniform() {
    let Some(pool) = test_pool().await else { return };
    let email = "uniform_login@example.com";
    delete_user(&pool, email).await;

    let app = test_app!(pool, TokenCodec::new(&test_auth_config(30)));

    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(json!({
            "full_name": "Uniform Login",
            "email": email,
            "password": "Password123!"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success(), "Setup: failed to register test user");

    // Wrong password for a real account
    let req_wrong_pw = test::TestRequest::post()
        .uri("/token")
        .set_json(json!({ "username": email, "password": "WrongPassword123!" }))
        .to_request();
    let resp_wrong_pw = test::call_service(&app, req_wrong_pw).await;
    let status_wrong_pw = resp_wrong_pw.status();
    let body_wrong_pw: serde_json::Value = test::read_body_json(resp_wrong_pw).await;

    // Right-looking password for an account that does not exist
    let req_unknown = test::TestRequest::post()
        .uri("/token")
        .set_json(json!({ "username": "nonexistent@example.com", "password": "Password123!" }))
        .to_request();
    let resp_unknown = test::call_service(&app, req_unknown).await;
    let status_unknown = resp_unknown.status();
    let body_unknown: serde_json::Value = test::read_body_json(resp_unknown).await;

    // The two failures must be indistinguishable.
    assert_eq!(status_wrong_pw, StatusCode::BAD_REQUEST);
    assert_eq!(status_unknown, StatusCode::BAD_REQUEST);
    assert_eq!(body_wrong_pw, body_unknown);
    assert_eq!(body_wrong_pw["error"], "Invalid credentials");

    delete_user(&pool, email).await;
}

#[actix_rt::test]
async fn test_invalid_registration_inputs() {
    let Some(pool) = test_pool().await else { return };
    let app = test_app!(pool, TokenCodec::new(&test_auth_config(30)));

    let test_cases = vec![
        // Deserialization errors (expect 400 for missing fields)
        (
            json!({ "email": "test@example.com", "password": "Password123!" }),
            StatusCode::BAD_REQUEST,
            "missing full_name",
        ),
        (
            json!({ "full_name": "Test User", "password": "Password123!" }),
            StatusCode::BAD_REQUEST,
            "missing email",
        ),
        (
            json!({ "full_name": "Test User", "email": "test@example.com" }),
            StatusCode::BAD_REQUEST,
            "missing password",
        ),
        // Validation errors (expect 422 for invalid formats/lengths after
        // successful deserialization)
        (
            json!({ "full_name": "Test User", "email": "invalid-email", "password": "Password123!" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid email format",
        ),
        (
            json!({ "full_name": "", "email": "test@example.com", "password": "Password123!" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "empty full_name",
        ),
        (
            json!({ "full_name": "Test User", "email": "test@example.com", "password": "123" }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "password too short",
        ),
    ];

    for (payload, expected_status, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(&payload)
            .to_request();

        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body_bytes = test::read_body(resp).await;

        assert_eq!(
            status,
            expected_status,
            "Test case failed: {}. Expected {}, got {}. Body: {:?}",
            description,
            expected_status,
            status,
            String::from_utf8_lossy(&body_bytes)
        );
    }
}

#[actix_rt::test]
async fn test_expired_and_foreign_tokens_are_rejected() {
    let Some(pool) = test_pool().await else { return };
    let email = "token_edge@example.com";
    delete_user(&pool, email).await;

    let app = test_app!(pool, TokenCodec::new(&test_auth_config(30)));

    let req = test::TestRequest::post()
        .uri("/register")
        .set_json(json!({
            "full_name": "Token Edge",
            "email": email,
            "password": "Password123!"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success(), "Setup: failed to register test user");

    // A token minted with the right secret but already past its window
    let expired_codec = TokenCodec::new(&test_auth_config(-5));
    let expired_token = expired_codec.issue(email).unwrap();

    let req_expired = test::TestRequest::get()
        .uri("/todos")
        .append_header(("Authorization", format!("Bearer {}", expired_token)))
        .to_request();
    let (status, challenge) = call_allowing_auth_error(&app, req_expired).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(challenge.as_deref(), Some("Bearer"));

    // A fresh token signed with a different secret
    let foreign_codec = TokenCodec::new(&AuthConfig {
        secret: "some-other-secret".to_string(),
        algorithm: Algorithm::HS256,
        token_ttl_minutes: 30,
    });
    let foreign_token = foreign_codec.issue(email).unwrap();

    let req_foreign = test::TestRequest::get()
        .uri("/todos")
        .append_header(("Authorization", format!("Bearer {}", foreign_token)))
        .to_request();
    let (status, _) = call_allowing_auth_error(&app, req_foreign).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A valid token whose subject no longer resolves to a user
    let ghost_token = TokenCodec::new(&test_auth_config(30))
        .issue("ghost@example.com")
        .unwrap();
    let req_ghost = test::TestRequest::get()
        .uri("/todos")
        .append_header(("Authorization", format!("Bearer {}", ghost_token)))
        .to_request();
    let (status, challenge) = call_allowing_auth_error(&app, req_ghost).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(challenge.as_deref(), Some("Bearer"));

    delete_user(&pool, email).await;
}

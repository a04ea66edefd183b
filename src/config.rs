use jsonwebtoken::Algorithm;
use std::env;

/// Token signing settings, read once at startup and passed into
/// `TokenCodec::new`. Nothing below `Config::from_env` reads the process
/// environment.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub token_ttl_minutes: i64,
}

pub struct Config {
    pub database_url: String,
    pub server_port: u16,
    pub server_host: String,
    pub bcrypt_cost: u32,
    pub auth: AuthConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            bcrypt_cost: env::var("BCRYPT_COST")
                .map(|v| v.parse().expect("BCRYPT_COST must be a number"))
                .unwrap_or(bcrypt::DEFAULT_COST),
            auth: AuthConfig {
                secret: env::var("SECRET_KEY").expect("SECRET_KEY must be set"),
                algorithm: env::var("ALGORITHM")
                    .expect("ALGORITHM must be set")
                    .parse()
                    .expect("ALGORITHM must be a valid signing algorithm"),
                token_ttl_minutes: env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .expect("ACCESS_TOKEN_EXPIRE_MINUTES must be a number"),
            },
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

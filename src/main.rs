use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::PgPool;

use tickbox::auth::{PasswordHasher, TokenCodec};
use tickbox::config::Config;
use tickbox::{db, routes};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    db::init_schema(&pool)
        .await
        .expect("Failed to initialize database schema");

    let pool = web::Data::new(pool);
    let codec = web::Data::new(TokenCodec::new(&config.auth));
    let hasher = web::Data::new(PasswordHasher::new(config.bcrypt_cost));

    log::info!("Starting tickbox server at {}", config.server_url());
    let bind_addr = (config.server_host, config.server_port);
    HttpServer::new(move || {
        App::new()
            .app_data(pool.clone())
            .app_data(codec.clone())
            .app_data(hasher.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(routes::health::health)
            .configure(routes::config)
    })
    .bind(bind_addr)?
    .run()
    .await
}

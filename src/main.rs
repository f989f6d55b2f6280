use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;

use flora_hotel::{config::AppConfig, db, handlers, session_middleware};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger and environment
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().expect("Invalid configuration");

    log::info!("Connecting to database {}...", config.database_url);
    let pool = db::get_db_pool(&config.database_url)
        .await
        .expect("Failed to create pool");

    log::info!("Running migrations...");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    log::info!("Starting server at http://{}", config.bind_addr);

    let pool_data = web::Data::new(pool);
    let session_key = config.session_key.clone();
    let cookie_secure = config.cookie_secure;

    HttpServer::new(move || {
        App::new()
            .app_data(pool_data.clone())
            .wrap(session_middleware(session_key.clone(), cookie_secure))
            .wrap(middleware::Logger::default())
            .configure(handlers::configure)
    })
    .bind(config.bind_addr)?
    .run()
    .await
}

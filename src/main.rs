mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use config::AppConfig;
use database::Store;
use dotenv::dotenv;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn build_cors(config: &AppConfig) -> Cors {
    config
        .allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .expose_headers(vec![header::CONTENT_TYPE])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    log::info!("🚀 Starting Astro Consult Service...");
    log::info!("📊 Database: {}", config.database_name);

    if config.cloudinary.is_none() {
        log::warn!("⚠️  Cloudinary not configured: file uploads disabled, hosted references only");
    }
    if config.otp_debug_echo {
        log::warn!("⚠️  OTP_DEBUG_ECHO is on: codes are returned in API responses");
    }

    let db = database::MongoDB::new(&config)
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to connect to MongoDB: {}", e)))?;

    log::info!("✅ MongoDB connected successfully");

    let store: Arc<dyn Store> = Arc::new(db);
    let store_data = web::Data::from(store);
    let config_data = web::Data::new(config.clone());
    let bind_address = config.bind_address();

    log::info!("🌐 Server starting on {}", bind_address);
    log::info!("📚 Swagger UI available at: http://{}/swagger-ui/", bind_address);
    log::info!("📄 OpenAPI spec at: http://{}/api-docs/openapi.json", bind_address);

    HttpServer::new(move || {
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(store_data.clone())
            .app_data(config_data.clone())
            .wrap(build_cors(&config_data))
            .wrap(middleware::SecurityHeaders)
            .wrap(middleware::RequestMetrics)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi)
            )
            .configure(api::configure)
    })
    .bind(&bind_address)?
    .run()
    .await
}

pub mod astrologers;
pub mod health;
pub mod images;
pub mod metrics;
pub mod otp;
pub mod swagger;

use crate::middleware;
use crate::utils::AppError;
use actix_web::web;

/// Registers every route on `cfg`. Shared by the server and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Malformed JSON bodies get the same envelope as every other failure
    cfg.app_data(
        web::JsonConfig::default()
            .limit(8 * 1024 * 1024)
            .error_handler(|err, _req| AppError::InvalidRequest(err.to_string()).into()),
    );

    cfg
        // Health check
        .route("/health", web::get().to(health::health_check))
        // Metrics
        .route("/metrics", web::get().to(metrics::get_metrics))
        .service(
            web::scope("/api/v1/otp")
                .route("/send", web::post().to(otp::send_otp))
        )
        // Astrologer account
        .service(
            web::scope("/api/v1/astrologer")
                .route("/register", web::post().to(astrologers::register_astrologer))
                .route("/login", web::post().to(astrologers::login))
                .service(
                    web::resource("/me")
                        .wrap(middleware::auth::AuthMiddleware)
                        .route(web::put().to(astrologers::update_profile))
                )
        )
        // Public astrologer listings
        .service(
            web::scope("/api/v1/astrologers")
                .route("", web::get().to(astrologers::get_astrologers_list))
                .route("/top", web::get().to(astrologers::get_top_astrologers))
                .route("/featured", web::get().to(astrologers::get_featured_astrologers))
                .route("/{astrologer_id}", web::get().to(astrologers::get_astrologer_details))  // catch-all, keep last
        )
        .service(
            web::scope("/api/v1/images")
                .route("/uploadImage", web::post().to(images::upload_image))
                .route("/getAllImages", web::get().to(images::get_all_images))
        );
}

use crate::database::Store;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub database: String,
    pub timestamp: i64,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(store: web::Data<dyn Store>) -> HttpResponse {
    let database = store.ping().await;

    let mut response = HealthResponse {
        status: "healthy".to_string(),
        service: "astro-consult-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: "connected".to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    };

    match database {
        Ok(()) => HttpResponse::Ok().json(response),
        Err(e) => {
            log::error!("❌ Health check: database unreachable: {}", e);
            response.status = "degraded".to_string();
            response.database = "unreachable".to_string();
            HttpResponse::ServiceUnavailable().json(response)
        }
    }
}

use crate::config::AppConfig;
use crate::database::Store;
use crate::models::{SendOtpRequest, SendOtpResponse};
use crate::services::otp_service;
use actix_web::{web, HttpResponse, ResponseError};

#[utoipa::path(
    post,
    path = "/api/v1/otp/send",
    tag = "Astrologers",
    request_body = SendOtpRequest,
    responses(
        (status = 200, description = "OTP issued", body = SendOtpResponse),
        (status = 400, description = "Invalid email")
    )
)]
pub async fn send_otp(
    store: web::Data<dyn Store>,
    config: web::Data<AppConfig>,
    request: web::Json<SendOtpRequest>,
) -> HttpResponse {
    log::info!("🔑 POST /otp/send - email: {}", request.email);

    match otp_service::issue_otp(store.get_ref(), &config, &request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            log::warn!("❌ OTP not issued: {}", e);
            e.error_response()
        }
    }
}

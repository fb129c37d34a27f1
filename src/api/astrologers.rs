use crate::config::AppConfig;
use crate::database::Store;
use crate::models::{
    AstrologerDetailResponse, AstrologerListResponse, FeaturedAstrologersResponse, LoginRequest,
    LoginResponse, MessageResponse, RegisterAstrologerRequest, Role, TopAstrologersResponse,
    UpdateProfileRequest,
};
use crate::services::auth_service::{self, Claims};
use crate::services::astrologer_service;
use crate::utils::AppError;
use actix_web::{web, HttpResponse, ResponseError};

fn log_failure(route: &str, e: &AppError) {
    if e.is_client_error() {
        log::warn!("❌ {} failed: {}", route, e);
    } else {
        log::error!("❌ {} failed: {}", route, e);
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/astrologer/register",
    tag = "Astrologers",
    request_body = RegisterAstrologerRequest,
    responses(
        (status = 201, description = "Astrologer registered", body = MessageResponse),
        (status = 400, description = "Missing fields, invalid/expired OTP or email taken"),
        (status = 500, description = "Registration failed")
    )
)]
pub async fn register_astrologer(
    store: web::Data<dyn Store>,
    config: web::Data<AppConfig>,
    request: web::Json<RegisterAstrologerRequest>,
) -> HttpResponse {
    log::info!("📝 POST /astrologer/register - email: {}", request.email);

    match astrologer_service::register_astrologer(store.get_ref(), &config, &request).await {
        Ok(response) => HttpResponse::Created().json(response),
        Err(e) => {
            log_failure("Astrologer registration", &e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/astrologer/login",
    tag = "Astrologers",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    store: web::Data<dyn Store>,
    config: web::Data<AppConfig>,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /astrologer/login - email: {}", request.email);

    match auth_service::login_astrologer(store.get_ref(), &config, &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", request.email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log_failure("Login", &e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/astrologer/me",
    tag = "Astrologers",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = AstrologerDetailResponse),
        (status = 400, description = "Invalid update"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Account no longer exists")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_profile(
    user: web::ReqData<Claims>,
    store: web::Data<dyn Store>,
    request: web::Json<UpdateProfileRequest>,
) -> HttpResponse {
    log::info!("✏️  PUT /astrologer/me - user: {}", user.sub);

    if user.role != Role::Astrologer.as_str() {
        return AppError::Unauthorized("Astrologer account required".to_string()).error_response();
    }

    match astrologer_service::update_profile(store.get_ref(), &user.sub, &request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            log_failure("Profile update", &e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/astrologers/top",
    tag = "Astrologers",
    responses(
        (status = 200, description = "Up to 20 astrologers, cheapest chat fee first", body = TopAstrologersResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_top_astrologers(store: web::Data<dyn Store>) -> HttpResponse {
    log::info!("📋 GET /astrologers/top");

    match astrologer_service::get_top_astrologers(store.get_ref()).await {
        Ok(response) => {
            log::info!("✅ Retrieved {} top astrologers", response.astrologer_data.len());
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log_failure("Top astrologers", &e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/astrologers/featured",
    tag = "Astrologers",
    responses(
        (status = 200, description = "Up to 20 astrologers, best rated first", body = FeaturedAstrologersResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_featured_astrologers(store: web::Data<dyn Store>) -> HttpResponse {
    log::info!("📋 GET /astrologers/featured");

    match astrologer_service::get_featured_astrologers(store.get_ref()).await {
        Ok(response) => {
            log::info!(
                "✅ Retrieved {} featured astrologers",
                response.featured_astrologer_data.len()
            );
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log_failure("Featured astrologers", &e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/astrologers",
    tag = "Astrologers",
    responses(
        (status = 200, description = "All astrologers (public fields)", body = AstrologerListResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_astrologers_list(store: web::Data<dyn Store>) -> HttpResponse {
    log::info!("📋 GET /astrologers");

    match astrologer_service::get_astrologers_list(store.get_ref()).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            log_failure("Astrologer list", &e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/astrologers/{astrologer_id}",
    tag = "Astrologers",
    params(
        ("astrologer_id" = String, Path, description = "Astrologer ObjectId (hex)")
    ),
    responses(
        (status = 200, description = "Astrologer details", body = AstrologerDetailResponse),
        (status = 404, description = "Astrologer not found")
    )
)]
pub async fn get_astrologer_details(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> HttpResponse {
    let astrologer_id = path.into_inner();
    log::info!("🔍 GET /astrologers/{}", astrologer_id);

    match astrologer_service::get_astrologer_details(store.get_ref(), &astrologer_id).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            log_failure("Astrologer details", &e);
            e.error_response()
        }
    }
}

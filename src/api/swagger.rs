use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Astro Consult Service API",
        version = "1.0.0",
        description = "REST API for the astrology consultation platform.\n\n**Features:**\n- OTP-gated astrologer registration and JWT login\n- Astrologer listings by fee and rating\n- Astrologer profiles\n- Reference image upload and listing\n- Health monitoring and metrics",
        contact(
            name = "Astro Consult Team",
            email = "support@astro-consult.example"
        )
    ),
    paths(
        // Astrologers
        crate::api::otp::send_otp,
        crate::api::astrologers::register_astrologer,
        crate::api::astrologers::login,
        crate::api::astrologers::update_profile,
        crate::api::astrologers::get_top_astrologers,
        crate::api::astrologers::get_featured_astrologers,
        crate::api::astrologers::get_astrologers_list,
        crate::api::astrologers::get_astrologer_details,

        // Images
        crate::api::images::upload_image,
        crate::api::images::get_all_images,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            crate::models::SendOtpRequest,
            crate::models::SendOtpResponse,
            crate::models::RegisterAstrologerRequest,
            crate::models::LoginRequest,
            crate::models::LoginResponse,
            crate::models::UpdateProfileRequest,
            crate::models::MessageResponse,
            crate::models::AstrologerPrice,
            crate::models::TopAstrologer,
            crate::models::TopAstrologersResponse,
            crate::models::FeaturedAstrologer,
            crate::models::FeaturedAstrologersResponse,
            crate::models::AstrologerProfile,
            crate::models::AstrologerListResponse,
            crate::models::AstrologerDetailResponse,
            crate::models::ImageRef,
            crate::models::UploadImageRequest,
            crate::models::ImageResponse,
            crate::models::UploadImageResponse,
            crate::models::ImagesResponse,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Astrologers", description = "Astrologer registration, login, profile and listings."),
        (name = "Images", description = "Reference images tagged by subject and exam type."),
        (name = "Health", description = "Health check and system metrics endpoints for monitoring service status."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token from /api/v1/astrologer/login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_routes() {
        let spec = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = spec["paths"].as_object().unwrap();

        assert!(paths.contains_key("/api/v1/astrologer/register"));
        assert!(paths.contains_key("/api/v1/astrologers/{astrologer_id}"));
        assert!(paths.contains_key("/api/v1/images/getAllImages"));
    }

    #[test]
    fn test_upload_documents_json_body() {
        let spec = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let upload = &spec["paths"]["/api/v1/images/uploadImage"]["post"];

        let description = upload["description"].as_str().unwrap();
        assert!(description.contains("multipart/form-data"));
        assert!(upload["requestBody"]["content"]["application/json"].is_object());
    }
}

use crate::config::AppConfig;
use crate::database::Store;
use crate::models::{ImagesResponse, UploadImageRequest, UploadImageResponse};
use crate::services::image_service;
use actix_web::{web, HttpResponse, ResponseError};

/// Store a reference image
///
/// The body is JSON, not `multipart/form-data`. Clients that used to post a
/// multipart file must send it as a base64 `data:image/...` URI (or an
/// http(s) URL) in `file`, or pass an already hosted `image` reference.
#[utoipa::path(
    post,
    path = "/api/v1/images/uploadImage",
    tag = "Images",
    request_body = UploadImageRequest,
    responses(
        (status = 201, description = "Image stored", body = UploadImageResponse),
        (status = 400, description = "Missing metadata or image source"),
        (status = 500, description = "Image host or database failure")
    )
)]
pub async fn upload_image(
    store: web::Data<dyn Store>,
    config: web::Data<AppConfig>,
    request: web::Json<UploadImageRequest>,
) -> HttpResponse {
    log::info!(
        "🖼️  POST /images/uploadImage - subject: {}, exam: {}",
        request.subject_name,
        request.exam_type
    );

    match image_service::upload_image(store.get_ref(), &config, &request).await {
        Ok(response) => HttpResponse::Created().json(response),
        Err(e) => {
            if e.is_client_error() {
                log::warn!("❌ Image upload rejected: {}", e);
            } else {
                log::error!("❌ Image upload failed: {}", e);
            }
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/images/getAllImages",
    tag = "Images",
    responses(
        (status = 200, description = "All stored images", body = ImagesResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_all_images(store: web::Data<dyn Store>) -> HttpResponse {
    log::info!("📋 GET /images/getAllImages");

    match image_service::get_all_images(store.get_ref()).await {
        Ok(response) => {
            log::info!("✅ Retrieved {} images", response.images.len());
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::error!("❌ Error fetching images: {}", e);
            e.error_response()
        }
    }
}

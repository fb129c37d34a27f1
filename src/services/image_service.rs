use crate::{
    config::AppConfig,
    database::Store,
    models::{Image, ImageRef, ImageResponse, ImagesResponse, UploadImageRequest, UploadImageResponse},
    services::cloudinary_service,
    utils::AppError,
};
use mongodb::bson::DateTime as BsonDateTime;

fn require(value: &str, field: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::InvalidRequest(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

/// Resolves where the image lives: an already hosted reference wins,
/// otherwise the file is pushed to the image host.
async fn resolve_image(config: &AppConfig, request: &UploadImageRequest) -> Result<ImageRef, AppError> {
    if let Some(image) = &request.image {
        return Ok(ImageRef {
            public_id: require(&image.public_id, "image.public_id")?,
            url: require(&image.url, "image.url")?,
        });
    }

    let file = request
        .file
        .as_deref()
        .filter(|f| !f.trim().is_empty())
        .ok_or_else(|| AppError::InvalidRequest("Please provide an image or a file to upload".to_string()))?;

    // Bad input is a client error even when no host is configured
    cloudinary_service::validate_file(file)?;

    let host = config
        .cloudinary
        .as_ref()
        .ok_or_else(|| AppError::Internal("Image hosting is not configured".to_string()))?;

    cloudinary_service::upload(host, file).await
}

pub async fn upload_image(
    store: &dyn Store,
    config: &AppConfig,
    request: &UploadImageRequest,
) -> Result<UploadImageResponse, AppError> {
    let subject_name = require(&request.subject_name, "subjectName")?;
    let exam_type = require(&request.exam_type, "examType")?;
    let image_ref = resolve_image(config, request).await?;

    let mut image = Image {
        id: None,
        subject_name,
        exam_type,
        image: image_ref,
        created_at: Some(BsonDateTime::now()),
    };

    let id = store.insert_image(image.clone()).await?;
    image.id = Some(id);

    log::info!("🖼️  Image stored: {} ({} / {})", id.to_hex(), image.subject_name, image.exam_type);

    Ok(UploadImageResponse {
        success: true,
        image: ImageResponse::from(image),
    })
}

pub async fn get_all_images(store: &dyn Store) -> Result<ImagesResponse, AppError> {
    let images = store.find_images().await?;

    Ok(ImagesResponse {
        success: true,
        images: images.into_iter().map(ImageResponse::from).collect(),
    })
}

use crate::{config::CloudinaryConfig, models::ImageRef, utils::AppError};
use base64::Engine;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct CloudinaryUploadResponse {
    public_id: String,
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct CloudinaryErrorBody {
    error: CloudinaryErrorMessage,
}

#[derive(Debug, Deserialize)]
struct CloudinaryErrorMessage {
    message: String,
}

/// Rejects `data:` URIs whose payload is not valid base64 image data.
/// Remote URLs are passed through and fetched by Cloudinary itself.
pub fn validate_file(file: &str) -> Result<(), AppError> {
    let file = file.trim();

    if file.starts_with("http://") || file.starts_with("https://") {
        return Ok(());
    }

    let (header, payload) = file
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
        .ok_or_else(|| AppError::InvalidRequest("File must be a data URI or an http(s) URL".to_string()))?;

    if !header.starts_with("image/") || !header.ends_with(";base64") {
        return Err(AppError::InvalidRequest("File must be a base64 encoded image".to_string()));
    }

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| AppError::InvalidRequest(format!("Invalid base64 image data: {}", e)))?;

    if bytes.is_empty() {
        return Err(AppError::InvalidRequest("Image data is empty".to_string()));
    }

    Ok(())
}

/// Pushes `file` to Cloudinary through an unsigned upload preset
pub async fn upload(config: &CloudinaryConfig, file: &str) -> Result<ImageRef, AppError> {
    validate_file(file)?;

    log::info!("☁️  Uploading image to Cloudinary (folder: {})", config.folder);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    let response = client
        .post(config.upload_url())
        .form(&[
            ("file", file.trim()),
            ("upload_preset", config.upload_preset.as_str()),
            ("folder", config.folder.as_str()),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let message = response
            .json::<CloudinaryErrorBody>()
            .await
            .map(|body| body.error.message)
            .unwrap_or_else(|_| "unknown error".to_string());

        return Err(AppError::UpstreamError(format!(
            "Cloudinary upload failed ({}): {}",
            status, message
        )));
    }

    let uploaded: CloudinaryUploadResponse = response.json().await?;

    Ok(ImageRef {
        public_id: uploaded.public_id,
        url: uploaded.secure_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_file() {
        assert!(validate_file("https://example.com/chart.png").is_ok());
        assert!(validate_file("data:image/png;base64,iVBORw0KGgo=").is_ok());

        assert!(validate_file("data:image/png;base64,@@@").is_err());
        assert!(validate_file("data:text/plain;base64,aGVsbG8=").is_err());
        assert!(validate_file("data:image/png;base64,").is_err());
        assert!(validate_file("/etc/passwd").is_err());
    }
}

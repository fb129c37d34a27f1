use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Reference to an externally hosted image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ImageRef {
    pub public_id: String,
    pub url: String,
}

/// Reference image tagged with subject/exam metadata (stored in MongoDB)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub subject_name: String,
    pub exam_type: String,
    pub image: ImageRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<BsonDateTime>,
}

/// Upload body: metadata plus either a hosted reference or a file to host
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadImageRequest {
    #[serde(default)]
    pub subject_name: String,
    #[serde(default)]
    pub exam_type: String,
    /// Already hosted image reference
    pub image: Option<ImageRef>,
    /// `data:` URI or remote URL to push to the image host
    pub file: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub subject_name: String,
    pub exam_type: String,
    pub image: ImageRef,
}

impl From<Image> for ImageResponse {
    fn from(image: Image) -> Self {
        Self {
            id: image.id.map(|id| id.to_hex()).unwrap_or_default(),
            subject_name: image.subject_name,
            exam_type: image.exam_type,
            image: image.image,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UploadImageResponse {
    pub success: bool,
    pub image: ImageResponse,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ImagesResponse {
    pub success: bool,
    pub images: Vec<ImageResponse>,
}

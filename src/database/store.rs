use crate::models::{Image, Otp, UpdateProfileRequest, User};
use crate::utils::AppError;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

/// Data access used by the services. Every method maps to a single
/// document-store round trip.
#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> Result<(), AppError>;

    // ---- OTPs ----

    /// Stores `otp`, replacing any previous code for the same email
    async fn upsert_otp(&self, otp: Otp) -> Result<(), AppError>;
    async fn find_otp(&self, email: &str) -> Result<Option<Otp>, AppError>;
    async fn delete_otp(&self, email: &str) -> Result<(), AppError>;

    // ---- Users ----

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn insert_user(&self, user: User) -> Result<ObjectId, AppError>;

    // ---- Astrologers ----

    /// Writes only the fields present in `request`. Returns `false` when no
    /// astrologer has this id.
    async fn update_astrologer(
        &self,
        id: ObjectId,
        request: &UpdateProfileRequest,
    ) -> Result<bool, AppError>;

    async fn find_astrologer(&self, id: ObjectId) -> Result<Option<User>, AppError>;
    /// Astrologers ordered by ascending chat fee
    async fn find_astrologers_by_chat_fee(&self, limit: i64) -> Result<Vec<User>, AppError>;
    /// Astrologers with non-negative rating, experience and fees, best rated first
    async fn find_featured_astrologers(&self, limit: i64) -> Result<Vec<User>, AppError>;
    async fn find_astrologers(&self) -> Result<Vec<User>, AppError>;

    // ---- Images ----

    async fn insert_image(&self, image: Image) -> Result<ObjectId, AppError>;
    async fn find_images(&self) -> Result<Vec<Image>, AppError>;
}

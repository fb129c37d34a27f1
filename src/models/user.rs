use crate::models::ImageRef;
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Astrologer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Astrologer => "astrologer",
            Role::Admin => "admin",
        }
    }
}

/// Consultation fees charged by an astrologer
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AstrologerPrice {
    #[serde(default)]
    pub chat_fees: f64,
    #[serde(default)]
    pub video_call_fees: f64,
}

impl AstrologerPrice {
    pub fn is_non_negative(&self) -> bool {
        self.chat_fees >= 0.0 && self.video_call_fees >= 0.0
    }
}

/// Account document in the `users` collection.
///
/// Consumers and astrologers share the collection; the astrologer fields
/// only carry meaning when `role` is [`Role::Astrologer`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub avatar: Option<ImageRef>,
    #[serde(default)]
    pub astrologer_rating: f64,
    #[serde(default)]
    pub astrologer_experience: f64,
    #[serde(default)]
    pub astrologer_skills: Vec<String>,
    #[serde(default)]
    pub is_available: bool,
    #[serde(default)]
    pub astrologer_price: AstrologerPrice,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<BsonDateTime>,
}

impl User {
    pub fn new_astrologer(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: None,
            name,
            email,
            password: Some(password_hash),
            role: Role::Astrologer,
            avatar: None,
            astrologer_rating: 0.0,
            astrologer_experience: 0.0,
            astrologer_skills: Vec::new(),
            is_available: false,
            astrologer_price: AstrologerPrice::default(),
            created_at: Some(BsonDateTime::now()),
        }
    }

    pub fn is_astrologer(&self) -> bool {
        self.role == Role::Astrologer
    }
}

// ==================== REQUESTS ====================

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterAstrologerRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub otp: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Partial profile update; absent fields stay untouched
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub avatar: Option<ImageRef>,
    pub astrologer_skills: Option<Vec<String>>,
    pub astrologer_experience: Option<f64>,
    pub is_available: Option<bool>,
    pub astrologer_price: Option<AstrologerPrice>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.avatar.is_none()
            && self.astrologer_skills.is_none()
            && self.astrologer_experience.is_none()
            && self.is_available.is_none()
            && self.astrologer_price.is_none()
    }
}

// ==================== RESPONSES ====================

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
}

/// Row of the fee-ordered listing
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct TopAstrologer {
    pub astrologer_name: String,
    pub astrologer_rating: f64,
    pub astrologer_experience: f64,
    pub chat_fees: f64,
    pub video_call_fees: f64,
}

impl From<User> for TopAstrologer {
    fn from(user: User) -> Self {
        Self {
            astrologer_name: user.name,
            astrologer_rating: user.astrologer_rating,
            astrologer_experience: user.astrologer_experience,
            chat_fees: user.astrologer_price.chat_fees,
            video_call_fees: user.astrologer_price.video_call_fees,
        }
    }
}

/// Row of the rating-ordered listing
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct FeaturedAstrologer {
    pub astrologer_name: String,
    pub astrologer_rating: f64,
    pub astrologer_skills: Vec<String>,
    pub astrologer_experience: f64,
    pub astrologer_price: AstrologerPrice,
}

impl From<User> for FeaturedAstrologer {
    fn from(user: User) -> Self {
        Self {
            astrologer_name: user.name,
            astrologer_rating: user.astrologer_rating,
            astrologer_skills: user.astrologer_skills,
            astrologer_experience: user.astrologer_experience,
            astrologer_price: user.astrologer_price,
        }
    }
}

/// Public projection of an astrologer, safe to hand to any client
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AstrologerProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub avatar: Option<ImageRef>,
    pub astrologer_rating: f64,
    pub astrologer_experience: f64,
    pub astrologer_skills: Vec<String>,
    pub is_available: bool,
}

impl From<User> for AstrologerProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: user.name,
            avatar: user.avatar,
            astrologer_rating: user.astrologer_rating,
            astrologer_experience: user.astrologer_experience,
            astrologer_skills: user.astrologer_skills,
            is_available: user.is_available,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TopAstrologersResponse {
    pub success: bool,
    #[serde(rename = "astrologerData")]
    pub astrologer_data: Vec<TopAstrologer>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct FeaturedAstrologersResponse {
    pub success: bool,
    #[serde(rename = "featuredAstrologerData")]
    pub featured_astrologer_data: Vec<FeaturedAstrologer>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AstrologerListResponse {
    pub success: bool,
    pub astrologers: Vec<AstrologerProfile>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AstrologerDetailResponse {
    pub success: bool,
    pub astrologer: AstrologerProfile,
}

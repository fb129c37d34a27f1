use crate::{
    config::AppConfig,
    database::Store,
    models::{
        AstrologerDetailResponse, AstrologerListResponse, AstrologerProfile, FeaturedAstrologer,
        FeaturedAstrologersResponse, MessageResponse, RegisterAstrologerRequest, TopAstrologer,
        TopAstrologersResponse, UpdateProfileRequest, User,
    },
    services::{auth_service, otp_service},
    utils::AppError,
};
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};

/// Maximum rows returned by the top and featured listings
pub const LISTING_LIMIT: i64 = 20;

/// Registers a new astrologer account.
///
/// The email must hold a live OTP whose code equals `request.otp`; the code
/// is consumed once the account exists.
pub async fn register_astrologer(
    store: &dyn Store,
    config: &AppConfig,
    request: &RegisterAstrologerRequest,
) -> Result<MessageResponse, AppError> {
    let name = request.name.trim();
    let email = otp_service::normalize_email(&request.email);

    if name.is_empty()
        || email.is_empty()
        || request.password.is_empty()
        || request.otp.trim().is_empty()
    {
        return Err(AppError::InvalidRequest(
            "Please provide name, email, password and otp".to_string(),
        ));
    }

    let otp = store.find_otp(&email).await?;
    let otp_valid = otp
        .as_ref()
        .is_some_and(|stored| stored.matches(&request.otp, BsonDateTime::now()));

    if !otp_valid {
        return Err(AppError::InvalidRequest("Invalid OTP or OTP expired".to_string()));
    }

    if store.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::InvalidRequest("Email already registered".to_string()));
    }

    let password_hash = auth_service::hash_password(config, &request.password)?;
    let astrologer = User::new_astrologer(name.to_string(), email.clone(), password_hash);

    let astrologer_id = store.insert_user(astrologer).await.map_err(|e| {
        AppError::Internal(format!("Error during astrologer registration: {}", e.message()))
    })?;

    // A failed delete leaves the code to the TTL index; the email is taken either way
    if let Err(e) = store.delete_otp(&email).await {
        log::warn!("⚠️  Could not consume OTP for {}: {}", email, e);
    }

    log::info!("✅ Astrologer registered: {} ({})", email, astrologer_id.to_hex());

    Ok(MessageResponse {
        success: true,
        message: "Astrologer registered successfully.".to_string(),
    })
}

/// Cheapest astrologers first (by chat fee)
pub async fn get_top_astrologers(store: &dyn Store) -> Result<TopAstrologersResponse, AppError> {
    let astrologers = store.find_astrologers_by_chat_fee(LISTING_LIMIT).await?;

    Ok(TopAstrologersResponse {
        success: true,
        astrologer_data: astrologers.into_iter().map(TopAstrologer::from).collect(),
    })
}

/// Best rated astrologers first
pub async fn get_featured_astrologers(
    store: &dyn Store,
) -> Result<FeaturedAstrologersResponse, AppError> {
    let astrologers = store.find_featured_astrologers(LISTING_LIMIT).await?;

    Ok(FeaturedAstrologersResponse {
        success: true,
        featured_astrologer_data: astrologers.into_iter().map(FeaturedAstrologer::from).collect(),
    })
}

pub async fn get_astrologers_list(store: &dyn Store) -> Result<AstrologerListResponse, AppError> {
    let astrologers = store.find_astrologers().await?;

    Ok(AstrologerListResponse {
        success: true,
        astrologers: astrologers.into_iter().map(AstrologerProfile::from).collect(),
    })
}

pub async fn get_astrologer_details(
    store: &dyn Store,
    astrologer_id: &str,
) -> Result<AstrologerDetailResponse, AppError> {
    let not_found = || AppError::NotFound(format!("Astrologer not found with id {}", astrologer_id));

    let object_id = ObjectId::parse_str(astrologer_id).map_err(|_| not_found())?;
    let astrologer = store.find_astrologer(object_id).await?.ok_or_else(not_found)?;

    Ok(AstrologerDetailResponse {
        success: true,
        astrologer: AstrologerProfile::from(astrologer),
    })
}

fn validate_profile_update(request: &UpdateProfileRequest) -> Result<(), AppError> {
    if request.is_empty() {
        return Err(AppError::InvalidRequest("No profile fields to update".to_string()));
    }
    if request.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::InvalidRequest("Name cannot be empty".to_string()));
    }
    if request.astrologer_experience.is_some_and(|x| x < 0.0) {
        return Err(AppError::InvalidRequest("Experience cannot be negative".to_string()));
    }
    if request.astrologer_price.is_some_and(|p| !p.is_non_negative()) {
        return Err(AppError::InvalidRequest("Fees cannot be negative".to_string()));
    }
    Ok(())
}

/// Applies a partial update to the calling astrologer's own profile
pub async fn update_profile(
    store: &dyn Store,
    astrologer_id: &str,
    request: &UpdateProfileRequest,
) -> Result<AstrologerDetailResponse, AppError> {
    validate_profile_update(request)?;

    let object_id = ObjectId::parse_str(astrologer_id)
        .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))?;

    let not_found = || AppError::NotFound(format!("Astrologer not found with id {}", astrologer_id));

    if !store.update_astrologer(object_id, request).await? {
        return Err(not_found());
    }

    let astrologer = store.find_astrologer(object_id).await?.ok_or_else(not_found)?;

    log::info!("✏️  Profile updated for astrologer {}", astrologer_id);

    Ok(AstrologerDetailResponse {
        success: true,
        astrologer: AstrologerProfile::from(astrologer),
    })
}

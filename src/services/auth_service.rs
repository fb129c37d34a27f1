use crate::{
    config::AppConfig,
    database::Store,
    models::{LoginRequest, LoginResponse, User},
    services::otp_service,
    utils::AppError,
};
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user _id (hex)
    pub email: String,
    pub role: String,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
    pub aud: String,
    pub iss: String,
}

pub fn hash_password(config: &AppConfig, password: &str) -> Result<String, AppError> {
    Ok(hash(password, config.bcrypt_cost)?)
}

pub fn generate_jwt(config: &AppConfig, user: &User) -> Result<String, AppError> {
    let user_id = user
        .id
        .ok_or_else(|| AppError::Internal("Cannot issue a token for an unsaved user".to_string()))?;

    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_hex(),
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(config.jwt_expiry_hours)).timestamp() as usize,
        jti: Uuid::new_v4().to_string(),
        aud: config.jwt_audience.clone(),
        iss: config.jwt_issuer.clone(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

pub fn verify_token(config: &AppConfig, token: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[config.jwt_audience.as_str()]);
    validation.set_issuer(&[config.jwt_issuer.as_str()]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

/// Astrologer login: email + password against the stored bcrypt hash
pub async fn login_astrologer(
    store: &dyn Store,
    config: &AppConfig,
    request: &LoginRequest,
) -> Result<LoginResponse, AppError> {
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let email = otp_service::normalize_email(&request.email);
    let user = store
        .find_user_by_email(&email)
        .await?
        .filter(|u| u.is_astrologer())
        .ok_or_else(invalid)?;

    let stored_hash = user.password.as_deref().ok_or_else(invalid)?;
    if !verify(&request.password, stored_hash)? {
        return Err(invalid());
    }

    let token = generate_jwt(config, &user)?;

    Ok(LoginResponse {
        success: true,
        token,
    })
}

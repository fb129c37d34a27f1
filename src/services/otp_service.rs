use crate::{
    config::AppConfig,
    database::Store,
    models::{Otp, SendOtpRequest, SendOtpResponse},
    utils::AppError,
};
use mongodb::bson::DateTime as BsonDateTime;
use rand::Rng;

const OTP_DIGITS: usize = 6;
const OTP_RANGE: u32 = 1_000_000;

/// Canonical form used as the key for both OTPs and accounts
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Zero-padded, uniformly drawn six-digit code
pub fn generate_code() -> String {
    let code = rand::thread_rng().gen_range(0..OTP_RANGE);
    format!("{:0width$}", code, width = OTP_DIGITS)
}

/// Issues a fresh code for `email`, replacing any previous one
pub async fn issue_otp(
    store: &dyn Store,
    config: &AppConfig,
    request: &SendOtpRequest,
) -> Result<SendOtpResponse, AppError> {
    let email = normalize_email(&request.email);
    if !is_valid_email(&email) {
        return Err(AppError::InvalidRequest("Please provide a valid email".to_string()));
    }

    let code = generate_code();
    let now = BsonDateTime::now();
    let expires_at = BsonDateTime::from_millis(now.timestamp_millis() + config.otp_ttl_millis());

    store
        .upsert_otp(Otp {
            id: None,
            email: email.clone(),
            otp: code.clone(),
            expires_at,
            created_at: now,
        })
        .await?;

    log::debug!("🔑 OTP for {}: {}", email, code);

    Ok(SendOtpResponse {
        success: true,
        message: format!("OTP sent to {}", email),
        otp: config.otp_debug_echo.then_some(code),
    })
}

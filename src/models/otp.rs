use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// One-time code gating astrologer registration. At most one per email.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Otp {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub otp: String,
    pub expires_at: BsonDateTime,
    pub created_at: BsonDateTime,
}

impl Otp {
    pub fn is_expired(&self, now: BsonDateTime) -> bool {
        self.expires_at <= now
    }

    /// A code matches only if it is identical and still live
    pub fn matches(&self, code: &str, now: BsonDateTime) -> bool {
        !self.is_expired(now) && self.otp == code
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SendOtpRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SendOtpResponse {
    pub success: bool,
    pub message: String,
    /// Only present when OTP_DEBUG_ECHO is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn otp_expiring_at(millis: i64) -> Otp {
        Otp {
            id: None,
            email: "a@b.c".into(),
            otp: "123456".into(),
            expires_at: BsonDateTime::from_millis(millis),
            created_at: BsonDateTime::from_millis(0),
        }
    }

    #[test]
    fn test_matches() {
        let otp = otp_expiring_at(10_000);
        assert!(otp.matches("123456", BsonDateTime::from_millis(5_000)));
        assert!(!otp.matches("654321", BsonDateTime::from_millis(5_000)));
        assert!(!otp.matches("123456", BsonDateTime::from_millis(10_000)));
    }
}

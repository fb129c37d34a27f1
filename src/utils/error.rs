use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

/// Every failure a handler can forward to the client.
///
/// The HTTP status is derived from the variant and the body is always the
/// `{ "success": false, "message": ... }` envelope.
#[derive(Debug)]
pub enum AppError {
    DatabaseError(String),
    UpstreamError(String),
    Internal(String),
    NotFound(String),
    InvalidRequest(String),
    Unauthorized(String),
}

impl AppError {
    /// Message sent to the client. Server-side variants keep their detail
    /// so that operators can correlate it with the log line.
    pub fn message(&self) -> &str {
        match self {
            AppError::DatabaseError(msg)
            | AppError::UpstreamError(msg)
            | AppError::Internal(msg)
            | AppError::NotFound(msg)
            | AppError::InvalidRequest(msg)
            | AppError::Unauthorized(msg) => msg,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::UpstreamError(msg) => write!(f, "Upstream error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) | AppError::UpstreamError(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "message": self.message()
        }))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        AppError::DatabaseError(e.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(e: bcrypt::BcryptError) -> Self {
        AppError::Internal(format!("Password hashing failed: {}", e))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::UpstreamError(e.to_string())
    }
}

pub mod astrologer_service;
pub mod auth_service;
pub mod cloudinary_service;
pub mod image_service;
pub mod otp_service;

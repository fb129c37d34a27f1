pub mod image;
pub mod otp;
pub mod user;

pub use image::*;
pub use otp::*;
pub use user::*;

pub mod otp;
pub mod password_reset;
pub mod postgres_service;
pub mod reminder;
pub mod session;
pub mod user;

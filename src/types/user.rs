use chrono::{DateTime, Utc};
use entity::user::Model as UserModel;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::error::AppError;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RUserRegister {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RUserLogin {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct REmailOtp {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct REmail {
    #[serde(default)]
    pub email: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RResetPassword {
    #[serde(default)]
    pub reset_token: String,
    #[serde(default)]
    pub password: String,
}

pub struct DBUserCreate {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// User fields that are safe to hand back to a client.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_email_verified: bool,
    pub is_logged_in: bool,
}

impl From<UserModel> for PublicUser {
    fn from(u: UserModel) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            is_email_verified: u.is_email_verified,
            is_logged_in: u.is_logged_in,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AuthRes {
    pub user: PublicUser,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ResetGrantRes {
    pub reset_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Emails are compared case-insensitively, so they are stored folded.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Reject blank fields with a message naming the first one missing.
pub fn require(fields: &[(&str, &str)]) -> Result<(), AppError> {
    match fields.iter().find(|(_, v)| v.trim().is_empty()) {
        Some((name, _)) => Err(AppError::Validation(format!("{name} must not be empty"))),
        None => Ok(()),
    }
}

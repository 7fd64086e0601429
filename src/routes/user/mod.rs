use std::time::Duration;

use entity::email_otp::OtpPurpose;
use entity::user::Model as UserModel;
use tracing::info;

use crate::db::postgres_service::PostgresService;
use crate::types::{error::AppError, user::AuthRes};
use crate::utils::{
    mail::{otp_email, Mailer},
    token::expiry_from_now,
};

pub mod delete;
pub mod forgot_password;
pub mod get_data;
pub mod login;
pub mod logout;
pub mod register;
pub mod resend_otp;
pub mod reset_password;
pub mod verify_email;
pub mod verify_email_reset;

/// Replace the pending code for (email, purpose) and mail the new one.
pub(crate) async fn send_otp(
    db: &PostgresService,
    mailer: &dyn Mailer,
    email: &str,
    purpose: OtpPurpose,
    ttl: Duration,
) -> Result<(), AppError> {
    let expires_at = expiry_from_now(ttl).ok_or_else(|| AppError::Internal("otp ttl out of range".into()))?;
    let code = db.issue_otp(email, purpose, expires_at).await?;
    mailer.send(otp_email(email, &code, purpose, ttl)).await?;
    info!(?purpose, "otp mailed");
    Ok(())
}

/// Mark the user logged in and hand back a fresh session.
pub(crate) async fn open_session(
    db: &PostgresService,
    user: &UserModel,
    verified: Option<bool>,
    ttl: Duration,
) -> Result<AuthRes, AppError> {
    let expires_at = expiry_from_now(ttl).ok_or_else(|| AppError::Internal("session ttl out of range".into()))?;
    let token = db.create_session(&user.id, expires_at).await?;
    let user = db.set_user_flags(&user.id, verified, Some(true)).await?;
    Ok(AuthRes { user: user.into(), token, expires_at })
}

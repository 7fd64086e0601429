use actix_web::{post, web};
use entity::email_otp::OtpPurpose;
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::db::postgres_service::PostgresService;
use crate::types::error::AppError;
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::user::{normalize_email, require, REmailOtp, ResetGrantRes};
use crate::utils::token::expiry_from_now;

// Verification/login state is untouched here; only a reset grant comes out.
#[post("/verify-email-reset")]
pub async fn verify_email_reset(
    db: web::Data<Arc<PostgresService>>,
    auth_cfg: web::Data<AuthConfig>,
    body: web::Json<REmailOtp>,
) -> ApiResult<ResetGrantRes> {
    require(&[("email", body.email.as_str()), ("otp", body.otp.as_str())])?;
    let email = normalize_email(&body.email);

    db.verify_otp(&email, OtpPurpose::Reset, &body.otp).await?;

    let user = db.get_user_by_email(&email).await?;
    let expires_at = expiry_from_now(auth_cfg.reset_ttl)
        .ok_or_else(|| AppError::Internal("reset ttl out of range".into()))?;
    let reset_token = db.create_reset_grant(&user.id, expires_at).await?;

    Ok(ApiResponse::Ok(ResetGrantRes { reset_token, expires_at }))
}

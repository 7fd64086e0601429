use actix_web::{post, web};
use entity::email_otp::OtpPurpose;
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::db::postgres_service::PostgresService;
use crate::routes::user::send_otp;
use crate::types::error::AppError;
use crate::types::response::{ApiResponse, ApiResult, MessageRes};
use crate::types::user::{normalize_email, require, REmail};
use crate::utils::mail::Mailer;

#[post("/resend-otp")]
pub async fn resend_otp(
    db: web::Data<Arc<PostgresService>>,
    mailer: web::Data<Arc<dyn Mailer>>,
    auth_cfg: web::Data<AuthConfig>,
    body: web::Json<REmail>,
) -> ApiResult<MessageRes> {
    require(&[("email", body.email.as_str())])?;

    let user = db.get_user_by_email(&normalize_email(&body.email)).await?;
    if user.is_email_verified {
        return Err(AppError::Conflict("email already verified".into()));
    }

    send_otp(&db, mailer.get_ref().as_ref(), &user.email, OtpPurpose::Verify, auth_cfg.otp_ttl).await?;

    Ok(ApiResponse::Ok(MessageRes::new("A new code has been sent to your email.")))
}

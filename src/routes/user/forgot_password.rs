use actix_web::{post, web};
use entity::email_otp::OtpPurpose;
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::db::postgres_service::PostgresService;
use crate::routes::user::send_otp;
use crate::types::response::{ApiResponse, ApiResult, MessageRes};
use crate::types::user::{normalize_email, require, REmail};
use crate::utils::mail::Mailer;

#[post("/forgot-password")]
pub async fn forgot_password(
    db: web::Data<Arc<PostgresService>>,
    mailer: web::Data<Arc<dyn Mailer>>,
    auth_cfg: web::Data<AuthConfig>,
    body: web::Json<REmail>,
) -> ApiResult<MessageRes> {
    require(&[("email", body.email.as_str())])?;

    let user = db.get_user_by_email(&normalize_email(&body.email)).await?;
    send_otp(&db, mailer.get_ref().as_ref(), &user.email, OtpPurpose::Reset, auth_cfg.otp_ttl).await?;

    Ok(ApiResponse::Ok(MessageRes::new(format!(
        "A reset code has been sent to your email. It is valid for {} minutes.",
        (auth_cfg.otp_ttl.as_secs() / 60).max(1)
    ))))
}

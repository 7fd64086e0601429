use actix_web::{post, web};
use entity::email_otp::OtpPurpose;
use std::sync::Arc;
use tracing::info;

use crate::config::AuthConfig;
use crate::db::postgres_service::PostgresService;
use crate::routes::user::open_session;
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::user::{normalize_email, require, AuthRes, REmailOtp};

#[post("/verify-email")]
pub async fn verify_email(
    db: web::Data<Arc<PostgresService>>,
    auth_cfg: web::Data<AuthConfig>,
    body: web::Json<REmailOtp>,
) -> ApiResult<AuthRes> {
    require(&[("email", body.email.as_str()), ("otp", body.otp.as_str())])?;
    let email = normalize_email(&body.email);

    db.verify_otp(&email, OtpPurpose::Verify, &body.otp).await?;

    let user = db.get_user_by_email(&email).await?;
    let res = open_session(&db, &user, Some(true), auth_cfg.session_ttl).await?;
    info!(user = %user.id, "email verified");
    Ok(ApiResponse::Ok(res))
}

use actix_web::{post, web};
use entity::email_otp::OtpPurpose;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::AuthConfig;
use crate::db::postgres_service::PostgresService;
use crate::routes::user::send_otp;
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::user::{normalize_email, require, DBUserCreate, PublicUser, RUserRegister};
use crate::utils::{mail::Mailer, token::hash_secret};

#[post("/register")]
pub async fn register(
    db: web::Data<Arc<PostgresService>>,
    mailer: web::Data<Arc<dyn Mailer>>,
    auth_cfg: web::Data<AuthConfig>,
    body: web::Json<RUserRegister>,
) -> ApiResult<PublicUser> {
    let body = body.into_inner();
    require(&[
        ("name", body.name.as_str()),
        ("email", body.email.as_str()),
        ("password", body.password.as_str()),
    ])?;

    let user = db
        .create_user(DBUserCreate {
            name: body.name.trim().to_string(),
            email: normalize_email(&body.email),
            password_hash: hash_secret(&body.password)?,
        })
        .await?;
    info!(user = %user.id, "registered user");

    // The account exists either way; a lost code can be re-requested via resend-otp.
    if let Err(e) = send_otp(&db, mailer.get_ref().as_ref(), &user.email, OtpPurpose::Verify, auth_cfg.otp_ttl).await {
        warn!(user = %user.id, error = %e, "failed to send verification code");
    }

    Ok(ApiResponse::Created(user.into()))
}

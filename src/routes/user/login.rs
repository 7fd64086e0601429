use actix_web::{post, web};
use std::sync::Arc;
use tracing::info;

use crate::config::AuthConfig;
use crate::db::postgres_service::PostgresService;
use crate::routes::user::open_session;
use crate::types::error::AppError;
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::user::{normalize_email, require, AuthRes, RUserLogin};
use crate::utils::token::verify_secret;

#[post("/login")]
pub async fn login(
    db: web::Data<Arc<PostgresService>>,
    auth_cfg: web::Data<AuthConfig>,
    body: web::Json<RUserLogin>,
) -> ApiResult<AuthRes> {
    require(&[("email", body.email.as_str()), ("password", body.password.as_str())])?;

    let user = db.get_user_by_email(&normalize_email(&body.email)).await?;

    if !verify_secret(&body.password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }
    // Only reveal verification state to someone who knows the password.
    if !user.is_email_verified {
        return Err(AppError::EmailNotVerified);
    }

    let res = open_session(&db, &user, None, auth_cfg.session_ttl).await?;
    info!(user = %user.id, "login");
    Ok(ApiResponse::Ok(res))
}

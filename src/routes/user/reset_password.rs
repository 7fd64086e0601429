use actix_web::{post, web};
use std::sync::Arc;
use tracing::info;

use crate::db::postgres_service::PostgresService;
use crate::types::response::{ApiResponse, ApiResult, MessageRes};
use crate::types::user::{require, RResetPassword};
use crate::utils::token::hash_secret;

#[post("/reset-password")]
pub async fn reset_password(
    db: web::Data<Arc<PostgresService>>,
    body: web::Json<RResetPassword>,
) -> ApiResult<MessageRes> {
    require(&[("password", body.password.as_str())])?;

    // Hash first so a failure here leaves the grant usable.
    let password_hash = hash_secret(&body.password)?;
    let user_id = db.consume_reset_grant(&body.reset_token).await?;
    db.update_user_password(&user_id, password_hash).await?;

    // Old sessions were opened with the old password.
    let revoked = db.delete_user_sessions(&user_id).await?;
    db.set_user_flags(&user_id, None, Some(false)).await?;
    info!(user = %user_id, revoked, "password reset");

    Ok(ApiResponse::Ok(MessageRes::new(
        "Your password has been changed, you can now log in.",
    )))
}

use actix_web::{post, web};
use std::sync::Arc;

use crate::db::postgres_service::PostgresService;
use crate::types::response::{ApiResponse, ApiResult, MessageRes};
use crate::types::session::AuthedUser;

#[post("")]
pub async fn logout(
    db: web::Data<Arc<PostgresService>>,
    authed: web::ReqData<AuthedUser>,
) -> ApiResult<MessageRes> {
    db.delete_session(&authed.session_id).await?;

    // Other devices may still be signed in.
    if db.count_live_sessions(&authed.user_id).await? == 0 {
        db.set_user_flags(&authed.user_id, None, Some(false)).await?;
    }

    Ok(ApiResponse::Ok(MessageRes::new("Logged out.")))
}

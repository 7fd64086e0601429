use actix_web::{post, web};
use std::sync::Arc;
use tracing::info;

use crate::db::postgres_service::PostgresService;
use crate::types::response::{ApiResponse, ApiResult, MessageRes};
use crate::types::session::AuthedUser;

#[post("")]
pub async fn delete(
    db: web::Data<Arc<PostgresService>>,
    authed: web::ReqData<AuthedUser>,
) -> ApiResult<MessageRes> {
    db.delete_user(&authed.user_id).await?;
    info!(user = %authed.user_id, "deleted account");
    Ok(ApiResponse::Ok(MessageRes::new("User and associated data deleted.")))
}

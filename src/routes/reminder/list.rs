use actix_web::{get, web};
use std::sync::Arc;

use crate::db::postgres_service::PostgresService;
use crate::types::reminder::ReminderListRes;
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::session::AuthedUser;

#[get("")]
pub async fn list(
    db: web::Data<Arc<PostgresService>>,
    authed: web::ReqData<AuthedUser>,
) -> ApiResult<ReminderListRes> {
    let reminders = db.list_reminders(&authed.user_id).await?;
    Ok(ApiResponse::Ok(reminders.into()))
}

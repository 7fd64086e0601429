use actix_web::{delete, web};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::postgres_service::PostgresService;
use crate::types::reminder::ReminderListRes;
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::session::AuthedUser;

#[delete("/{id}")]
pub async fn remove(
    db: web::Data<Arc<PostgresService>>,
    authed: web::ReqData<AuthedUser>,
    path: web::Path<Uuid>,
) -> ApiResult<ReminderListRes> {
    db.delete_reminder(&authed.user_id, &path.into_inner()).await?;
    let reminders = db.list_reminders(&authed.user_id).await?;
    Ok(ApiResponse::Ok(reminders.into()))
}

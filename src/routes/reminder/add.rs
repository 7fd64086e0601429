use actix_web::{post, web};
use std::sync::Arc;
use tracing::info;

use crate::db::postgres_service::PostgresService;
use crate::types::reminder::{RReminderCreate, ReminderListRes};
use crate::types::response::{ApiResponse, ApiResult};
use crate::types::session::AuthedUser;
use crate::types::user::require;

/// A `remind_at` already in the past is accepted and fires on the next scheduler pass.
#[post("")]
pub async fn add(
    db: web::Data<Arc<PostgresService>>,
    authed: web::ReqData<AuthedUser>,
    body: web::Json<RReminderCreate>,
) -> ApiResult<ReminderListRes> {
    require(&[("message", body.message.as_str()), ("remind_at", body.remind_at.as_str())])?;
    let remind_at = body.parse_remind_at()?;

    let reminder = db
        .create_reminder(&authed.user_id, &authed.email, body.message.trim().to_string(), remind_at)
        .await?;
    info!(reminder = %reminder.id, %remind_at, "reminder scheduled");

    let reminders = db.list_reminders(&authed.user_id).await?;
    Ok(ApiResponse::Created(reminders.into()))
}

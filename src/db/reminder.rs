use crate::db::postgres_service::PostgresService;
use crate::{types::error::AppError, utils::token};
use chrono::{DateTime, Utc};
use entity::reminder::{ActiveModel as ReminderActive, Column, Entity as Reminder, Model as ReminderModel};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

impl PostgresService {
    pub async fn create_reminder(
        &self,
        user_id: &Uuid,
        email: &str,
        message: String,
        remind_at: DateTime<Utc>,
    ) -> Result<ReminderModel, AppError> {
        let now = Utc::now();
        Ok(ReminderActive {
            id: Set(token::new_id()),
            user_id: Set(*user_id),
            email: Set(email.to_string()),
            message: Set(message),
            remind_at: Set(remind_at),
            is_reminded: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.database_connection)
        .await?)
    }

    pub async fn list_reminders(&self, user_id: &Uuid) -> Result<Vec<ReminderModel>, AppError> {
        Ok(Reminder::find()
            .filter(Column::UserId.eq(*user_id))
            .order_by_asc(Column::RemindAt)
            .all(&self.database_connection)
            .await?)
    }

    /// Deletes only if `user_id` owns the reminder; someone else's id reads as not found.
    pub async fn delete_reminder(&self, user_id: &Uuid, reminder_id: &Uuid) -> Result<(), AppError> {
        let res = Reminder::delete_many()
            .filter(Column::Id.eq(*reminder_id))
            .filter(Column::UserId.eq(*user_id))
            .exec(&self.database_connection)
            .await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    /// Undelivered reminders whose due time is at or before `now`, oldest first.
    pub async fn list_due_reminders(&self, now: DateTime<Utc>) -> Result<Vec<ReminderModel>, AppError> {
        Ok(Reminder::find()
            .filter(Column::IsReminded.eq(false))
            .filter(Column::RemindAt.lte(now))
            .order_by_asc(Column::RemindAt)
            .all(&self.database_connection)
            .await?)
    }

    /// Flip `is_reminded` only if nobody else has. `true` means the caller now owns delivery.
    pub async fn claim_reminder(&self, reminder_id: &Uuid) -> Result<bool, AppError> {
        let res = Reminder::update_many()
            .col_expr(Column::IsReminded, Expr::value(true))
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(Column::Id.eq(*reminder_id))
            .filter(Column::IsReminded.eq(false))
            .exec(&self.database_connection)
            .await?;
        Ok(res.rows_affected == 1)
    }
}

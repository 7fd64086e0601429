use crate::db::postgres_service::PostgresService;
use crate::{types::error::AppError, utils::token};
use chrono::{DateTime, Utc};
use entity::password_reset::{ActiveModel as ResetActive, Column, Entity as PasswordReset};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

impl PostgresService {
    /// Any older grant for the user is dropped, so only the newest one works.
    pub async fn create_reset_grant(&self, user_id: &Uuid, expires_at: DateTime<Utc>) -> Result<String, AppError> {
        PasswordReset::delete_many()
            .filter(Column::UserId.eq(*user_id))
            .exec(&self.database_connection)
            .await?;

        let id = token::new_id();
        let secret = token::new_token();

        PasswordReset::insert(ResetActive {
            id: Set(id),
            user_id: Set(*user_id),
            token_hash: Set(token::hash_secret(&secret)?),
            expires_at: Set(expires_at),
            created_at: Set(Utc::now()),
        })
        .exec(&self.database_connection)
        .await?;

        Ok(token::construct_token(&id, &secret))
    }

    /// Validate and burn a grant. Returns the user it was issued to.
    pub async fn consume_reset_grant(&self, grant: &str) -> Result<Uuid, AppError> {
        let (grant_id, secret) = token::extract_token_parts(grant).ok_or(AppError::Unauthorized)?;

        let record = PasswordReset::find_by_id(grant_id)
            .one(&self.database_connection)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if record.expires_at <= Utc::now() {
            PasswordReset::delete_by_id(record.id).exec(&self.database_connection).await?;
            return Err(AppError::TokenExpired);
        }

        if !token::verify_secret(&secret, &record.token_hash).unwrap_or(false) {
            return Err(AppError::Unauthorized);
        }

        // Whoever deletes the row owns the grant; a concurrent second use sees zero rows.
        let deleted = PasswordReset::delete_by_id(record.id)
            .exec(&self.database_connection)
            .await?
            .rows_affected;
        if deleted != 1 {
            return Err(AppError::Unauthorized);
        }

        Ok(record.user_id)
    }
}

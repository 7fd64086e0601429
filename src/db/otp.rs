use crate::db::postgres_service::PostgresService;
use crate::{types::error::AppError, utils::token};
use chrono::{DateTime, Utc};
use entity::email_otp::{
    ActiveModel as OtpActive, Column, Entity as EmailOtp, OtpPurpose,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::debug;

impl PostgresService {
    /// Replace any pending code for (email, purpose) with a fresh one. Returns the plaintext code.
    pub async fn issue_otp(
        &self,
        email: &str,
        purpose: OtpPurpose,
        expires_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        self.delete_otps(email, purpose).await?;

        let code = token::new_otp();
        let otp_hash = token::hash_secret(&code)?;

        EmailOtp::insert(OtpActive {
            id: Set(token::new_id()),
            email: Set(email.to_string()),
            purpose: Set(purpose),
            otp_hash: Set(otp_hash),
            created_at: Set(Utc::now()),
            expires_at: Set(expires_at),
        })
        .exec(&self.database_connection)
        .await?;

        debug!(?purpose, "issued otp");
        Ok(code)
    }

    /// Check `code` against the newest pending record. Consumes every pending code on success,
    /// and on expiry so a stale code cannot be retried. Of two concurrent calls with the same
    /// code only the one that deletes the row succeeds.
    pub async fn verify_otp(
        &self,
        email: &str,
        purpose: OtpPurpose,
        code: &str,
    ) -> Result<(), AppError> {
        let record = EmailOtp::find()
            .filter(Column::Email.eq(email))
            .filter(Column::Purpose.eq(purpose))
            .order_by_desc(Column::CreatedAt)
            .one(&self.database_connection)
            .await?
            .ok_or(AppError::NoPendingOtp)?;

        if record.expires_at < Utc::now() {
            self.delete_otps(email, purpose).await?;
            return Err(AppError::OtpExpired);
        }

        if !token::verify_secret(code.trim(), &record.otp_hash)? {
            return Err(AppError::InvalidOtp);
        }

        let deleted = EmailOtp::delete_by_id(record.id)
            .exec(&self.database_connection)
            .await?
            .rows_affected;
        if deleted != 1 {
            return Err(AppError::InvalidOtp);
        }

        self.delete_otps(email, purpose).await
    }

    pub async fn delete_otps(&self, email: &str, purpose: OtpPurpose) -> Result<(), AppError> {
        EmailOtp::delete_many()
            .filter(Column::Email.eq(email))
            .filter(Column::Purpose.eq(purpose))
            .exec(&self.database_connection)
            .await?;
        Ok(())
    }

    pub async fn delete_all_otps(&self, email: &str) -> Result<(), AppError> {
        EmailOtp::delete_many()
            .filter(Column::Email.eq(email))
            .exec(&self.database_connection)
            .await?;
        Ok(())
    }
}

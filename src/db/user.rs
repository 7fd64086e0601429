use crate::db::postgres_service::PostgresService;
use crate::{
    types::{error::AppError, user::DBUserCreate},
    utils::token,
};
use chrono::Utc;
use entity::user::{ActiveModel as UserActive, Column, Entity as User, Model as UserModel};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, Set,
};
use uuid::Uuid;

impl PostgresService {
    pub async fn user_exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        Ok(User::find()
            .filter(Column::Email.eq(email))
            .count(&self.database_connection)
            .await?
            > 0)
    }

    pub async fn get_user_by_id(&self, id: &Uuid) -> Result<UserModel, AppError> {
        Ok(User::find_by_id(*id)
            .one(&self.database_connection)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("User does not exist".into()))?)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<UserModel, AppError> {
        Ok(User::find()
            .filter(Column::Email.eq(email))
            .one(&self.database_connection)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("User does not exist".into()))?)
    }

    /// Signup: create an unverified, logged-out user.
    pub async fn create_user(&self, payload: DBUserCreate) -> Result<UserModel, AppError> {
        if self.user_exists_by_email(&payload.email).await? {
            return Err(AppError::AlreadyExists);
        }
        let now = Utc::now();

        // The unique index still guards the race between the check above and this insert.
        let user = UserActive {
            id: Set(token::new_id()),
            name: Set(payload.name),
            email: Set(payload.email),
            password_hash: Set(payload.password_hash),
            is_email_verified: Set(false),
            is_logged_in: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.database_connection)
        .await?;

        Ok(user)
    }

    pub async fn set_user_flags(
        &self,
        user_id: &Uuid,
        verified: Option<bool>,
        logged_in: Option<bool>,
    ) -> Result<UserModel, AppError> {
        let mut am: UserActive = self.get_user_by_id(user_id).await?.into();
        if let Some(v) = verified {
            am.is_email_verified = Set(v);
        }
        if let Some(l) = logged_in {
            am.is_logged_in = Set(l);
        }
        am.updated_at = Set(Utc::now());
        Ok(am.update(&self.database_connection).await?)
    }

    pub async fn update_user_password(&self, user_id: &Uuid, password_hash: String) -> Result<(), AppError> {
        let mut am: UserActive = self.get_user_by_id(user_id).await?.into();
        am.password_hash = Set(password_hash);
        am.updated_at = Set(Utc::now());
        Ok(am.update(&self.database_connection).await.map(|_| ())?)
    }

    /// Removes the user. Sessions, reset grants and reminders cascade; OTPs are keyed by email so go explicitly.
    pub async fn delete_user(&self, user_id: &Uuid) -> Result<(), AppError> {
        let user = self.get_user_by_id(user_id).await?;
        self.delete_all_otps(&user.email).await?;
        User::delete_by_id(user.id).exec(&self.database_connection).await?;
        Ok(())
    }
}

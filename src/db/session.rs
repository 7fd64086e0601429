use crate::db::postgres_service::PostgresService;
use crate::{
    types::{error::AppError, session::AuthedUser},
    utils::token,
};
use chrono::{DateTime, Utc};
use entity::session::{ActiveModel as SessionActive, Column, Entity as Session};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use uuid::Uuid;

impl PostgresService {
    /// Open a session and return the bearer token the client should present.
    pub async fn create_session(&self, user_id: &Uuid, expires_at: DateTime<Utc>) -> Result<String, AppError> {
        let id = token::new_id();
        let secret = token::new_token();

        Session::insert(SessionActive {
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

    pub async fn validate_session(&self, bearer: &str) -> Result<AuthedUser, AppError> {
        let (session_id, secret) = token::extract_token_parts(bearer).ok_or(AppError::Unauthorized)?;

        let session = Session::find_by_id(session_id)
            .one(&self.database_connection)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if session.expires_at <= Utc::now() {
            self.delete_session(&session.id).await?;
            return Err(AppError::TokenExpired);
        }

        // A malformed stored hash is as good as a wrong secret from the caller's side.
        if !token::verify_secret(&secret, &session.token_hash).unwrap_or(false) {
            return Err(AppError::Unauthorized);
        }

        let user = match self.get_user_by_id(&session.user_id).await {
            Ok(u) => u,
            Err(AppError::NotFound) => return Err(AppError::Unauthorized),
            Err(e) => return Err(e),
        };

        Ok(AuthedUser {
            user_id: user.id,
            session_id: session.id,
            email: user.email,
        })
    }

    pub async fn delete_session(&self, session_id: &Uuid) -> Result<(), AppError> {
        Session::delete_by_id(*session_id).exec(&self.database_connection).await?;
        Ok(())
    }

    pub async fn delete_user_sessions(&self, user_id: &Uuid) -> Result<u64, AppError> {
        Ok(Session::delete_many()
            .filter(Column::UserId.eq(*user_id))
            .exec(&self.database_connection)
            .await?
            .rows_affected)
    }

    pub async fn count_live_sessions(&self, user_id: &Uuid) -> Result<u64, AppError> {
        Ok(Session::find()
            .filter(Column::UserId.eq(*user_id))
            .filter(Column::ExpiresAt.gt(Utc::now()))
            .count(&self.database_connection)
            .await?)
    }
}

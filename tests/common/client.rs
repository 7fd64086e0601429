use actix_web::{web, App};
use chrono::{Duration, Utc};
use std::sync::Arc;
use dates_informer::{
    db::postgres_service::PostgresService,
    types::{error::AppError, user::DBUserCreate},
    utils::{
        mail::{Mailer, RecordingMailer},
        token::hash_secret,
    },
};
use uuid::Uuid;

use super::{find_otp, get_test_auth_config, test_data::PASSWORD};

pub struct TestClient {
    pub db: Arc<PostgresService>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestClient {
    pub fn new(db: Arc<PostgresService>, mailer: Arc<RecordingMailer>) -> Self {
        TestClient { db, mailer }
    }

    pub fn create_app(&self) -> actix_web::App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let mailer: Arc<dyn Mailer> = self.mailer.clone();
        App::new()
            .app_data(web::Data::new(Arc::clone(&self.db)))
            .app_data(web::Data::new(mailer))
            .app_data(web::Data::new(get_test_auth_config()))
            .configure(dates_informer::routes::configure_routes)
    }

    /// A verified user with a live session, skipping the OTP round trip.
    pub async fn create_test_user(&self, email: Option<String>) -> Result<(Uuid, String), AppError> {
        let email = email.unwrap_or_else(|| format!("user-{}@test.com", Uuid::new_v4()));

        let user = self.db.create_user(DBUserCreate {
            name: "Test User".to_string(),
            email,
            password_hash: hash_secret(PASSWORD).expect("Failed to hash password"),
        }).await?;
        self.db.set_user_flags(&user.id, Some(true), Some(true)).await?;

        let token = self.db.create_session(&user.id, Utc::now() + Duration::hours(1)).await?;
        Ok((user.id, token))
    }

    /// Most recent OTP mailed to `email`.
    pub fn last_otp(&self, email: &str) -> Option<String> {
        self.mailer.sent_to(email).last().and_then(find_otp)
    }
}

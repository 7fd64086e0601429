#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;
use sea_orm::{ColumnTrait, ConnectionTrait, Database, DatabaseConnection, EntityTrait, QueryFilter};
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::postgres::Postgres;
use dates_informer::config::AuthConfig;
use dates_informer::db::postgres_service::PostgresService;
use dates_informer::types::mail::SendEmail;
use dates_informer::utils::mail::RecordingMailer;
use entity::email_otp::{self, OtpPurpose};

pub mod client;

pub struct TestContext {
    pub db: Arc<PostgresService>,
    pub mailer: Arc<RecordingMailer>,
    /// Side connection for poking at the schema behind the service's back.
    pub conn: DatabaseConnection,
    pub _container: ContainerAsync<Postgres>,
}

impl TestContext {
    pub async fn new() -> TestContext {
        Self::with_mailer(RecordingMailer::new()).await
    }

    pub async fn with_mailer(mailer: RecordingMailer) -> TestContext {
        let postgres = Postgres::default();
        let container = postgres.start().await.expect("Failed to start postgres container");

        let host = container.get_host().await.expect("Failed to get host");
        let port = container.get_host_port_ipv4(5432).await.expect("Failed to get port");

        let db_url = format!("postgresql://postgres:postgres@{}:{}/postgres", host, port);

        let db = Arc::new(
            PostgresService::new(&db_url)
                .await
                .expect("Failed to initialize PostgresService")
        );
        let conn = Database::connect(&db_url).await.expect("Failed to open side connection");

        TestContext {
            db,
            mailer: Arc::new(mailer),
            conn,
            _container: container,
        }
    }

    pub async fn has_pending_otp(&self, email: &str, purpose: OtpPurpose) -> bool {
        email_otp::Entity::find()
            .filter(email_otp::Column::Email.eq(email))
            .filter(email_otp::Column::Purpose.eq(purpose))
            .one(&self.conn)
            .await
            .expect("Failed to query otps")
            .is_some()
    }

    pub async fn execute(&self, sql: &str) {
        self.conn.execute_unprepared(sql).await.expect("Failed to run raw sql");
    }
}

/// First six digit run in a captured message body.
pub fn find_otp(email: &SendEmail) -> Option<String> {
    let text = email.text.as_deref()?;
    text.split(|c: char| !c.is_ascii_digit())
        .find(|run| run.len() == 6)
        .map(str::to_string)
}

pub fn get_test_auth_config() -> AuthConfig {
    AuthConfig {
        otp_ttl: Duration::from_secs(600),
        session_ttl: Duration::from_secs(3600),
        reset_ttl: Duration::from_secs(900),
    }
}

// Test data helpers
pub mod test_data {
    use dates_informer::types::user::RUserRegister;

    pub const PASSWORD: &str = "correct horse battery";

    pub fn sample_user() -> RUserRegister {
        sample_user_with_email("test@example.com")
    }

    pub fn sample_user_with_email(email: &str) -> RUserRegister {
        RUserRegister {
            name: "Test User".to_string(),
            email: email.to_string(),
            password: PASSWORD.to_string(),
        }
    }
}

/// Run a request through the app and read back `(status, json)`. Middleware rejections come back
/// as `Err` from the service rather than a response, so both paths are folded here.
pub async fn send<S, R, B>(app: &S, req: R) -> (actix_web::http::StatusCode, serde_json::Value)
where
    S: actix_web::dev::Service<R, Response = actix_web::dev::ServiceResponse<B>, Error = actix_web::Error>,
    B: actix_web::body::MessageBody,
{
    let (status, bytes) = match actix_web::test::try_call_service(app, req).await {
        Ok(resp) => {
            let status = resp.status();
            (status, actix_web::test::read_body(resp).await)
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            (status, actix_web::body::to_bytes(resp.into_body()).await.unwrap_or_default())
        }
    };
    (status, serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null))
}

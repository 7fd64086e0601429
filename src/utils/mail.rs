use crate::config::MailConfig;
use crate::types::{error::AppError, mail::SendEmail};
use async_trait::async_trait;
use entity::email_otp::OtpPurpose;
use reqwest::{Client, ClientBuilder};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Outbound mail seam. The server uses [`HttpMailer`], tests swap in [`RecordingMailer`].
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: SendEmail) -> Result<(), AppError>;
}

/// Posts JSON to a Resend-compatible relay.
pub struct HttpMailer {
    client: Client,
    endpoint: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    pub fn new(cfg: &MailConfig) -> Result<Self, AppError> {
        let client: Client = ClientBuilder::new()
            .user_agent("dates-informer/0.1 (+reqwest)")
            .tcp_nodelay(true)
            .pool_idle_timeout(Duration::from_secs(30))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Mail(format!("build client failed: {e}")))?;

        Ok(Self {
            client,
            endpoint: cfg.endpoint.clone(),
            api_key: cfg.api_key.clone(),
            from: cfg.from.clone(),
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, mut email: SendEmail) -> Result<(), AppError> {
        if email.from.is_empty() {
            email.from = self.from.clone();
        }
        debug!(endpoint = %self.endpoint, subject = %email.subject, "sending mail");

        let t0 = Instant::now();
        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key) // do NOT log the key
            .json(&email)
            .send()
            .await
            .map_err(|e| AppError::Mail(format!("send failed: {e}")))?;
        let dt = t0.elapsed();

        let status = res.status();
        if status.is_success() {
            info!(%status, ms = dt.as_millis() as u64, "mail accepted by relay");
            Ok(())
        } else {
            let body = res.text().await.unwrap_or_default();
            warn!(%status, ms = dt.as_millis() as u64, %body, "mail rejected by relay");
            Err(AppError::Mail(format!("relay error: HTTP {status}: {body}")))
        }
    }
}

/// Keeps every message in memory instead of delivering it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SendEmail>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every send errors, for exercising delivery failure paths.
    pub fn failing() -> Self {
        Self { sent: Mutex::new(Vec::new()), fail: true }
    }

    pub fn sent(&self) -> Vec<SendEmail> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn sent_to(&self, address: &str) -> Vec<SendEmail> {
        self.sent()
            .into_iter()
            .filter(|e| e.to.iter().any(|t| t == address))
            .collect()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: SendEmail) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::Mail("recording mailer set to fail".into()));
        }
        self.sent
            .lock()
            .map_err(|_| AppError::Internal("mailer lock poisoned".into()))?
            .push(email);
        Ok(())
    }
}

pub fn otp_email(to: &str, code: &str, purpose: OtpPurpose, ttl: Duration) -> SendEmail {
    let minutes = (ttl.as_secs() / 60).max(1);
    let (subject, action) = match purpose {
        OtpPurpose::Verify => ("Please verify your email address", "complete your sign up"),
        OtpPurpose::Reset => ("Your password reset code", "reset your password"),
    };
    SendEmail {
        to: vec![to.to_string()],
        subject: format!("{subject} [DatesInformer]"),
        text: Some(format!(
            "Enter {code} on the website to {action}.\n\nThis code is valid for {minutes} minutes. \
             If you did not request it you can ignore this email."
        )),
        ..Default::default()
    }
}

pub fn reminder_email(to: &str, message: &str) -> SendEmail {
    SendEmail {
        to: vec![to.to_string()],
        subject: "You have a pending task [DatesInformer]".to_string(),
        text: Some(format!(
            "This is your reminder about the task:\n\n    {message}\n\nRegards,\nDatesInformer"
        )),
        ..Default::default()
    }
}

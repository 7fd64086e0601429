use std::env;
use std::time::Duration;

use thiserror::Error;

#[derive(Clone, Debug)]
pub struct EnvConfig {
    pub port: u16,
    pub db_url: String,
    pub mail: MailConfig,
    pub auth: AuthConfig,
    pub scheduler: SchedulerConfig,
}

#[derive(Clone, Debug)]
pub struct MailConfig {
    pub api_key: String,
    pub endpoint: String,
    pub from: String,
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub otp_ttl: Duration,
    pub session_ttl: Duration,
    pub reset_ttl: Duration,
}

#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    pub poll_interval: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} not set")]
    Missing(&'static str),
    #[error("environment variable {key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

pub const DEFAULT_MAIL_ENDPOINT: &str = "https://api.resend.com/emails";

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            otp_ttl: Duration::from_secs(10 * 60),
            session_ttl: Duration::from_secs(24 * 60 * 60),
            reset_ttl: Duration::from_secs(15 * 60),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { poll_interval: Duration::from_millis(1000) }
    }
}

impl EnvConfig {
    fn get_env(key: &'static str) -> Result<String, ConfigError> {
        env::var(key).map_err(|_| ConfigError::Missing(key))
    }

    fn get_env_or(key: &'static str, fallback: &str) -> String {
        env::var(key).unwrap_or_else(|_| fallback.to_string())
    }

    fn get_num<T: std::str::FromStr>(key: &'static str, fallback: T) -> Result<T, ConfigError> {
        match env::var(key) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { key, value }),
            Err(_) => Ok(fallback),
        }
    }

    fn get_nonzero_millis(key: &'static str, fallback: Duration) -> Result<Duration, ConfigError> {
        match Self::get_num(key, fallback.as_millis() as u64)? {
            0 => Err(ConfigError::Invalid { key, value: "0".to_string() }),
            ms => Ok(Duration::from_millis(ms)),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let auth_defaults = AuthConfig::default();
        let scheduler_defaults = SchedulerConfig::default();

        Ok(EnvConfig {
            port: Self::get_num("PORT", 8080)?,
            db_url: Self::get_env("POSTGRES_URI")?,
            mail: MailConfig {
                api_key: Self::get_env("MAIL_API_KEY")?,
                endpoint: Self::get_env_or("MAIL_ENDPOINT", DEFAULT_MAIL_ENDPOINT),
                from: Self::get_env("MAIL_FROM")?,
            },
            auth: AuthConfig {
                otp_ttl: Duration::from_secs(Self::get_num("OTP_TTL_SECS", auth_defaults.otp_ttl.as_secs())?),
                session_ttl: Duration::from_secs(Self::get_num("SESSION_TTL_SECS", auth_defaults.session_ttl.as_secs())?),
                reset_ttl: Duration::from_secs(Self::get_num("RESET_TTL_SECS", auth_defaults.reset_ttl.as_secs())?),
            },
            scheduler: SchedulerConfig {
                poll_interval: Self::get_nonzero_millis("REMINDER_POLL_MS", scheduler_defaults.poll_interval)?,
            },
        })
    }
}

use chrono::{DateTime, Utc};
use entity::reminder::Model as ReminderModel;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::error::AppError;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RReminderCreate {
    #[serde(default)]
    pub message: String,
    /// RFC 3339 instant, e.g. `2026-10-14T09:30:00+02:00`.
    #[serde(default)]
    pub remind_at: String,
}

impl RReminderCreate {
    pub fn parse_remind_at(&self) -> Result<DateTime<Utc>, AppError> {
        DateTime::parse_from_rfc3339(self.remind_at.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| AppError::Validation("remind_at must be an RFC 3339 timestamp".into()))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReminderRes {
    pub id: Uuid,
    pub message: String,
    pub remind_at: DateTime<Utc>,
    pub is_reminded: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ReminderModel> for ReminderRes {
    fn from(r: ReminderModel) -> Self {
        Self {
            id: r.id,
            message: r.message,
            remind_at: r.remind_at,
            is_reminded: r.is_reminded,
            created_at: r.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ReminderListRes {
    pub reminders: Vec<ReminderRes>,
}

impl From<Vec<ReminderModel>> for ReminderListRes {
    fn from(list: Vec<ReminderModel>) -> Self {
        Self { reminders: list.into_iter().map(ReminderRes::from).collect() }
    }
}

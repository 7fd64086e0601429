use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::db::postgres_service::PostgresService;
use crate::types::error::AppError;
use crate::utils::mail::{reminder_email, Mailer};

/// Outcome of one dispatch pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    /// Rows that were due when the pass started.
    pub due: usize,
    /// Rows this pass won the claim on.
    pub claimed: usize,
    pub sent: usize,
    pub failed: usize,
}

/// Polls for due reminders and mails their owners. One instance per process.
pub struct ReminderScheduler {
    db: Arc<PostgresService>,
    mailer: Arc<dyn Mailer>,
    poll_interval: Duration,
    cancel: CancellationToken,
}

impl ReminderScheduler {
    pub fn new(
        db: Arc<PostgresService>,
        mailer: Arc<dyn Mailer>,
        poll_interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self { db, mailer, poll_interval, cancel }
    }

    /// Run until cancelled. Meant to be spawned:
    ///
    /// ```rust,ignore
    /// tokio::spawn(ReminderScheduler::new(db, mailer, every, cancel.child_token()).run());
    /// ```
    pub async fn run(self) {
        info!(interval_ms = self.poll_interval.as_millis() as u64, "reminder scheduler started");
        let mut tick = tokio::time::interval(self.poll_interval);
        // a slow pass must not cause a burst of catch-up passes
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("reminder scheduler cancelled");
                    break;
                }
                _ = tick.tick() => {
                    match self.dispatch_due(Utc::now()).await {
                        Ok(report) if report.due > 0 => info!(?report, "dispatch pass finished"),
                        Ok(_) => {}
                        Err(e) => error!(error = %e, "dispatch pass failed"),
                    }
                }
            }
        }
    }

    /// One pass: claim every reminder due at `now`, then mail it. Delivery is at-most-once, so a
    /// reminder whose send fails stays claimed.
    pub async fn dispatch_due(&self, now: DateTime<Utc>) -> Result<DispatchReport, AppError> {
        let due = self.db.list_due_reminders(now).await?;
        let mut report = DispatchReport { due: due.len(), ..Default::default() };

        for reminder in due {
            match self.db.claim_reminder(&reminder.id).await {
                Ok(true) => report.claimed += 1,
                Ok(false) => {
                    debug!(reminder = %reminder.id, "already claimed elsewhere");
                    continue;
                }
                Err(e) => {
                    warn!(reminder = %reminder.id, error = %e, "claim failed");
                    report.failed += 1;
                    continue;
                }
            }

            match self.mailer.send(reminder_email(&reminder.email, &reminder.message)).await {
                Ok(()) => {
                    info!(reminder = %reminder.id, "reminder sent");
                    report.sent += 1;
                }
                Err(e) => {
                    warn!(reminder = %reminder.id, error = %e, "reminder delivery failed");
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}

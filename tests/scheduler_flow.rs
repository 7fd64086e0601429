mod common;

use chrono::{Duration, Utc};
use common::{client::TestClient, TestContext};
use dates_informer::scheduler::{DispatchReport, ReminderScheduler};
use dates_informer::utils::mail::{Mailer, RecordingMailer};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn scheduler_for(ctx: &TestContext, mailer: Arc<dyn Mailer>) -> ReminderScheduler {
    ReminderScheduler::new(
        ctx.db.clone(),
        mailer,
        std::time::Duration::from_millis(20),
        CancellationToken::new(),
    )
}

#[tokio::test]
async fn test_only_due_reminders_are_sent_once() {
    let ctx = TestContext::new().await;
    let client = TestClient::new(ctx.db.clone(), ctx.mailer.clone());
    let (user_id, _) = client.create_test_user(Some("due@example.com".into())).await.unwrap();

    let now = Utc::now();
    ctx.db.create_reminder(&user_id, "due@example.com", "overdue".into(), now - Duration::minutes(5)).await.unwrap();
    ctx.db.create_reminder(&user_id, "due@example.com", "exactly now".into(), now).await.unwrap();
    ctx.db.create_reminder(&user_id, "due@example.com", "later".into(), now + Duration::hours(1)).await.unwrap();

    let scheduler = scheduler_for(&ctx, ctx.mailer.clone());

    let report = scheduler.dispatch_due(now).await.unwrap();
    assert_eq!(report, DispatchReport { due: 2, claimed: 2, sent: 2, failed: 0 });

    let sent = ctx.mailer.sent_to("due@example.com");
    assert_eq!(sent.len(), 2);
    assert!(sent[0].text.as_deref().unwrap().contains("overdue"));
    assert!(sent[1].text.as_deref().unwrap().contains("exactly now"));

    // nothing new is due
    let report = scheduler.dispatch_due(now).await.unwrap();
    assert_eq!(report, DispatchReport::default());
    assert_eq!(ctx.mailer.sent().len(), 2);

    let reminders = ctx.db.list_reminders(&user_id).await.unwrap();
    let flags: Vec<(String, bool)> = reminders.into_iter().map(|r| (r.message, r.is_reminded)).collect();
    assert_eq!(flags, vec![
        ("overdue".to_string(), true),
        ("exactly now".to_string(), true),
        ("later".to_string(), false),
    ]);

    // once its time comes the last one fires too
    let report = scheduler.dispatch_due(now + Duration::hours(2)).await.unwrap();
    assert_eq!(report.sent, 1);
}

#[tokio::test]
async fn test_concurrent_passes_deliver_at_most_once() {
    let ctx = TestContext::new().await;
    let client = TestClient::new(ctx.db.clone(), ctx.mailer.clone());
    let (user_id, _) = client.create_test_user(Some("race@example.com".into())).await.unwrap();

    let now = Utc::now();
    for i in 0..10 {
        ctx.db
            .create_reminder(&user_id, "race@example.com", format!("task {i}"), now - Duration::seconds(i))
            .await
            .unwrap();
    }

    let a = scheduler_for(&ctx, ctx.mailer.clone());
    let b = scheduler_for(&ctx, ctx.mailer.clone());
    let (ra, rb) = tokio::join!(a.dispatch_due(now), b.dispatch_due(now));
    let (ra, rb) = (ra.unwrap(), rb.unwrap());

    assert_eq!(ra.claimed + rb.claimed, 10);
    assert_eq!(ra.sent + rb.sent, 10);
    assert_eq!(ctx.mailer.sent_to("race@example.com").len(), 10);
}

#[tokio::test]
async fn test_failed_delivery_is_not_retried() {
    let ctx = TestContext::new().await;
    let client = TestClient::new(ctx.db.clone(), ctx.mailer.clone());
    let (user_id, _) = client.create_test_user(Some("flaky@example.com".into())).await.unwrap();

    let now = Utc::now();
    ctx.db.create_reminder(&user_id, "flaky@example.com", "a".into(), now - Duration::minutes(1)).await.unwrap();
    ctx.db.create_reminder(&user_id, "flaky@example.com", "b".into(), now - Duration::minutes(2)).await.unwrap();

    let failing = Arc::new(RecordingMailer::failing());
    let scheduler = scheduler_for(&ctx, failing.clone());

    let report = scheduler.dispatch_due(now).await.unwrap();
    assert_eq!(report, DispatchReport { due: 2, claimed: 2, sent: 0, failed: 2 });

    let report = scheduler.dispatch_due(now).await.unwrap();
    assert_eq!(report.due, 0);
    assert!(ctx.db.list_reminders(&user_id).await.unwrap().iter().all(|r| r.is_reminded));
}

#[tokio::test]
async fn test_run_loop_delivers_and_stops_on_cancel() {
    let ctx = TestContext::new().await;
    let client = TestClient::new(ctx.db.clone(), ctx.mailer.clone());
    let (user_id, _) = client.create_test_user(Some("loop@example.com".into())).await.unwrap();

    // due a moment after the loop starts
    ctx.db
        .create_reminder(&user_id, "loop@example.com", "stretch".into(), Utc::now() + Duration::milliseconds(100))
        .await
        .unwrap();

    let cancel = CancellationToken::new();
    let mailer: Arc<dyn Mailer> = ctx.mailer.clone();
    let scheduler = ReminderScheduler::new(
        ctx.db.clone(),
        mailer,
        std::time::Duration::from_millis(20),
        cancel.clone(),
    );
    let task = tokio::spawn(scheduler.run());

    let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(10);
    while ctx.mailer.sent_to("loop@example.com").is_empty() {
        assert!(tokio::time::Instant::now() < deadline, "reminder was never sent");
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }

    cancel.cancel();
    let result = tokio::time::timeout(std::time::Duration::from_secs(2), task).await;
    assert!(result.is_ok(), "scheduler should finish after cancel");
    assert_eq!(ctx.mailer.sent_to("loop@example.com").len(), 1);
}

#[tokio::test]
async fn test_claim_error_is_counted_and_pass_continues() {
    let ctx = TestContext::new().await;
    let client = TestClient::new(ctx.db.clone(), ctx.mailer.clone());
    let (user_id, _) = client.create_test_user(Some("claim@example.com".into())).await.unwrap();

    let now = Utc::now();
    ctx.db.create_reminder(&user_id, "claim@example.com", "blocked".into(), now - Duration::minutes(2)).await.unwrap();
    ctx.db.create_reminder(&user_id, "claim@example.com", "open".into(), now - Duration::minutes(1)).await.unwrap();

    // make the claim update fail for one row only
    ctx.execute(
        "CREATE FUNCTION reject_blocked() RETURNS trigger AS $$ \
         BEGIN IF OLD.message = 'blocked' THEN RAISE EXCEPTION 'claim rejected'; END IF; RETURN NEW; END \
         $$ LANGUAGE plpgsql",
    )
    .await;
    ctx.execute(
        "CREATE TRIGGER reject_blocked BEFORE UPDATE ON reminder FOR EACH ROW EXECUTE PROCEDURE reject_blocked()",
    )
    .await;

    let scheduler = scheduler_for(&ctx, ctx.mailer.clone());
    let report = scheduler.dispatch_due(now).await.unwrap();
    assert_eq!(report, DispatchReport { due: 2, claimed: 1, sent: 1, failed: 1 });

    let sent = ctx.mailer.sent_to("claim@example.com");
    assert_eq!(sent.len(), 1);
    assert!(sent[0].text.as_deref().unwrap().contains("open"));

    // the failed claim rolled back, so the row is picked up once the update works again
    ctx.execute("DROP TRIGGER reject_blocked ON reminder").await;
    let report = scheduler.dispatch_due(now).await.unwrap();
    assert_eq!(report, DispatchReport { due: 1, claimed: 1, sent: 1, failed: 0 });
}

#[tokio::test]
async fn test_run_loop_survives_database_outage() {
    let ctx = TestContext::new().await;
    let client = TestClient::new(ctx.db.clone(), ctx.mailer.clone());
    let (user_id, _) = client.create_test_user(Some("outage@example.com".into())).await.unwrap();

    ctx.db
        .create_reminder(&user_id, "outage@example.com", "after outage".into(), Utc::now() - Duration::minutes(1))
        .await
        .unwrap();

    // every pass errors while the table is missing
    ctx.execute("ALTER TABLE reminder RENAME TO reminder_offline").await;

    let cancel = CancellationToken::new();
    let mailer: Arc<dyn Mailer> = ctx.mailer.clone();
    let scheduler = ReminderScheduler::new(
        ctx.db.clone(),
        mailer,
        std::time::Duration::from_millis(20),
        cancel.clone(),
    );
    let task = tokio::spawn(scheduler.run());

    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    assert!(!task.is_finished(), "scheduler must keep running through failed passes");
    assert!(ctx.mailer.sent().is_empty());

    ctx.execute("ALTER TABLE reminder_offline RENAME TO reminder").await;

    let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(10);
    while ctx.mailer.sent_to("outage@example.com").is_empty() {
        assert!(tokio::time::Instant::now() < deadline, "reminder was never sent after recovery");
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }

    cancel.cancel();
    let result = tokio::time::timeout(std::time::Duration::from_secs(2), task).await;
    assert!(matches!(result, Ok(Ok(()))), "scheduler should exit cleanly after cancel");
    assert_eq!(ctx.mailer.sent_to("outage@example.com").len(), 1);
}

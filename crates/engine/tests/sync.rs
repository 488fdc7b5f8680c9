use chrono::NaiveDate;

use engine::{
    EngineError, SYNC_READY, TransactionKind,
    commands::{NewReminderCmd, RecordTransactionCmd},
};

mod common;

use common::{customer, engine_with_db, user};

#[tokio::test]
async fn status_is_ready_before_any_sync() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;

    let status = engine.sync_status(&alice).await.unwrap();
    assert_eq!(status.sync_status, SYNC_READY);
    assert_eq!(status.device_id, None);
    assert_eq!(status.last_sync, None);
}

#[tokio::test]
async fn snapshot_carries_full_state_and_logs_the_device() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    let bob = user(&engine, "bob@example.com").await;
    let party = customer(&engine, &alice, "Ravi").await;
    customer(&engine, &bob, "Other").await;

    engine
        .record_transaction(RecordTransactionCmd::new(
            &alice,
            party.id,
            10_000,
            TransactionKind::Credit,
        ))
        .await
        .unwrap();
    engine
        .new_reminder(NewReminderCmd::new(
            &alice,
            party.id,
            10_000,
            NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
        ))
        .await
        .unwrap();

    let snapshot = engine.sync(&alice, "pixel-7").await.unwrap();
    assert_eq!(snapshot.status, "success");
    assert_eq!(snapshot.parties.len(), 1);
    assert_eq!(snapshot.parties[0].balance_minor, 10_000);
    assert_eq!(snapshot.transactions.len(), 1);
    assert_eq!(snapshot.reminders.len(), 1);

    let status = engine.sync_status(&alice).await.unwrap();
    assert_eq!(status.device_id.as_deref(), Some("pixel-7"));
    assert_eq!(status.last_sync, Some(snapshot.timestamp));
    assert_eq!(status.status.as_deref(), Some("success"));

    let other = engine.sync_status(&bob).await.unwrap();
    assert_eq!(other.device_id, None);
}

#[tokio::test]
async fn blank_device_id_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;

    let err = engine.sync(&alice, "  ").await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
    assert_eq!(engine.sync_status(&alice).await.unwrap().device_id, None);
}

use chrono::{Days, Utc};

use engine::{
    DailyWindow, EngineError, PartyType, ReminderStatus, Summary, TransactionKind,
    commands::{NewPartyCmd, NewReminderCmd, RecordTransactionCmd, UpdateReminderCmd},
};

mod common;

use common::{customer, engine_with_db, user};

#[tokio::test]
async fn summary_of_empty_user_is_all_zero() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;

    let summary = engine.report_summary(&alice).await.unwrap();
    assert_eq!(summary, Summary::default());
}

#[tokio::test]
async fn summary_matches_party_balances() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    let bob = user(&engine, "bob@example.com").await;

    let ravi = customer(&engine, &alice, "Ravi").await;
    engine
        .record_transaction(RecordTransactionCmd::new(
            &alice,
            ravi.id,
            10_000,
            TransactionKind::Credit,
        ))
        .await
        .unwrap();
    engine
        .record_transaction(RecordTransactionCmd::new(
            &alice,
            ravi.id,
            3_000,
            TransactionKind::Debit,
        ))
        .await
        .unwrap();
    engine
        .new_party(
            NewPartyCmd::new(&alice, "Mill", PartyType::Supplier).opening_balance_minor(-25_000),
        )
        .await
        .unwrap();

    // Another user's ledger never leaks into the summary.
    let other = customer(&engine, &bob, "Other").await;
    engine
        .record_transaction(RecordTransactionCmd::new(
            &bob,
            other.id,
            99_900,
            TransactionKind::Credit,
        ))
        .await
        .unwrap();

    let today = Utc::now().date_naive();
    let reminder = engine
        .new_reminder(NewReminderCmd::new(&alice, ravi.id, 7_000, today))
        .await
        .unwrap();

    let summary = engine.report_summary(&alice).await.unwrap();
    assert_eq!(
        summary,
        Summary {
            total_credit_minor: 10_000,
            total_debit_minor: 28_000,
            total_receivable_minor: 7_000,
            total_payable_minor: 25_000,
            net_balance_minor: -18_000,
            pending_reminders: 1,
        }
    );

    engine
        .update_reminder(
            UpdateReminderCmd::new(&alice, reminder.id).status(ReminderStatus::Completed),
        )
        .await
        .unwrap();
    let summary = engine.report_summary(&alice).await.unwrap();
    assert_eq!(summary.pending_reminders, 0);
}

#[tokio::test]
async fn daily_groups_by_date_and_kind_inside_the_window() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    let ravi = customer(&engine, &alice, "Ravi").await;

    let today = Utc::now().date_naive();
    let old = today.checked_sub_days(Days::new(10)).unwrap();
    for (amount_minor, kind, date) in [
        (1_000, TransactionKind::Credit, today),
        (2_000, TransactionKind::Credit, today),
        (500, TransactionKind::Debit, today),
        (4_000, TransactionKind::Credit, old),
    ] {
        engine
            .record_transaction(
                RecordTransactionCmd::new(&alice, ravi.id, amount_minor, kind).date(date),
            )
            .await
            .unwrap();
    }

    let report = engine
        .report_daily(&alice, DailyWindow::parse(Some("abc")))
        .await
        .unwrap();
    assert_eq!(report.days, 7);
    assert_eq!(report.total(), 2);
    let credit = report
        .items
        .iter()
        .find(|item| item.kind == TransactionKind::Credit)
        .unwrap();
    assert_eq!((credit.date, credit.amount_minor), (today, 3_000));
    let debit = report
        .items
        .iter()
        .find(|item| item.kind == TransactionKind::Debit)
        .unwrap();
    assert_eq!(debit.amount_minor, 500);

    let wide = engine
        .report_daily(&alice, DailyWindow::new(30))
        .await
        .unwrap();
    assert_eq!(wide.total(), 3);
    assert_eq!(wide.items[0].date, old);
}

#[tokio::test]
async fn party_wise_includes_parties_without_transactions() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    let ravi = customer(&engine, &alice, "Ravi").await;
    let idle = customer(&engine, &alice, "Zed").await;

    for (amount_minor, kind) in [
        (10_000, TransactionKind::Credit),
        (2_500, TransactionKind::Credit),
        (3_000, TransactionKind::Debit),
    ] {
        engine
            .record_transaction(RecordTransactionCmd::new(&alice, ravi.id, amount_minor, kind))
            .await
            .unwrap();
    }

    let rows = engine.report_party_wise(&alice).await.unwrap();
    assert_eq!(rows.len(), 2);

    let active = rows.iter().find(|row| row.party_id == ravi.id).unwrap();
    assert_eq!(active.party_name, "Ravi");
    assert_eq!(active.party_type, PartyType::Customer);
    assert_eq!(active.credit_minor, 12_500);
    assert_eq!(active.debit_minor, 3_000);
    assert_eq!(active.balance_minor, 9_500);
    assert_eq!(active.transaction_count, 3);

    let empty = rows.iter().find(|row| row.party_id == idle.id).unwrap();
    assert_eq!(
        (empty.credit_minor, empty.debit_minor, empty.balance_minor),
        (0, 0, 0)
    );
    assert_eq!(empty.transaction_count, 0);
}

#[tokio::test]
async fn summary_overflow_is_an_invalid_amount() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;

    for name in ["Ravi", "Meena"] {
        engine
            .new_party(
                NewPartyCmd::new(&alice, name, PartyType::Customer)
                    .opening_balance_minor(i64::MAX),
            )
            .await
            .unwrap();
    }

    let err = engine.report_summary(&alice).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)), "{err:?}");
}

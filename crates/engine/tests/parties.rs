use chrono::NaiveDate;

use engine::{
    EngineError, ErrorKind, PartyType, ReminderStatus, TransactionKind,
    commands::{
        NewPartyCmd, NewReminderCmd, NewUserCmd, RecordTransactionCmd, UpdatePartyCmd,
        UpdateProfileCmd, UpdateReminderCmd,
    },
};

mod common;

use common::{customer, engine_with_db, user};

#[tokio::test]
async fn parties_are_listed_per_owner_and_type() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    let bob = user(&engine, "bob@example.com").await;

    customer(&engine, &alice, "Ravi").await;
    engine
        .new_party(NewPartyCmd::new(&alice, "Mill", PartyType::Supplier).phone("98765"))
        .await
        .unwrap();
    customer(&engine, &bob, "Other").await;

    let all = engine.list_parties(&alice, None).await.unwrap();
    let names: Vec<&str> = all.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Mill", "Ravi"]);

    let suppliers = engine
        .list_parties(&alice, Some(PartyType::Supplier))
        .await
        .unwrap();
    assert_eq!(suppliers.len(), 1);
    assert_eq!(suppliers[0].phone.as_deref(), Some("98765"));
}

#[tokio::test]
async fn blank_party_name_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;

    let err = engine
        .new_party(NewPartyCmd::new(&alice, "   ", PartyType::Customer))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);
}

#[tokio::test]
async fn party_patch_keeps_absent_fields_and_clears_empty_ones() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    let party = engine
        .new_party(
            NewPartyCmd::new(&alice, "Ravi", PartyType::Customer)
                .phone("111")
                .address("Market road")
                .opening_balance_minor(1_000),
        )
        .await
        .unwrap();

    let updated = engine
        .update_party(UpdatePartyCmd::new(&alice, party.id).name("Ravi K").phone(""))
        .await
        .unwrap();
    assert_eq!(updated.name, "Ravi K");
    assert_eq!(updated.phone, None);
    assert_eq!(updated.address.as_deref(), Some("Market road"));
    assert_eq!(updated.balance_minor, 1_000);

    let stored = engine.party(&alice, party.id).await.unwrap();
    assert_eq!(stored.name, "Ravi K");
    assert_eq!(stored.phone, None);
}

#[tokio::test]
async fn other_users_cannot_see_or_touch_a_party() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    let bob = user(&engine, "bob@example.com").await;
    let party = customer(&engine, &alice, "Ravi").await;

    let not_found = EngineError::KeyNotFound("party not exists".to_string());
    assert_eq!(engine.party(&bob, party.id).await.unwrap_err(), not_found);
    assert_eq!(
        engine
            .update_party(UpdatePartyCmd::new(&bob, party.id).name("Mine"))
            .await
            .unwrap_err(),
        not_found
    );
    assert_eq!(
        engine.delete_party(&bob, party.id).await.unwrap_err(),
        not_found
    );
    assert_eq!(engine.party(&alice, party.id).await.unwrap().name, "Ravi");
}

#[tokio::test]
async fn party_with_dependents_cannot_be_deleted() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    let with_tx = customer(&engine, &alice, "Ravi").await;
    let with_reminder = customer(&engine, &alice, "Sita").await;
    let clean = customer(&engine, &alice, "Zed").await;

    engine
        .record_transaction(RecordTransactionCmd::new(
            &alice,
            with_tx.id,
            100,
            TransactionKind::Credit,
        ))
        .await
        .unwrap();
    engine
        .new_reminder(NewReminderCmd::new(
            &alice,
            with_reminder.id,
            100,
            NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
        ))
        .await
        .unwrap();

    let err = engine.delete_party(&alice, with_tx.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    let err = engine
        .delete_party(&alice, with_reminder.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    engine.delete_party(&alice, clean.id).await.unwrap();
    assert_eq!(
        engine.party(&alice, clean.id).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[tokio::test]
async fn reminder_lifecycle() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;
    let bob = user(&engine, "bob@example.com").await;
    let party = customer(&engine, &alice, "Ravi").await;
    let due = NaiveDate::from_ymd_opt(2026, 11, 5).unwrap();

    let err = engine
        .new_reminder(NewReminderCmd::new(&bob, party.id, 100, due))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let err = engine
        .new_reminder(NewReminderCmd::new(&alice, party.id, 0, due))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);

    let reminder = engine
        .new_reminder(NewReminderCmd::new(&alice, party.id, 5_000, due).message("Pay soon"))
        .await
        .unwrap();
    assert_eq!(reminder.status, ReminderStatus::Pending);

    let done = engine
        .update_reminder(
            UpdateReminderCmd::new(&alice, reminder.id).status(ReminderStatus::Completed),
        )
        .await
        .unwrap();
    assert_eq!(done.status, ReminderStatus::Completed);
    assert_eq!(done.message.as_deref(), Some("Pay soon"));

    assert!(
        engine
            .list_reminders(&alice, Some(ReminderStatus::Pending))
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(
        engine
            .list_reminders(&alice, Some(ReminderStatus::Completed))
            .await
            .unwrap()
            .len(),
        1
    );
    assert_eq!(
        engine.reminder(&bob, reminder.id).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );

    engine.delete_reminder(&alice, reminder.id).await.unwrap();
    assert!(engine.list_reminders(&alice, None).await.unwrap().is_empty());
    // Reminders never move the balance.
    assert_eq!(engine.party(&alice, party.id).await.unwrap().balance_minor, 0);
}

#[tokio::test]
async fn users_have_unique_emails_and_default_settings() {
    let (engine, _db) = engine_with_db().await;
    let alice = user(&engine, "alice@example.com").await;

    let err = engine
        .new_user(NewUserCmd {
            email: "ALICE@example.com".to_string(),
            name: "Other".to_string(),
            phone: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let settings = engine.user_settings(&alice).await.unwrap();
    assert_eq!(settings.language, "en");
    assert_eq!(settings.theme, "theme-classic");
    assert_eq!(settings.font_size, "medium");

    let profile = engine
        .update_profile(UpdateProfileCmd {
            user_id: alice.clone(),
            name: Some("Alice S".to_string()),
            phone: Some("555".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(profile.name, "Alice S");
    assert_eq!(engine.user(&alice).await.unwrap().phone.as_deref(), Some("555"));

    assert_eq!(
        engine.user("missing").await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[tokio::test]
async fn concurrent_signups_with_one_email_yield_one_user() {
    let (engine, _db, path) = common::engine_with_file_db().await;
    let engine = std::sync::Arc::new(engine);

    let mut handles = Vec::new();
    for n in 0..8 {
        let engine = std::sync::Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            engine
                .new_user(NewUserCmd {
                    email: "Shared@Example.com".to_string(),
                    name: format!("User {n}"),
                    phone: None,
                })
                .await
        }));
    }

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(user) => {
                assert_eq!(user.email, "shared@example.com");
                created += 1;
            }
            Err(err) => assert!(matches!(err, EngineError::ExistingKey(_)), "{err:?}"),
        }
    }
    assert_eq!(created, 1);

    drop(engine);
    let _ = std::fs::remove_file(path);
}

#![allow(dead_code)]

use std::path::PathBuf;

use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

use engine::{
    Engine, Party, PartyType,
    commands::{NewPartyCmd, NewUserCmd},
};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub async fn engine_with_file_db() -> (Engine, DatabaseConnection, PathBuf) {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();

    let path = root.join(format!("engine_{}.db", Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());

    let db = Database::connect(&url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();

    (engine, db, path)
}

/// Create a user and return its id.
pub async fn user(engine: &Engine, email: &str) -> String {
    engine
        .new_user(NewUserCmd {
            email: email.to_string(),
            name: "Test".to_string(),
            phone: None,
        })
        .await
        .unwrap()
        .id
}

pub async fn customer(engine: &Engine, user_id: &str, name: &str) -> Party {
    engine
        .new_party(NewPartyCmd::new(user_id, name, PartyType::Customer))
        .await
        .unwrap()
}

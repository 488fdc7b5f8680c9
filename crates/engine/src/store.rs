//! Storage seam used by the ledger.
//!
//! The ledger never talks to sea-orm directly: it begins a [`LedgerUnit`]
//! from a [`LedgerStore`], works through the repository traits and commits.
//! Dropping a unit without committing discards every write made through it.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    DatabaseConnection, DatabaseTransaction, QueryFilter, QuerySelect, TransactionTrait,
    prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{ResultEngine, Transaction, parties, transactions};

/// Balance access for parties.
#[async_trait]
pub trait PartyRepository: Send {
    /// Takes the write lock on the party row and returns its balance.
    ///
    /// Returns `None` when the party does not exist or is owned by another
    /// user.
    async fn lock_balance(&mut self, user_id: &str, party_id: Uuid) -> ResultEngine<Option<i64>>;

    /// Overwrites the stored balance. Only the ledger calls this.
    async fn set_balance(
        &mut self,
        user_id: &str,
        party_id: Uuid,
        balance_minor: i64,
    ) -> ResultEngine<()>;
}

#[async_trait]
pub trait TransactionRepository: Send {
    async fn insert(&mut self, tx: &Transaction) -> ResultEngine<()>;
}

/// One atomic unit of work over both repositories.
#[async_trait]
pub trait LedgerUnit: PartyRepository + TransactionRepository {
    async fn commit(self: Box<Self>) -> ResultEngine<()>;
}

#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn begin(&self) -> ResultEngine<Box<dyn LedgerUnit>>;
}

/// Relational store backed by a sea-orm connection.
#[derive(Clone, Debug)]
pub struct SeaOrmLedgerStore {
    database: DatabaseConnection,
}

impl SeaOrmLedgerStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

#[async_trait]
impl LedgerStore for SeaOrmLedgerStore {
    async fn begin(&self) -> ResultEngine<Box<dyn LedgerUnit>> {
        let db_tx = self.database.begin().await?;
        Ok(Box::new(SeaOrmUnit::new(db_tx)))
    }
}

/// A unit of work running inside one database transaction.
pub(crate) struct SeaOrmUnit {
    db_tx: DatabaseTransaction,
}

impl SeaOrmUnit {
    pub(crate) fn new(db_tx: DatabaseTransaction) -> Self {
        Self { db_tx }
    }

    /// The underlying transaction, for writes outside the ledger seam that
    /// must share the same commit.
    pub(crate) fn db_tx(&self) -> &DatabaseTransaction {
        &self.db_tx
    }
}

#[async_trait]
impl PartyRepository for SeaOrmUnit {
    async fn lock_balance(&mut self, user_id: &str, party_id: Uuid) -> ResultEngine<Option<i64>> {
        // A touching write acquires the lock before the balance is read.
        let touched = parties::Entity::update_many()
            .col_expr(parties::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(parties::Column::Id.eq(party_id.to_string()))
            .filter(parties::Column::UserId.eq(user_id.to_string()))
            .exec(&self.db_tx)
            .await?;
        if touched.rows_affected == 0 {
            return Ok(None);
        }

        let balance = parties::Entity::find_by_id(party_id.to_string())
            .select_only()
            .column(parties::Column::BalanceMinor)
            .into_tuple::<i64>()
            .one(&self.db_tx)
            .await?;
        Ok(balance)
    }

    async fn set_balance(
        &mut self,
        user_id: &str,
        party_id: Uuid,
        balance_minor: i64,
    ) -> ResultEngine<()> {
        parties::Entity::update_many()
            .col_expr(parties::Column::BalanceMinor, Expr::value(balance_minor))
            .col_expr(parties::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(parties::Column::Id.eq(party_id.to_string()))
            .filter(parties::Column::UserId.eq(user_id.to_string()))
            .exec(&self.db_tx)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl TransactionRepository for SeaOrmUnit {
    async fn insert(&mut self, tx: &Transaction) -> ResultEngine<()> {
        let model: transactions::ActiveModel = tx.into();
        transactions::Entity::insert(model)
            .exec_without_returning(&self.db_tx)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl LedgerUnit for SeaOrmUnit {
    async fn commit(self: Box<Self>) -> ResultEngine<()> {
        self.db_tx.commit().await?;
        Ok(())
    }
}

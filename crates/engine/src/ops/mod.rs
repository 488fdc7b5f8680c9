use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    Ledger, ResultEngine, Transaction, commands::RecordTransactionCmd, store::SeaOrmLedgerStore,
};

mod access;
mod balances;
mod parties;
mod reminders;
mod reports;
mod sync;
mod transactions;
mod users;

pub use parties::OPENING_CATEGORY;
pub use reports::{DailyItem, DailyReport, DailyWindow, PartyReportRow, Summary};
pub use sync::{SYNC_READY, SyncSnapshot, SyncStatus};
pub use transactions::TransactionListFilter;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    ledger: Ledger,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Record a credit or debit against a party, updating its balance in the
    /// same unit of work.
    pub async fn record_transaction(&self, cmd: RecordTransactionCmd) -> ResultEngine<Transaction> {
        self.ledger.record(cmd).await
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let store = SeaOrmLedgerStore::new(self.database.clone());
        Ok(Engine {
            database: self.database,
            ledger: Ledger::new(Arc::new(store)),
        })
    }
}

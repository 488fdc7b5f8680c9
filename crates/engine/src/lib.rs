pub use error::{EngineError, ErrorKind};
pub use ledger::Ledger;
pub use money::MoneyCents;
pub use ops::{
    DailyItem, DailyReport, DailyWindow, Engine, EngineBuilder, OPENING_CATEGORY, PartyReportRow,
    SYNC_READY, Summary, SyncSnapshot, SyncStatus, TransactionListFilter,
};
pub use parties::{Party, PartyType};
pub use reminders::{Reminder, ReminderStatus};
pub use store::{
    LedgerStore, LedgerUnit, PartyRepository, SeaOrmLedgerStore, TransactionRepository,
};
pub use sync_logs::SyncLog;
pub use transactions::{Transaction, TransactionKind};
pub use users::{User, UserSettings};

pub mod commands;
mod error;
mod ledger;
mod money;
mod ops;
mod parties;
mod reminders;
mod store;
mod sync_logs;
mod transactions;
mod users;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;

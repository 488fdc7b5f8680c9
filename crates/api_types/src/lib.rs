use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generic acknowledgement for operations without a payload (e.g. deletes).
#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

pub mod error {
    use super::*;

    /// Stable error classification exposed to clients.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ErrorKind {
        BadRequest,
        Unauthorized,
        NotFound,
        Conflict,
        Internal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ErrorResponse {
        pub kind: ErrorKind,
        pub error: String,
    }
}

pub mod party {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PartyType {
        Customer,
        Supplier,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PartyNew {
        pub name: String,
        pub party_type: PartyType,
        pub phone: Option<String>,
        pub email: Option<String>,
        pub address: Option<String>,
        pub notes: Option<String>,
        /// Recorded as an opening credit (> 0) or debit (< 0).
        #[serde(default)]
        pub opening_balance_minor: i64,
    }

    /// Patch: absent fields are kept, empty strings clear nullable fields.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PartyUpdate {
        pub name: Option<String>,
        pub phone: Option<String>,
        pub email: Option<String>,
        pub address: Option<String>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PartyList {
        pub party_type: Option<PartyType>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PartyView {
        pub id: Uuid,
        pub name: String,
        pub party_type: PartyType,
        pub phone: Option<String>,
        pub email: Option<String>,
        pub address: Option<String>,
        pub notes: Option<String>,
        /// Positive: the party owes the user. Negative: the user owes the party.
        pub balance_minor: i64,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceRecomputed {
        pub party_id: Uuid,
        pub balance_minor: i64,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Credit,
        Debit,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub party_id: Uuid,
        /// Must be > 0. The kind defines the direction.
        pub amount_minor: i64,
        pub transaction_type: TransactionKind,
        /// Defaults to today (UTC).
        pub date: Option<NaiveDate>,
        pub description: Option<String>,
        pub category: Option<String>,
        pub attachment_url: Option<String>,
    }

    /// Patch: never recomputes balances.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub amount_minor: Option<i64>,
        pub transaction_type: Option<TransactionKind>,
        pub date: Option<NaiveDate>,
        pub description: Option<String>,
        pub category: Option<String>,
        pub attachment_url: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionList {
        pub party_id: Option<Uuid>,
        pub transaction_type: Option<TransactionKind>,
        /// Inclusive.
        pub start_date: Option<NaiveDate>,
        /// Inclusive.
        pub end_date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub party_id: Uuid,
        pub transaction_type: TransactionKind,
        pub amount_minor: i64,
        pub date: NaiveDate,
        pub description: Option<String>,
        pub category: Option<String>,
        pub attachment_url: Option<String>,
        /// Party balance right after this transaction was recorded.
        pub running_balance_minor: i64,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod reminder {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ReminderStatus {
        Pending,
        Completed,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReminderNew {
        pub party_id: Uuid,
        pub amount_minor: i64,
        pub due_date: NaiveDate,
        pub message: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ReminderUpdate {
        pub status: Option<ReminderStatus>,
        pub message: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReminderList {
        pub status: Option<ReminderStatus>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReminderStatusQuery {
        pub status: Option<ReminderStatus>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReminderView {
        pub id: Uuid,
        pub party_id: Uuid,
        pub amount_minor: i64,
        pub due_date: NaiveDate,
        pub message: Option<String>,
        pub status: ReminderStatus,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod report {
    use super::*;
    use crate::{party::PartyType, transaction::TransactionKind};

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryView {
        pub total_credit_minor: i64,
        pub total_debit_minor: i64,
        pub total_receivable_minor: i64,
        pub total_payable_minor: i64,
        pub net_balance_minor: i64,
        pub pending_reminders: u64,
    }

    /// Raw `days` value; invalid input falls back to the default window.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DailyQuery {
        pub days: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DailyItemView {
        pub date: NaiveDate,
        pub transaction_type: TransactionKind,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DailyView {
        pub days: u32,
        pub data: Vec<DailyItemView>,
        pub total: usize,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PartyReportView {
        pub party_id: Uuid,
        pub party_name: String,
        pub party_type: PartyType,
        pub credit_minor: i64,
        pub debit_minor: i64,
        pub balance_minor: i64,
        pub txn_count: i64,
    }
}

pub mod sync {
    use super::*;
    use crate::{party::PartyView, reminder::ReminderView, transaction::TransactionView};

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SyncRequest {
        pub device_id: String,
        /// Offline edits from the client. Accepted for compatibility; the
        /// server does not apply them.
        #[serde(default)]
        pub changes: Vec<serde_json::Value>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SyncResponse {
        pub parties: Vec<PartyView>,
        pub transactions: Vec<TransactionView>,
        pub reminders: Vec<ReminderView>,
        pub timestamp: DateTime<Utc>,
        pub status: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SyncStatusView {
        pub user_id: String,
        pub sync_status: String,
        pub device_id: Option<String>,
        pub last_sync: Option<DateTime<Utc>>,
        pub status: Option<String>,
        pub timestamp: DateTime<Utc>,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProfileView {
        pub id: String,
        pub email: String,
        pub name: String,
        pub phone: Option<String>,
        pub language: String,
        pub theme: String,
        pub font_size: String,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ProfileUpdate {
        pub name: Option<String>,
        pub phone: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettingsView {
        pub language: String,
        pub theme: String,
        pub font_size: String,
    }
}

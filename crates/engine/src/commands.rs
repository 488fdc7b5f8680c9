//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists.
//!
//! Update commands are patches: every field is `Option`, and `None` means
//! "not provided, keep the stored value". For nullable text fields an empty
//! string clears the stored value.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{PartyType, ReminderStatus, TransactionKind};

/// Record a credit or debit against a party.
#[derive(Clone, Debug)]
pub struct RecordTransactionCmd {
    pub user_id: String,
    pub party_id: Uuid,
    pub amount_minor: i64,
    pub kind: TransactionKind,
    /// Defaults to today's date when `None`.
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub attachment_url: Option<String>,
}

impl RecordTransactionCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        party_id: Uuid,
        amount_minor: i64,
        kind: TransactionKind,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            party_id,
            amount_minor,
            kind,
            date: None,
            description: None,
            category: None,
            attachment_url: None,
        }
    }

    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn attachment_url(mut self, url: impl Into<String>) -> Self {
        self.attachment_url = Some(url.into());
        self
    }
}

/// Patch an existing transaction.
///
/// Never touches the party balance or any running balance.
#[derive(Clone, Debug)]
pub struct UpdateTransactionCmd {
    pub user_id: String,
    pub transaction_id: Uuid,
    pub amount_minor: Option<i64>,
    pub kind: Option<TransactionKind>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub category: Option<String>,
    pub attachment_url: Option<String>,
}

impl UpdateTransactionCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, transaction_id: Uuid) -> Self {
        Self {
            user_id: user_id.into(),
            transaction_id,
            amount_minor: None,
            kind: None,
            description: None,
            date: None,
            category: None,
            attachment_url: None,
        }
    }

    #[must_use]
    pub fn amount_minor(mut self, amount_minor: i64) -> Self {
        self.amount_minor = Some(amount_minor);
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Create a party, optionally with an opening balance.
///
/// A non-zero `opening_balance_minor` is recorded as an `opening` ledger
/// transaction so the balance stays derivable from the transaction log.
#[derive(Clone, Debug)]
pub struct NewPartyCmd {
    pub user_id: String,
    pub name: String,
    pub party_type: PartyType,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub opening_balance_minor: i64,
}

impl NewPartyCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, name: impl Into<String>, party_type: PartyType) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            party_type,
            phone: None,
            email: None,
            address: None,
            notes: None,
            opening_balance_minor: 0,
        }
    }

    #[must_use]
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    #[must_use]
    pub fn opening_balance_minor(mut self, balance_minor: i64) -> Self {
        self.opening_balance_minor = balance_minor;
        self
    }
}

/// Patch a party's profile fields. There is intentionally no balance field.
#[derive(Clone, Debug)]
pub struct UpdatePartyCmd {
    pub user_id: String,
    pub party_id: Uuid,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl UpdatePartyCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, party_id: Uuid) -> Self {
        Self {
            user_id: user_id.into(),
            party_id,
            name: None,
            phone: None,
            email: None,
            address: None,
            notes: None,
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

#[derive(Clone, Debug)]
pub struct NewReminderCmd {
    pub user_id: String,
    pub party_id: Uuid,
    pub amount_minor: i64,
    pub due_date: NaiveDate,
    pub message: Option<String>,
}

impl NewReminderCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        party_id: Uuid,
        amount_minor: i64,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            party_id,
            amount_minor,
            due_date,
            message: None,
        }
    }

    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[derive(Clone, Debug)]
pub struct UpdateReminderCmd {
    pub user_id: String,
    pub reminder_id: Uuid,
    pub status: Option<ReminderStatus>,
    pub message: Option<String>,
}

impl UpdateReminderCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, reminder_id: Uuid) -> Self {
        Self {
            user_id: user_id.into(),
            reminder_id,
            status: None,
            message: None,
        }
    }

    #[must_use]
    pub fn status(mut self, status: ReminderStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[derive(Clone, Debug)]
pub struct NewUserCmd {
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
}

/// Patch the caller's own profile.
#[derive(Clone, Debug)]
pub struct UpdateProfileCmd {
    pub user_id: String,
    pub name: Option<String>,
    pub phone: Option<String>,
}

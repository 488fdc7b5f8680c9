//! The ledger: the only writer of transaction-driven party balances.
//!
//! Recording a transaction is one unit of work: lock the party balance,
//! apply the amount, insert the transaction carrying the new balance as its
//! running balance, then persist the balance. Any error drops the unit,
//! which rolls back every write made so far.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    EngineError, MoneyCents, ResultEngine, Transaction,
    commands::RecordTransactionCmd,
    store::{LedgerStore, LedgerUnit},
    util::{ensure_positive_amount, normalize_optional_text},
};

#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn LedgerStore>,
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger").finish_non_exhaustive()
    }
}

impl Ledger {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Record a credit or debit and update the party balance atomically.
    ///
    /// The party is reported as not found both when it does not exist and
    /// when it belongs to another user.
    pub async fn record(&self, cmd: RecordTransactionCmd) -> ResultEngine<Transaction> {
        ensure_positive_amount(cmd.amount_minor)?;
        let date = cmd.date.unwrap_or_else(|| Utc::now().date_naive());

        let mut unit = self.store.begin().await?;
        let tx = post(unit.as_mut(), &cmd, date).await?;
        unit.commit().await?;

        tracing::debug!(
            transaction_id = %tx.id,
            party_id = %tx.party_id,
            kind = tx.kind.as_str(),
            running_balance = tx.running_balance_minor,
            "transaction recorded"
        );
        Ok(tx)
    }
}

/// Apply `cmd` inside an already open unit of work. Does not commit.
pub(crate) async fn post(
    unit: &mut dyn LedgerUnit,
    cmd: &RecordTransactionCmd,
    date: NaiveDate,
) -> ResultEngine<Transaction> {
    let balance = unit
        .lock_balance(&cmd.user_id, cmd.party_id)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("party not exists".to_string()))?;

    let next = cmd
        .kind
        .apply(MoneyCents::new(balance), MoneyCents::new(cmd.amount_minor))
        .ok_or_else(|| EngineError::InvalidAmount("balance overflow".to_string()))?;

    let now = Utc::now();
    let tx = Transaction {
        id: Uuid::new_v4(),
        user_id: cmd.user_id.clone(),
        party_id: cmd.party_id,
        kind: cmd.kind,
        amount_minor: cmd.amount_minor,
        description: normalize_optional_text(cmd.description.as_deref()),
        date,
        category: normalize_optional_text(cmd.category.as_deref()),
        attachment_url: normalize_optional_text(cmd.attachment_url.as_deref()),
        running_balance_minor: next.cents(),
        created_at: now,
        updated_at: now,
    };

    unit.insert(&tx).await?;
    unit.set_balance(&cmd.user_id, cmd.party_id, next.cents()).await?;
    Ok(tx)
}

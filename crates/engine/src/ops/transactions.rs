use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, ResultEngine, Transaction, TransactionKind,
    commands::UpdateTransactionCmd,
    transactions,
    util::{apply_optional_text_patch, ensure_positive_amount},
};

use super::{Engine, with_tx};

/// Filters for [`Engine::list_transactions`]. Every set field must match.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub party_id: Option<Uuid>,
    pub kind: Option<TransactionKind>,
    /// Inclusive lower bound on `date`.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on `date`.
    pub end_date: Option<NaiveDate>,
}

fn validate_list_filter(filter: &TransactionListFilter) -> ResultEngine<()> {
    if let (Some(start), Some(end)) = (filter.start_date, filter.end_date)
        && start > end
    {
        return Err(EngineError::InvalidInput(
            "invalid range: start_date must be <= end_date".to_string(),
        ));
    }
    Ok(())
}

trait ApplyTxFilters {
    fn apply_tx_filters(self, filter: &TransactionListFilter) -> Self;
}

impl<T> ApplyTxFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_tx_filters(mut self, filter: &TransactionListFilter) -> Self {
        if let Some(party_id) = filter.party_id {
            self = self.filter(transactions::Column::PartyId.eq(party_id.to_string()));
        }
        if let Some(kind) = filter.kind {
            self = self.filter(transactions::Column::Kind.eq(kind.as_str()));
        }
        if let Some(start) = filter.start_date {
            self = self.filter(transactions::Column::Date.gte(start));
        }
        if let Some(end) = filter.end_date {
            self = self.filter(transactions::Column::Date.lte(end));
        }
        self
    }
}

impl Engine {
    /// Return a transaction owned by `user_id`.
    pub async fn transaction(&self, user_id: &str, transaction_id: Uuid) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction(&db_tx, user_id, transaction_id)
                .await?;
            Transaction::try_from(model)
        })
    }

    /// List the user's transactions, newest date first.
    pub async fn list_transactions(
        &self,
        user_id: &str,
        filter: &TransactionListFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        validate_list_filter(filter)?;
        with_tx!(self, |db_tx| {
            let models = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id.to_string()))
                .apply_tx_filters(filter)
                .order_by_desc(transactions::Column::Date)
                .order_by_desc(transactions::Column::CreatedAt)
                .order_by_desc(transactions::Column::Id)
                .all(&db_tx)
                .await?;
            models
                .into_iter()
                .map(Transaction::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Patch a transaction.
    ///
    /// The party balance and every running balance are left as they are;
    /// use [`Engine::recompute_party_balance`] to bring them back in line.
    pub async fn update_transaction(&self, cmd: UpdateTransactionCmd) -> ResultEngine<Transaction> {
        if let Some(amount_minor) = cmd.amount_minor {
            ensure_positive_amount(amount_minor)?;
        }

        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction(&db_tx, &cmd.user_id, cmd.transaction_id)
                .await?;
            let mut tx = Transaction::try_from(model)?;

            if let Some(amount_minor) = cmd.amount_minor {
                tx.amount_minor = amount_minor;
            }
            if let Some(kind) = cmd.kind {
                tx.kind = kind;
            }
            if let Some(date) = cmd.date {
                tx.date = date;
            }
            tx.description = apply_optional_text_patch(tx.description, cmd.description.as_deref());
            tx.category = apply_optional_text_patch(tx.category, cmd.category.as_deref());
            tx.attachment_url =
                apply_optional_text_patch(tx.attachment_url, cmd.attachment_url.as_deref());
            tx.updated_at = Utc::now();

            let active = transactions::ActiveModel {
                id: ActiveValue::Unchanged(tx.id.to_string()),
                kind: ActiveValue::Set(tx.kind.as_str().to_string()),
                amount_minor: ActiveValue::Set(tx.amount_minor),
                description: ActiveValue::Set(tx.description.clone()),
                date: ActiveValue::Set(tx.date),
                category: ActiveValue::Set(tx.category.clone()),
                attachment_url: ActiveValue::Set(tx.attachment_url.clone()),
                updated_at: ActiveValue::Set(tx.updated_at),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(tx)
        })
    }

    /// Delete a transaction without reversing its effect on the balance.
    pub async fn delete_transaction(&self, user_id: &str, transaction_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_transaction(&db_tx, user_id, transaction_id)
                .await?;
            transactions::Entity::delete_by_id(transaction_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}

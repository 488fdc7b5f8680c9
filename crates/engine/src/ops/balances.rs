use chrono::Utc;
use uuid::Uuid;

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{EngineError, MoneyCents, ResultEngine, Transaction, parties, transactions};

use super::{Engine, with_tx};

impl Engine {
    /// Recomputes the party balance from its transactions.
    ///
    /// - Replays transactions in creation order.
    /// - Rewrites every running balance that drifted.
    /// - Persists and returns the new party balance.
    ///
    /// Never called implicitly: edits and deletes leave balances alone until
    /// this runs.
    pub async fn recompute_party_balance(&self, user_id: &str, party_id: Uuid) -> ResultEngine<i64> {
        with_tx!(self, |db_tx| {
            self.require_party(&db_tx, user_id, party_id).await?;

            let models: Vec<transactions::Model> = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id.to_string()))
                .filter(transactions::Column::PartyId.eq(party_id.to_string()))
                .order_by_asc(transactions::Column::CreatedAt)
                .order_by_asc(transactions::Column::Id)
                .all(&db_tx)
                .await?;

            let mut balance = MoneyCents::ZERO;
            let mut rewritten = 0usize;
            for model in models {
                let tx = Transaction::try_from(model)?;
                balance = tx
                    .kind
                    .apply(balance, MoneyCents::new(tx.amount_minor))
                    .ok_or_else(|| EngineError::InvalidAmount("balance overflow".to_string()))?;

                if tx.running_balance_minor != balance.cents() {
                    let active = transactions::ActiveModel {
                        id: ActiveValue::Unchanged(tx.id.to_string()),
                        running_balance_minor: ActiveValue::Set(balance.cents()),
                        ..Default::default()
                    };
                    active.update(&db_tx).await?;
                    rewritten += 1;
                }
            }

            let party = parties::ActiveModel {
                id: ActiveValue::Unchanged(party_id.to_string()),
                balance_minor: ActiveValue::Set(balance.cents()),
                updated_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            party.update(&db_tx).await?;

            tracing::info!(
                %party_id,
                balance = balance.cents(),
                rewritten,
                "party balance recomputed"
            );
            Ok(balance.cents())
        })
    }
}

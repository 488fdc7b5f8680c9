use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Party, Reminder, ResultEngine, SyncLog, Transaction, parties, reminders, sync_logs,
    sync_logs::SYNC_SUCCESS, transactions, util::normalize_required_text,
};

use super::{Engine, with_tx};

/// Status reported by [`Engine::sync_status`]; the server is always ready to
/// hand out a snapshot.
pub const SYNC_READY: &str = "ready";

/// Full state of one user at the moment of a sync.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSnapshot {
    pub parties: Vec<Party>,
    pub transactions: Vec<Transaction>,
    pub reminders: Vec<Reminder>,
    pub timestamp: DateTime<Utc>,
    pub status: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStatus {
    pub user_id: String,
    pub sync_status: String,
    /// Device of the latest sync, if any.
    pub device_id: Option<String>,
    pub last_sync: Option<DateTime<Utc>>,
    /// Outcome of the latest sync, if any.
    pub status: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Engine {
    /// Export the user's parties, transactions and reminders and log the
    /// sync for `device_id`, all in one database transaction.
    pub async fn sync(&self, user_id: &str, device_id: &str) -> ResultEngine<SyncSnapshot> {
        let device_id = normalize_required_text(device_id, "device_id")?;
        with_tx!(self, |db_tx| {
            let parties = parties::Entity::find()
                .filter(parties::Column::UserId.eq(user_id))
                .order_by_asc(parties::Column::CreatedAt)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Party::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;
            let transactions = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id))
                .order_by_asc(transactions::Column::CreatedAt)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Transaction::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;
            let reminders = reminders::Entity::find()
                .filter(reminders::Column::UserId.eq(user_id))
                .order_by_asc(reminders::Column::CreatedAt)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Reminder::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            let now = Utc::now();
            let log = SyncLog::success(user_id, &device_id, now);
            let log_model: sync_logs::ActiveModel = (&log).into();
            sync_logs::Entity::insert(log_model)
                .exec_without_returning(&db_tx)
                .await?;

            tracing::debug!(
                user_id,
                device_id = %device_id,
                parties = parties.len(),
                transactions = transactions.len(),
                reminders = reminders.len(),
                "sync snapshot built"
            );
            Ok(SyncSnapshot {
                parties,
                transactions,
                reminders,
                timestamp: now,
                status: SYNC_SUCCESS.to_string(),
            })
        })
    }

    /// Return the latest sync of the user, if any.
    pub async fn sync_status(&self, user_id: &str) -> ResultEngine<SyncStatus> {
        with_tx!(self, |db_tx| {
            let last = sync_logs::Entity::find()
                .filter(sync_logs::Column::UserId.eq(user_id))
                .order_by_desc(sync_logs::Column::LastSync)
                .order_by_desc(sync_logs::Column::Id)
                .one(&db_tx)
                .await?
                .map(SyncLog::try_from)
                .transpose()?;

            Ok(SyncStatus {
                user_id: user_id.to_string(),
                sync_status: SYNC_READY.to_string(),
                device_id: last.as_ref().map(|log| log.device_id.clone()),
                last_sync: last.as_ref().map(|log| log.last_sync),
                status: last.map(|log| log.status),
                timestamp: Utc::now(),
            })
        })
    }
}

//! Append-only log of device sync calls.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

pub(crate) const SYNC_SUCCESS: &str = "success";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncLog {
    pub id: Uuid,
    pub user_id: String,
    pub device_id: String,
    pub last_sync: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl SyncLog {
    pub(crate) fn success(user_id: &str, device_id: &str, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            device_id: device_id.to_string(),
            last_sync: at,
            status: SYNC_SUCCESS.to_string(),
            created_at: at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sync_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub device_id: String,
    pub last_sync: DateTimeUtc,
    pub status: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&SyncLog> for ActiveModel {
    fn from(log: &SyncLog) -> Self {
        Self {
            id: ActiveValue::Set(log.id.to_string()),
            user_id: ActiveValue::Set(log.user_id.clone()),
            device_id: ActiveValue::Set(log.device_id.clone()),
            last_sync: ActiveValue::Set(log.last_sync),
            status: ActiveValue::Set(log.status.clone()),
            created_at: ActiveValue::Set(log.created_at),
        }
    }
}

impl TryFrom<Model> for SyncLog {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "sync log")?,
            user_id: model.user_id,
            device_id: model.device_id,
            last_sync: model.last_sync,
            status: model.status,
            created_at: model.created_at,
        })
    }
}

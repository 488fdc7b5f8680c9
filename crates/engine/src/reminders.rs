//! Payment reminders.
//!
//! Reminders reference a party but never touch the ledger.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    Pending,
    Completed,
}

impl ReminderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl TryFrom<&str> for ReminderStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(EngineError::InvalidInput(format!(
                "invalid reminder status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: Uuid,
    pub user_id: String,
    pub party_id: Uuid,
    pub amount_minor: i64,
    pub due_date: NaiveDate,
    pub message: Option<String>,
    pub status: ReminderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reminders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub party_id: String,
    pub amount_minor: i64,
    pub due_date: Date,
    pub message: Option<String>,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::parties::Entity",
        from = "Column::PartyId",
        to = "super::parties::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Parties,
}

impl Related<super::parties::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parties.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Reminder> for ActiveModel {
    fn from(reminder: &Reminder) -> Self {
        Self {
            id: ActiveValue::Set(reminder.id.to_string()),
            user_id: ActiveValue::Set(reminder.user_id.clone()),
            party_id: ActiveValue::Set(reminder.party_id.to_string()),
            amount_minor: ActiveValue::Set(reminder.amount_minor),
            due_date: ActiveValue::Set(reminder.due_date),
            message: ActiveValue::Set(reminder.message.clone()),
            status: ActiveValue::Set(reminder.status.as_str().to_string()),
            created_at: ActiveValue::Set(reminder.created_at),
            updated_at: ActiveValue::Set(reminder.updated_at),
        }
    }
}

impl TryFrom<Model> for Reminder {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "reminder")?,
            user_id: model.user_id,
            party_id: parse_uuid(&model.party_id, "party")?,
            amount_minor: model.amount_minor,
            due_date: model.due_date,
            message: model.message,
            status: ReminderStatus::try_from(model.status.as_str())?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

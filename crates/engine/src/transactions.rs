//! Transaction primitives.
//!
//! A `Transaction` is one credit or debit recorded against a party. It keeps
//! the party balance observed right after it was applied
//! (`running_balance_minor`); that snapshot is historical and is not rewritten
//! when other transactions are later edited or deleted.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Increases the party balance.
    Credit,
    /// Decreases the party balance.
    Debit,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }

    /// Applies `amount` with this polarity to `balance`.
    ///
    /// Returns `None` on overflow.
    #[must_use]
    pub fn apply(self, balance: MoneyCents, amount: MoneyCents) -> Option<MoneyCents> {
        match self {
            Self::Credit => balance.checked_add(amount),
            Self::Debit => balance.checked_sub(amount),
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "credit" => Ok(Self::Credit),
            "debit" => Ok(Self::Debit),
            other => Err(EngineError::InvalidInput(format!(
                "invalid transaction type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: String,
    pub party_id: Uuid,
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub category: Option<String>,
    pub attachment_url: Option<String>,
    pub running_balance_minor: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub party_id: String,
    pub kind: String,
    pub amount_minor: i64,
    pub description: Option<String>,
    pub date: Date,
    pub category: Option<String>,
    pub attachment_url: Option<String>,
    pub running_balance_minor: i64,
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

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            user_id: ActiveValue::Set(tx.user_id.clone()),
            party_id: ActiveValue::Set(tx.party_id.to_string()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            description: ActiveValue::Set(tx.description.clone()),
            date: ActiveValue::Set(tx.date),
            category: ActiveValue::Set(tx.category.clone()),
            attachment_url: ActiveValue::Set(tx.attachment_url.clone()),
            running_balance_minor: ActiveValue::Set(tx.running_balance_minor),
            created_at: ActiveValue::Set(tx.created_at),
            updated_at: ActiveValue::Set(tx.updated_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "transaction")?,
            user_id: model.user_id,
            party_id: parse_uuid(&model.party_id, "party")?,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            amount_minor: model.amount_minor,
            description: model.description,
            date: model.date,
            category: model.category,
            attachment_url: model.attachment_url,
            running_balance_minor: model.running_balance_minor,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

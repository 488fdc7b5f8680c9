//! The module contains `Party` struct and its storage model.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyType {
    Customer,
    Supplier,
}

impl PartyType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Supplier => "supplier",
        }
    }
}

impl TryFrom<&str> for PartyType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "customer" => Ok(Self::Customer),
            "supplier" => Ok(Self::Supplier),
            other => Err(EngineError::InvalidInput(format!(
                "invalid party type: {other}"
            ))),
        }
    }
}

/// A counterparty (customer or supplier) tracked by a user.
///
/// `balance_minor` is denormalized from the ledger: it equals the signed sum
/// of the party's transactions and is written only by the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub party_type: PartyType,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub balance_minor: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "parties")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub party_type: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub balance_minor: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
    #[sea_orm(has_many = "super::reminders::Entity")]
    Reminders,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::reminders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reminders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Party> for ActiveModel {
    fn from(party: &Party) -> Self {
        Self {
            id: ActiveValue::Set(party.id.to_string()),
            user_id: ActiveValue::Set(party.user_id.clone()),
            name: ActiveValue::Set(party.name.clone()),
            party_type: ActiveValue::Set(party.party_type.as_str().to_string()),
            phone: ActiveValue::Set(party.phone.clone()),
            email: ActiveValue::Set(party.email.clone()),
            address: ActiveValue::Set(party.address.clone()),
            notes: ActiveValue::Set(party.notes.clone()),
            balance_minor: ActiveValue::Set(party.balance_minor),
            created_at: ActiveValue::Set(party.created_at),
            updated_at: ActiveValue::Set(party.updated_at),
        }
    }
}

impl TryFrom<Model> for Party {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "party")?,
            user_id: model.user_id,
            name: model.name,
            party_type: PartyType::try_from(model.party_type.as_str())?,
            phone: model.phone,
            email: model.email,
            address: model.address,
            notes: model.notes,
            balance_minor: model.balance_minor,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

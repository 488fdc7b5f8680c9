use chrono::Utc;
use uuid::Uuid;

use sea_orm::{ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, Party, PartyType, ResultEngine, TransactionKind,
    commands::{NewPartyCmd, RecordTransactionCmd, UpdatePartyCmd},
    ledger::post,
    parties, reminders,
    store::{LedgerUnit, SeaOrmUnit},
    transactions,
    util::{apply_optional_text_patch, normalize_optional_text, normalize_required_text},
};

use super::{Engine, with_tx};

/// Category stamped on the transaction that carries an opening balance.
pub const OPENING_CATEGORY: &str = "opening";

impl Engine {
    /// Create a party for `cmd.user_id`.
    ///
    /// A non-zero opening balance is posted through the ledger in the same
    /// database transaction:
    /// - `opening_balance_minor > 0`: an opening credit
    /// - `opening_balance_minor < 0`: an opening debit
    pub async fn new_party(&self, cmd: NewPartyCmd) -> ResultEngine<Party> {
        let name = normalize_required_text(&cmd.name, "party name")?;
        let opening = match cmd.opening_balance_minor {
            0 => None,
            balance => {
                let kind = if balance > 0 {
                    TransactionKind::Credit
                } else {
                    TransactionKind::Debit
                };
                let amount_minor = balance.checked_abs().ok_or_else(|| {
                    EngineError::InvalidAmount("opening balance out of range".to_string())
                })?;
                Some((kind, amount_minor))
            }
        };

        let db_tx = self.database.begin().await?;
        self.require_user(&db_tx, &cmd.user_id).await?;

        let now = Utc::now();
        let party = Party {
            id: Uuid::new_v4(),
            user_id: cmd.user_id.clone(),
            name,
            party_type: cmd.party_type,
            phone: normalize_optional_text(cmd.phone.as_deref()),
            email: normalize_optional_text(cmd.email.as_deref()),
            address: normalize_optional_text(cmd.address.as_deref()),
            notes: normalize_optional_text(cmd.notes.as_deref()),
            balance_minor: 0,
            created_at: now,
            updated_at: now,
        };
        let party_model: parties::ActiveModel = (&party).into();
        parties::Entity::insert(party_model)
            .exec_without_returning(&db_tx)
            .await?;

        let mut unit = SeaOrmUnit::new(db_tx);
        if let Some((kind, amount_minor)) = opening {
            let opening_cmd = RecordTransactionCmd::new(&cmd.user_id, party.id, amount_minor, kind)
                .category(OPENING_CATEGORY)
                .description("Opening balance");
            post(&mut unit, &opening_cmd, now.date_naive()).await?;
        }

        let model = self
            .require_party(unit.db_tx(), &cmd.user_id, party.id)
            .await?;
        Box::new(unit).commit().await?;

        tracing::debug!(party_id = %party.id, "party created");
        Party::try_from(model)
    }

    /// Return a party snapshot from DB.
    pub async fn party(&self, user_id: &str, party_id: Uuid) -> ResultEngine<Party> {
        with_tx!(self, |db_tx| {
            let model = self.require_party(&db_tx, user_id, party_id).await?;
            Party::try_from(model)
        })
    }

    /// List the user's parties by name, optionally restricted to one type.
    pub async fn list_parties(
        &self,
        user_id: &str,
        party_type: Option<PartyType>,
    ) -> ResultEngine<Vec<Party>> {
        with_tx!(self, |db_tx| {
            let mut query =
                parties::Entity::find().filter(parties::Column::UserId.eq(user_id.to_string()));
            if let Some(party_type) = party_type {
                query = query.filter(parties::Column::PartyType.eq(party_type.as_str()));
            }
            let models = query
                .order_by_asc(parties::Column::Name)
                .order_by_asc(parties::Column::Id)
                .all(&db_tx)
                .await?;
            models
                .into_iter()
                .map(Party::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Patch profile fields of a party. The balance is never touched here.
    pub async fn update_party(&self, cmd: UpdatePartyCmd) -> ResultEngine<Party> {
        let name = cmd
            .name
            .as_deref()
            .map(|name| normalize_required_text(name, "party name"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let model = self
                .require_party(&db_tx, &cmd.user_id, cmd.party_id)
                .await?;
            let mut party = Party::try_from(model)?;

            if let Some(name) = name {
                party.name = name;
            }
            party.phone = apply_optional_text_patch(party.phone, cmd.phone.as_deref());
            party.email = apply_optional_text_patch(party.email, cmd.email.as_deref());
            party.address = apply_optional_text_patch(party.address, cmd.address.as_deref());
            party.notes = apply_optional_text_patch(party.notes, cmd.notes.as_deref());
            party.updated_at = Utc::now();

            let active = parties::ActiveModel {
                id: ActiveValue::Unchanged(party.id.to_string()),
                name: ActiveValue::Set(party.name.clone()),
                phone: ActiveValue::Set(party.phone.clone()),
                email: ActiveValue::Set(party.email.clone()),
                address: ActiveValue::Set(party.address.clone()),
                notes: ActiveValue::Set(party.notes.clone()),
                updated_at: ActiveValue::Set(party.updated_at),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(party)
        })
    }

    /// Delete a party.
    ///
    /// Rejected with `HasDependents` while transactions or reminders still
    /// reference it.
    pub async fn delete_party(&self, user_id: &str, party_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_party(&db_tx, user_id, party_id).await?;

            let tx_count = transactions::Entity::find()
                .filter(transactions::Column::PartyId.eq(party_id.to_string()))
                .count(&db_tx)
                .await?;
            if tx_count > 0 {
                return Err(EngineError::HasDependents(format!(
                    "party has {tx_count} transactions"
                )));
            }

            let reminder_count = reminders::Entity::find()
                .filter(reminders::Column::PartyId.eq(party_id.to_string()))
                .count(&db_tx)
                .await?;
            if reminder_count > 0 {
                return Err(EngineError::HasDependents(format!(
                    "party has {reminder_count} reminders"
                )));
            }

            parties::Entity::delete_by_id(party_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}

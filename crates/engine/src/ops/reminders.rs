use chrono::Utc;
use uuid::Uuid;

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Reminder, ReminderStatus, ResultEngine,
    commands::{NewReminderCmd, UpdateReminderCmd},
    reminders,
    util::{apply_optional_text_patch, ensure_positive_amount, normalize_optional_text},
};

use super::{Engine, with_tx};

impl Engine {
    /// Create a pending reminder against one of the user's parties.
    pub async fn new_reminder(&self, cmd: NewReminderCmd) -> ResultEngine<Reminder> {
        ensure_positive_amount(cmd.amount_minor)?;
        with_tx!(self, |db_tx| {
            self.require_party(&db_tx, &cmd.user_id, cmd.party_id)
                .await?;

            let now = Utc::now();
            let reminder = Reminder {
                id: Uuid::new_v4(),
                user_id: cmd.user_id.clone(),
                party_id: cmd.party_id,
                amount_minor: cmd.amount_minor,
                due_date: cmd.due_date,
                message: normalize_optional_text(cmd.message.as_deref()),
                status: ReminderStatus::Pending,
                created_at: now,
                updated_at: now,
            };
            let model: reminders::ActiveModel = (&reminder).into();
            reminders::Entity::insert(model)
                .exec_without_returning(&db_tx)
                .await?;
            Ok(reminder)
        })
    }

    pub async fn reminder(&self, user_id: &str, reminder_id: Uuid) -> ResultEngine<Reminder> {
        with_tx!(self, |db_tx| {
            let model = self.require_reminder(&db_tx, user_id, reminder_id).await?;
            Reminder::try_from(model)
        })
    }

    /// List reminders by due date, optionally restricted to one status.
    pub async fn list_reminders(
        &self,
        user_id: &str,
        status: Option<ReminderStatus>,
    ) -> ResultEngine<Vec<Reminder>> {
        with_tx!(self, |db_tx| {
            let mut query = reminders::Entity::find()
                .filter(reminders::Column::UserId.eq(user_id.to_string()));
            if let Some(status) = status {
                query = query.filter(reminders::Column::Status.eq(status.as_str()));
            }
            let models = query
                .order_by_asc(reminders::Column::DueDate)
                .order_by_asc(reminders::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            models
                .into_iter()
                .map(Reminder::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Patch the status and/or message of a reminder.
    pub async fn update_reminder(&self, cmd: UpdateReminderCmd) -> ResultEngine<Reminder> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_reminder(&db_tx, &cmd.user_id, cmd.reminder_id)
                .await?;
            let mut reminder = Reminder::try_from(model)?;

            if let Some(status) = cmd.status {
                reminder.status = status;
            }
            reminder.message = apply_optional_text_patch(reminder.message, cmd.message.as_deref());
            reminder.updated_at = Utc::now();

            let active = reminders::ActiveModel {
                id: ActiveValue::Unchanged(reminder.id.to_string()),
                status: ActiveValue::Set(reminder.status.as_str().to_string()),
                message: ActiveValue::Set(reminder.message.clone()),
                updated_at: ActiveValue::Set(reminder.updated_at),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(reminder)
        })
    }

    pub async fn delete_reminder(&self, user_id: &str, reminder_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_reminder(&db_tx, user_id, reminder_id).await?;
            reminders::Entity::delete_by_id(reminder_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}

use chrono::Utc;
use uuid::Uuid;

use sea_orm::{ActiveValue, SqlErr, TransactionTrait, prelude::*};

use crate::{
    EngineError, ResultEngine, User, UserSettings,
    commands::{NewUserCmd, UpdateProfileCmd},
    users,
    util::{apply_optional_text_patch, normalize_optional_text, normalize_required_text},
};

use super::{Engine, with_tx};

const DEFAULT_LANGUAGE: &str = "en";
const DEFAULT_THEME: &str = "theme-classic";
const DEFAULT_FONT_SIZE: &str = "medium";

impl Engine {
    /// Create a user with default preferences. Emails are unique,
    /// case-insensitively.
    pub async fn new_user(&self, cmd: NewUserCmd) -> ResultEngine<User> {
        let email = normalize_required_text(&cmd.email, "email")?.to_lowercase();
        let name = normalize_required_text(&cmd.name, "name")?;

        with_tx!(self, |db_tx| {
            let now = Utc::now();
            let user = User {
                id: Uuid::new_v4().to_string(),
                email,
                name,
                phone: normalize_optional_text(cmd.phone.as_deref()),
                language: DEFAULT_LANGUAGE.to_string(),
                theme: DEFAULT_THEME.to_string(),
                font_size: DEFAULT_FONT_SIZE.to_string(),
                created_at: now,
                updated_at: now,
            };
            let model: users::ActiveModel = (&user).into();
            // Duplicates are caught by the unique email index.
            if let Err(err) = users::Entity::insert(model)
                .exec_without_returning(&db_tx)
                .await
            {
                return Err(match err.sql_err() {
                    Some(SqlErr::UniqueConstraintViolation(_)) => {
                        EngineError::ExistingKey(user.email)
                    }
                    _ => err.into(),
                });
            }
            Ok(user)
        })
    }

    /// Return the user profile.
    pub async fn user(&self, user_id: &str) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, user_id).await?;
            Ok(User::from(model))
        })
    }

    pub async fn update_profile(&self, cmd: UpdateProfileCmd) -> ResultEngine<User> {
        let name = cmd
            .name
            .as_deref()
            .map(|name| normalize_required_text(name, "name"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let mut user = User::from(self.require_user(&db_tx, &cmd.user_id).await?);
            if let Some(name) = name {
                user.name = name;
            }
            user.phone = apply_optional_text_patch(user.phone, cmd.phone.as_deref());
            user.updated_at = Utc::now();

            let active = users::ActiveModel {
                id: ActiveValue::Unchanged(user.id.clone()),
                name: ActiveValue::Set(user.name.clone()),
                phone: ActiveValue::Set(user.phone.clone()),
                updated_at: ActiveValue::Set(user.updated_at),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(user)
        })
    }

    pub async fn user_settings(&self, user_id: &str) -> ResultEngine<UserSettings> {
        Ok(self.user(user_id).await?.settings())
    }
}

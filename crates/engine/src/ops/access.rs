use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, parties, reminders, transactions, users};

use super::Engine;

/// Generates a `require_*` lookup that loads a row by id and owner.
///
/// Rows owned by another user are reported exactly like missing ones.
macro_rules! impl_owned_target {
    ($require_fn:ident, $entity:path, $model:ty, $user_col:expr, $err_msg:literal) => {
        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            user_id: &str,
            target_id: Uuid,
        ) -> ResultEngine<$model> {
            <$entity>::find_by_id(target_id.to_string())
                .filter($user_col.eq(user_id.to_string()))
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    impl_owned_target!(
        require_party,
        parties::Entity,
        parties::Model,
        parties::Column::UserId,
        "party not exists"
    );

    impl_owned_target!(
        require_transaction,
        transactions::Entity,
        transactions::Model,
        transactions::Column::UserId,
        "transaction not exists"
    );

    impl_owned_target!(
        require_reminder,
        reminders::Entity,
        reminders::Model,
        reminders::Column::UserId,
        "reminder not exists"
    );

    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }
}

//! Device sync endpoints.
//!
//! Sync is snapshot-pull-only: the client receives the full current state and
//! any offline `changes` it sends are not applied.

use api_types::sync::{SyncRequest, SyncResponse, SyncStatusView};
use axum::{Extension, Json, extract::State};

use crate::{
    ServerError,
    extract::ApiJson,
    parties::party_view,
    reminders::reminder_view,
    server::{CurrentUser, ServerState},
    transactions::transaction_view,
};

pub async fn sync(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<SyncRequest>,
) -> Result<Json<SyncResponse>, ServerError> {
    if !payload.changes.is_empty() {
        tracing::warn!(
            user_id = %user.id,
            device_id = %payload.device_id,
            ignored = payload.changes.len(),
            "inbound sync changes are not applied"
        );
    }

    let snapshot = state.engine.sync(&user.id, &payload.device_id).await?;
    Ok(Json(SyncResponse {
        parties: snapshot.parties.into_iter().map(party_view).collect(),
        transactions: snapshot
            .transactions
            .into_iter()
            .map(transaction_view)
            .collect(),
        reminders: snapshot.reminders.into_iter().map(reminder_view).collect(),
        timestamp: snapshot.timestamp,
        status: snapshot.status,
    }))
}

pub async fn status(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
) -> Result<Json<SyncStatusView>, ServerError> {
    let status = state.engine.sync_status(&user.id).await?;
    Ok(Json(SyncStatusView {
        user_id: status.user_id,
        sync_status: status.sync_status,
        device_id: status.device_id,
        last_sync: status.last_sync,
        status: status.status,
        timestamp: status.timestamp,
    }))
}

//! Reminders API endpoints

use api_types::{
    Message,
    reminder::{
        ReminderList, ReminderNew, ReminderStatus as ApiStatus, ReminderStatusQuery,
        ReminderUpdate, ReminderView,
    },
};
use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use engine::commands::{NewReminderCmd, UpdateReminderCmd};
use uuid::Uuid;

use crate::{
    ServerError,
    extract::{ApiJson, ApiPath, ApiQuery},
    server::{CurrentUser, ServerState},
};

fn map_status(status: engine::ReminderStatus) -> ApiStatus {
    match status {
        engine::ReminderStatus::Pending => ApiStatus::Pending,
        engine::ReminderStatus::Completed => ApiStatus::Completed,
    }
}

fn engine_status(status: ApiStatus) -> engine::ReminderStatus {
    match status {
        ApiStatus::Pending => engine::ReminderStatus::Pending,
        ApiStatus::Completed => engine::ReminderStatus::Completed,
    }
}

pub(crate) fn reminder_view(reminder: engine::Reminder) -> ReminderView {
    ReminderView {
        id: reminder.id,
        party_id: reminder.party_id,
        amount_minor: reminder.amount_minor,
        due_date: reminder.due_date,
        message: reminder.message,
        status: map_status(reminder.status),
        created_at: reminder.created_at,
        updated_at: reminder.updated_at,
    }
}

pub async fn create(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<ReminderNew>,
) -> Result<(StatusCode, Json<ReminderView>), ServerError> {
    let cmd = NewReminderCmd {
        user_id: user.id,
        party_id: payload.party_id,
        amount_minor: payload.amount_minor,
        due_date: payload.due_date,
        message: payload.message,
    };
    let reminder = state.engine.new_reminder(cmd).await?;
    Ok((StatusCode::CREATED, Json(reminder_view(reminder))))
}

pub async fn list(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    ApiQuery(query): ApiQuery<ReminderList>,
) -> Result<Json<Vec<ReminderView>>, ServerError> {
    let reminders = state
        .engine
        .list_reminders(&user.id, query.status.map(engine_status))
        .await?;
    Ok(Json(reminders.into_iter().map(reminder_view).collect()))
}

pub async fn get(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ReminderView>, ServerError> {
    let reminder = state.engine.reminder(&user.id, id).await?;
    Ok(Json(reminder_view(reminder)))
}

pub async fn update(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<ReminderUpdate>,
) -> Result<Json<ReminderView>, ServerError> {
    let cmd = UpdateReminderCmd {
        user_id: user.id,
        reminder_id: id,
        status: payload.status.map(engine_status),
        message: payload.message,
    };
    let reminder = state.engine.update_reminder(cmd).await?;
    Ok(Json(reminder_view(reminder)))
}

/// Set the status from the `status` query parameter, which is required.
pub async fn update_status(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<ReminderStatusQuery>,
) -> Result<Json<ReminderView>, ServerError> {
    let Some(status) = query.status else {
        return Err(ServerError::Generic("status parameter required".to_string()));
    };
    let cmd = UpdateReminderCmd::new(user.id, id).status(engine_status(status));
    let reminder = state.engine.update_reminder(cmd).await?;
    Ok(Json(reminder_view(reminder)))
}

pub async fn delete(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Message>, ServerError> {
    state.engine.delete_reminder(&user.id, id).await?;
    Ok(Json(Message {
        message: "reminder deleted".to_string(),
    }))
}

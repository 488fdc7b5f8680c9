//! Profile and settings of the calling user

use api_types::user::{ProfileUpdate, ProfileView, SettingsView};
use axum::{Extension, Json, extract::State};
use engine::commands::UpdateProfileCmd;

use crate::{
    ServerError,
    extract::ApiJson,
    server::{CurrentUser, ServerState},
};

fn profile_view(user: engine::User) -> ProfileView {
    ProfileView {
        id: user.id,
        email: user.email,
        name: user.name,
        phone: user.phone,
        language: user.language,
        theme: user.theme,
        font_size: user.font_size,
        created_at: user.created_at,
    }
}

pub async fn profile(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
) -> Result<Json<ProfileView>, ServerError> {
    let user = state.engine.user(&user.id).await?;
    Ok(Json(profile_view(user)))
}

pub async fn update_profile(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<ProfileUpdate>,
) -> Result<Json<ProfileView>, ServerError> {
    let user = state
        .engine
        .update_profile(UpdateProfileCmd {
            user_id: user.id,
            name: payload.name,
            phone: payload.phone,
        })
        .await?;
    Ok(Json(profile_view(user)))
}

pub async fn settings(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
) -> Result<Json<SettingsView>, ServerError> {
    let settings = state.engine.user_settings(&user.id).await?;
    Ok(Json(SettingsView {
        language: settings.language,
        theme: settings.theme,
        font_size: settings.font_size,
    }))
}

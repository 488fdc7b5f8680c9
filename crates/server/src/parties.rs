//! Parties API endpoints

use api_types::{
    Message,
    party::{
        BalanceRecomputed, PartyList, PartyNew, PartyType as ApiPartyType, PartyUpdate, PartyView,
    },
};
use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use engine::commands::{NewPartyCmd, UpdatePartyCmd};
use uuid::Uuid;

use crate::{
    ServerError,
    extract::{ApiJson, ApiPath, ApiQuery},
    server::{CurrentUser, ServerState},
};

pub(crate) fn map_party_type(party_type: engine::PartyType) -> ApiPartyType {
    match party_type {
        engine::PartyType::Customer => ApiPartyType::Customer,
        engine::PartyType::Supplier => ApiPartyType::Supplier,
    }
}

fn engine_party_type(party_type: ApiPartyType) -> engine::PartyType {
    match party_type {
        ApiPartyType::Customer => engine::PartyType::Customer,
        ApiPartyType::Supplier => engine::PartyType::Supplier,
    }
}

pub(crate) fn party_view(party: engine::Party) -> PartyView {
    PartyView {
        id: party.id,
        name: party.name,
        party_type: map_party_type(party.party_type),
        phone: party.phone,
        email: party.email,
        address: party.address,
        notes: party.notes,
        balance_minor: party.balance_minor,
        created_at: party.created_at,
        updated_at: party.updated_at,
    }
}

pub async fn create(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<PartyNew>,
) -> Result<(StatusCode, Json<PartyView>), ServerError> {
    let cmd = NewPartyCmd {
        user_id: user.id,
        name: payload.name,
        party_type: engine_party_type(payload.party_type),
        phone: payload.phone,
        email: payload.email,
        address: payload.address,
        notes: payload.notes,
        opening_balance_minor: payload.opening_balance_minor,
    };
    let party = state.engine.new_party(cmd).await?;
    Ok((StatusCode::CREATED, Json(party_view(party))))
}

pub async fn list(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    ApiQuery(query): ApiQuery<PartyList>,
) -> Result<Json<Vec<PartyView>>, ServerError> {
    let parties = state
        .engine
        .list_parties(&user.id, query.party_type.map(engine_party_type))
        .await?;
    Ok(Json(parties.into_iter().map(party_view).collect()))
}

pub async fn get(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<PartyView>, ServerError> {
    let party = state.engine.party(&user.id, id).await?;
    Ok(Json(party_view(party)))
}

pub async fn update(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<PartyUpdate>,
) -> Result<Json<PartyView>, ServerError> {
    let cmd = UpdatePartyCmd {
        user_id: user.id,
        party_id: id,
        name: payload.name,
        phone: payload.phone,
        email: payload.email,
        address: payload.address,
        notes: payload.notes,
    };
    let party = state.engine.update_party(cmd).await?;
    Ok(Json(party_view(party)))
}

pub async fn delete(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Message>, ServerError> {
    state.engine.delete_party(&user.id, id).await?;
    Ok(Json(Message {
        message: "party deleted".to_string(),
    }))
}

/// Maintenance: rebuild the balance and running balances from the ledger.
pub async fn recompute(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<BalanceRecomputed>, ServerError> {
    let balance_minor = state.engine.recompute_party_balance(&user.id, id).await?;
    Ok(Json(BalanceRecomputed {
        party_id: id,
        balance_minor,
    }))
}

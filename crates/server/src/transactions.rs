//! Transactions API endpoints

use api_types::{
    Message,
    transaction::{
        TransactionKind as ApiKind, TransactionList, TransactionNew, TransactionUpdate,
        TransactionView,
    },
};
use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use engine::{
    TransactionListFilter,
    commands::{RecordTransactionCmd, UpdateTransactionCmd},
};
use uuid::Uuid;

use crate::{
    ServerError,
    extract::{ApiJson, ApiPath, ApiQuery},
    server::{CurrentUser, ServerState},
};

pub(crate) fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Credit => ApiKind::Credit,
        engine::TransactionKind::Debit => ApiKind::Debit,
    }
}

fn engine_kind(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Credit => engine::TransactionKind::Credit,
        ApiKind::Debit => engine::TransactionKind::Debit,
    }
}

pub(crate) fn transaction_view(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        party_id: tx.party_id,
        transaction_type: map_kind(tx.kind),
        amount_minor: tx.amount_minor,
        date: tx.date,
        description: tx.description,
        category: tx.category,
        attachment_url: tx.attachment_url,
        running_balance_minor: tx.running_balance_minor,
        created_at: tx.created_at,
        updated_at: tx.updated_at,
    }
}

pub async fn create(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let cmd = RecordTransactionCmd {
        user_id: user.id,
        party_id: payload.party_id,
        amount_minor: payload.amount_minor,
        kind: engine_kind(payload.transaction_type),
        date: payload.date,
        description: payload.description,
        category: payload.category,
        attachment_url: payload.attachment_url,
    };
    let tx = state.engine.record_transaction(cmd).await?;
    Ok((StatusCode::CREATED, Json(transaction_view(tx))))
}

pub async fn list(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    ApiQuery(query): ApiQuery<TransactionList>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let filter = TransactionListFilter {
        party_id: query.party_id,
        kind: query.transaction_type.map(engine_kind),
        start_date: query.start_date,
        end_date: query.end_date,
    };
    let txs = state.engine.list_transactions(&user.id, &filter).await?;
    Ok(Json(txs.into_iter().map(transaction_view).collect()))
}

pub async fn get(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state.engine.transaction(&user.id, id).await?;
    Ok(Json(transaction_view(tx)))
}

/// Patch a transaction. Balances are not recomputed.
pub async fn update(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let cmd = UpdateTransactionCmd {
        user_id: user.id,
        transaction_id: id,
        amount_minor: payload.amount_minor,
        kind: payload.transaction_type.map(engine_kind),
        description: payload.description,
        date: payload.date,
        category: payload.category,
        attachment_url: payload.attachment_url,
    };
    let tx = state.engine.update_transaction(cmd).await?;
    Ok(Json(transaction_view(tx)))
}

pub async fn delete(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Message>, ServerError> {
    state.engine.delete_transaction(&user.id, id).await?;
    Ok(Json(Message {
        message: "transaction deleted".to_string(),
    }))
}

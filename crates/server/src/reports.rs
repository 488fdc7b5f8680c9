//! Reports API endpoints

use api_types::report::{DailyItemView, DailyQuery, DailyView, PartyReportView, SummaryView};
use axum::{Extension, Json, extract::State};
use engine::DailyWindow;

use crate::{
    ServerError,
    extract::ApiQuery,
    parties::map_party_type,
    server::{CurrentUser, ServerState},
    transactions::map_kind,
};

pub async fn summary(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
) -> Result<Json<SummaryView>, ServerError> {
    let summary = state.engine.report_summary(&user.id).await?;
    Ok(Json(SummaryView {
        total_credit_minor: summary.total_credit_minor,
        total_debit_minor: summary.total_debit_minor,
        total_receivable_minor: summary.total_receivable_minor,
        total_payable_minor: summary.total_payable_minor,
        net_balance_minor: summary.net_balance_minor,
        pending_reminders: summary.pending_reminders,
    }))
}

pub async fn daily(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
    ApiQuery(query): ApiQuery<DailyQuery>,
) -> Result<Json<DailyView>, ServerError> {
    let window = DailyWindow::parse(query.days.as_deref());
    let report = state.engine.report_daily(&user.id, window).await?;
    let total = report.total();
    let data = report
        .items
        .into_iter()
        .map(|item| DailyItemView {
            date: item.date,
            transaction_type: map_kind(item.kind),
            amount_minor: item.amount_minor,
        })
        .collect();
    Ok(Json(DailyView {
        days: report.days,
        data,
        total,
    }))
}

pub async fn party_wise(
    Extension(user): Extension<CurrentUser>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<PartyReportView>>, ServerError> {
    let rows = state.engine.report_party_wise(&user.id).await?;
    Ok(Json(
        rows.into_iter()
            .map(|row| PartyReportView {
                party_id: row.party_id,
                party_name: row.party_name,
                party_type: map_party_type(row.party_type),
                credit_minor: row.credit_minor,
                debit_minor: row.debit_minor,
                balance_minor: row.balance_minor,
                txn_count: row.transaction_count,
            })
            .collect(),
    ))
}

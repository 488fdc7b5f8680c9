//! Read-only aggregates over the ledger.
//!
//! Every report runs inside a single database transaction so its figures
//! come from one consistent snapshot.

use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::{
    DatabaseTransaction, FromQueryResult, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, TransactionTrait, prelude::*, sea_query::Expr,
};

use crate::{
    EngineError, PartyType, ReminderStatus, ResultEngine, TransactionKind, parties, reminders,
    transactions, util::parse_uuid,
};

use super::{Engine, with_tx};

const DEFAULT_DAILY_DAYS: u32 = 7;

/// Dashboard totals for one user, in minor units.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_credit_minor: i64,
    pub total_debit_minor: i64,
    /// Sum of positive party balances.
    pub total_receivable_minor: i64,
    /// Sum of the magnitudes of negative party balances.
    pub total_payable_minor: i64,
    pub net_balance_minor: i64,
    pub pending_reminders: u64,
}

/// Look-back window of the daily report, in days before today.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DailyWindow {
    days: u32,
}

impl DailyWindow {
    pub fn new(days: u32) -> Self {
        Self { days }
    }

    /// Parse a raw query value. Missing, non-numeric and negative values all
    /// fall back to 7 days.
    pub fn parse(raw: Option<&str>) -> Self {
        let days = raw
            .and_then(|value| value.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_DAILY_DAYS);
        Self { days }
    }

    pub fn days(self) -> u32 {
        self.days
    }

    /// Inclusive `(start, end)` dates ending at `today`.
    pub fn bounds(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = today
            .checked_sub_days(Days::new(u64::from(self.days)))
            .unwrap_or(NaiveDate::MIN);
        (start, today)
    }
}

impl Default for DailyWindow {
    fn default() -> Self {
        Self::new(DEFAULT_DAILY_DAYS)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyItem {
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub amount_minor: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyReport {
    pub days: u32,
    pub items: Vec<DailyItem>,
}

impl DailyReport {
    pub fn total(&self) -> usize {
        self.items.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyReportRow {
    pub party_id: Uuid,
    pub party_name: String,
    pub party_type: PartyType,
    pub credit_minor: i64,
    pub debit_minor: i64,
    pub balance_minor: i64,
    pub transaction_count: i64,
}

#[derive(Debug, FromQueryResult)]
struct PartyReportModel {
    party_id: String,
    party_name: String,
    party_type: String,
    credit_minor: i64,
    debit_minor: i64,
    balance_minor: i64,
    transaction_count: i64,
}

impl TryFrom<PartyReportModel> for PartyReportRow {
    type Error = EngineError;

    fn try_from(model: PartyReportModel) -> Result<Self, Self::Error> {
        Ok(Self {
            party_id: parse_uuid(&model.party_id, "party")?,
            party_name: model.party_name,
            party_type: PartyType::try_from(model.party_type.as_str())?,
            credit_minor: model.credit_minor,
            debit_minor: model.debit_minor,
            balance_minor: model.balance_minor,
            transaction_count: model.transaction_count,
        })
    }
}

/// SQLite aborts an integer `SUM`/`ABS` that leaves the i64 range with an
/// "integer overflow" error.
fn overflow_as_invalid_amount(err: DbErr) -> EngineError {
    if err.to_string().contains("integer overflow") {
        EngineError::InvalidAmount("report total overflow".to_string())
    } else {
        err.into()
    }
}

/// Evaluate a single aggregate expression; an empty match yields 0.
async fn aggregate<E: EntityTrait>(
    db: &DatabaseTransaction,
    query: Select<E>,
    expr: &str,
) -> ResultEngine<i64> {
    let total = query
        .select_only()
        .column_as(Expr::cust(expr), "total")
        .into_tuple::<i64>()
        .one(db)
        .await
        .map_err(overflow_as_invalid_amount)?;
    Ok(total.unwrap_or(0))
}

impl Engine {
    pub async fn report_summary(&self, user_id: &str) -> ResultEngine<Summary> {
        with_tx!(self, |db_tx| {
            let user_txs =
                transactions::Entity::find().filter(transactions::Column::UserId.eq(user_id));
            let total_credit_minor = aggregate(
                &db_tx,
                user_txs
                    .clone()
                    .filter(transactions::Column::Kind.eq(TransactionKind::Credit.as_str())),
                "COALESCE(SUM(amount_minor), 0)",
            )
            .await?;
            let total_debit_minor = aggregate(
                &db_tx,
                user_txs.filter(transactions::Column::Kind.eq(TransactionKind::Debit.as_str())),
                "COALESCE(SUM(amount_minor), 0)",
            )
            .await?;

            let user_parties = parties::Entity::find().filter(parties::Column::UserId.eq(user_id));
            let total_receivable_minor = aggregate(
                &db_tx,
                user_parties
                    .clone()
                    .filter(parties::Column::BalanceMinor.gt(0)),
                "COALESCE(SUM(balance_minor), 0)",
            )
            .await?;
            let total_payable_minor = aggregate(
                &db_tx,
                user_parties.filter(parties::Column::BalanceMinor.lt(0)),
                "COALESCE(SUM(ABS(balance_minor)), 0)",
            )
            .await?;

            let pending_reminders = reminders::Entity::find()
                .filter(reminders::Column::UserId.eq(user_id))
                .filter(reminders::Column::Status.eq(ReminderStatus::Pending.as_str()))
                .count(&db_tx)
                .await?;

            let net_balance_minor = total_receivable_minor
                .checked_sub(total_payable_minor)
                .ok_or_else(|| {
                    EngineError::InvalidAmount("report total overflow".to_string())
                })?;

            Ok(Summary {
                total_credit_minor,
                total_debit_minor,
                total_receivable_minor,
                total_payable_minor,
                net_balance_minor,
                pending_reminders,
            })
        })
    }

    /// Amounts per `(date, kind)` pair inside the window ending today (UTC).
    pub async fn report_daily(&self, user_id: &str, window: DailyWindow) -> ResultEngine<DailyReport> {
        let (start, end) = window.bounds(Utc::now().date_naive());
        with_tx!(self, |db_tx| {
            let rows: Vec<(NaiveDate, String, i64)> = transactions::Entity::find()
                .select_only()
                .column(transactions::Column::Date)
                .column(transactions::Column::Kind)
                .column_as(Expr::cust("COALESCE(SUM(amount_minor), 0)"), "amount_minor")
                .filter(transactions::Column::UserId.eq(user_id))
                .filter(transactions::Column::Date.gte(start))
                .filter(transactions::Column::Date.lte(end))
                .group_by(transactions::Column::Date)
                .group_by(transactions::Column::Kind)
                .order_by_asc(transactions::Column::Date)
                .order_by_asc(transactions::Column::Kind)
                .into_tuple()
                .all(&db_tx)
                .await
                .map_err(overflow_as_invalid_amount)?;

            let items = rows
                .into_iter()
                .map(|(date, kind, amount_minor)| {
                    Ok(DailyItem {
                        date,
                        kind: TransactionKind::try_from(kind.as_str())?,
                        amount_minor,
                    })
                })
                .collect::<ResultEngine<Vec<_>>>()?;

            Ok(DailyReport {
                days: window.days(),
                items,
            })
        })
    }

    /// Per-party credit/debit totals. Parties without transactions are
    /// included with zero totals.
    pub async fn report_party_wise(&self, user_id: &str) -> ResultEngine<Vec<PartyReportRow>> {
        with_tx!(self, |db_tx| {
            let models = parties::Entity::find()
                .select_only()
                .column_as(parties::Column::Id, "party_id")
                .column_as(parties::Column::Name, "party_name")
                .column_as(parties::Column::PartyType, "party_type")
                .column_as(parties::Column::BalanceMinor, "balance_minor")
                .column_as(
                    Expr::cust(
                        "COALESCE(SUM(CASE WHEN transactions.kind = 'credit' \
                         THEN transactions.amount_minor ELSE 0 END), 0)",
                    ),
                    "credit_minor",
                )
                .column_as(
                    Expr::cust(
                        "COALESCE(SUM(CASE WHEN transactions.kind = 'debit' \
                         THEN transactions.amount_minor ELSE 0 END), 0)",
                    ),
                    "debit_minor",
                )
                .column_as(Expr::cust("COUNT(transactions.id)"), "transaction_count")
                .join(JoinType::LeftJoin, parties::Relation::Transactions.def())
                .filter(parties::Column::UserId.eq(user_id))
                .group_by(parties::Column::Id)
                .group_by(parties::Column::Name)
                .group_by(parties::Column::PartyType)
                .group_by(parties::Column::BalanceMinor)
                .order_by_asc(parties::Column::Name)
                .into_model::<PartyReportModel>()
                .all(&db_tx)
                .await
                .map_err(overflow_as_invalid_amount)?;

            models
                .into_iter()
                .map(PartyReportRow::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_window_falls_back_to_seven_days() {
        assert_eq!(DailyWindow::parse(None).days(), 7);
        assert_eq!(DailyWindow::parse(Some("abc")).days(), 7);
        assert_eq!(DailyWindow::parse(Some("-3")).days(), 7);
        assert_eq!(DailyWindow::parse(Some("30")).days(), 30);
        assert_eq!(DailyWindow::parse(Some("0")).days(), 0);
    }

    #[test]
    fn daily_window_bounds_are_inclusive_of_today() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let (start, end) = DailyWindow::new(7).bounds(today);
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());
        assert_eq!(end, today);
    }
}

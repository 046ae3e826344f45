//! Balance aggregator: account balances and financial statements.
//!
//! Balances are summed from base amounts of booked lines: posted entries and
//! voided ones. A voided entry stays in the sums next to its posted reversal,
//! so the pair nets to zero from the void date on while the original still
//! counts before it. Drafts never count.
//!
//! Each read is a single statement outside any explicit transaction, so a
//! balance sheet and an income statement built in two calls do not share a
//! snapshot.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QuerySelect, RelationTrait,
};
use tracing::debug;
use uuid::Uuid;

use tally_core::ledger::{AccountBalance, LedgerError};
use tally_core::reports::{
    BalanceSheetReport, IncomeStatementReport, ReportService, TrialBalanceReport,
};
use tally_shared::TenantContext;
use tally_shared::types::AccountId;

use super::account::find_account;
use crate::entities::sea_orm_active_enums::{AccountType, EntryStatus};
use crate::entities::{accounts, journal_entries, journal_lines};
use crate::error::StoreResultExt;

/// Entry statuses whose lines contribute to balances.
const BOOKED_STATUSES: [EntryStatus; 2] = [EntryStatus::Posted, EntryStatus::Voided];

/// Per-account sums of booked base amounts.
#[derive(Debug, FromQueryResult)]
struct BalanceRow {
    account_id: Uuid,
    code: String,
    name: String,
    account_type: AccountType,
    debit_total: Option<Decimal>,
    credit_total: Option<Decimal>,
}

impl From<BalanceRow> for AccountBalance {
    fn from(row: BalanceRow) -> Self {
        Self::from_totals(
            row.account_id.into(),
            row.code,
            row.name,
            row.account_type.into(),
            row.debit_total.unwrap_or_default(),
            row.credit_total.unwrap_or_default(),
        )
    }
}

/// Date window applied to booked entries.
#[derive(Debug, Clone, Copy)]
struct Window {
    start: Option<NaiveDate>,
    end: NaiveDate,
}

/// Report repository for balance aggregation queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Net balance of one account over booked entries dated on or before
    /// `as_of`, signed by the account's normal side.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not belong to the tenant.
    pub async fn account_balance(
        &self,
        tenant: &TenantContext,
        account_id: AccountId,
        as_of: NaiveDate,
    ) -> Result<Decimal, LedgerError> {
        let account = find_account(&self.db, tenant.id, account_id).await?;

        let (debits, credits): (Option<Decimal>, Option<Decimal>) = journal_lines::Entity::find()
            .select_only()
            .column_as(
                Expr::col((journal_lines::Entity, journal_lines::Column::BaseDebit)).sum(),
                "debit_total",
            )
            .column_as(
                Expr::col((journal_lines::Entity, journal_lines::Column::BaseCredit)).sum(),
                "credit_total",
            )
            .join(JoinType::InnerJoin, journal_lines::Relation::JournalEntry.def())
            .filter(journal_lines::Column::AccountId.eq(account_id.into_inner()))
            .filter(journal_entries::Column::TenantId.eq(tenant.id.into_inner()))
            .filter(journal_entries::Column::Status.is_in(BOOKED_STATUSES))
            .filter(journal_entries::Column::EntryDate.lte(as_of))
            .into_tuple()
            .one(&self.db)
            .await
            .context("sum account balance")?
            .unwrap_or_default();

        let balance = account
            .account_type
            .normal_balance()
            .net(debits.unwrap_or_default(), credits.unwrap_or_default());

        debug!(
            tenant_id = %tenant.id,
            account_id = %account_id,
            %as_of,
            %balance,
            "Account balance computed"
        );

        Ok(balance)
    }

    /// Trial balance as of a date: every account with booked activity,
    /// ordered by code.
    pub async fn trial_balance(
        &self,
        tenant: &TenantContext,
        as_of: NaiveDate,
    ) -> Result<TrialBalanceReport, LedgerError> {
        let rows = self
            .balances(tenant, Window { start: None, end: as_of }, false)
            .await?;
        let report = ReportService::trial_balance(as_of, rows);

        debug!(
            tenant_id = %tenant.id,
            %as_of,
            accounts = report.accounts.len(),
            is_balanced = report.is_balanced,
            "Trial balance computed"
        );

        Ok(report)
    }

    /// Revenue and expense activity within `[start, end]`, revenue first,
    /// then by code.
    pub async fn period_balances(
        &self,
        tenant: &TenantContext,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AccountBalance>, LedgerError> {
        ReportService::validate_period(start, end)?;
        let rows = self
            .balances(
                tenant,
                Window {
                    start: Some(start),
                    end,
                },
                true,
            )
            .await?;
        Ok(ReportService::order_period_balances(rows))
    }

    /// Balance sheet as of a date.
    pub async fn balance_sheet(
        &self,
        tenant: &TenantContext,
        as_of: NaiveDate,
    ) -> Result<BalanceSheetReport, LedgerError> {
        let rows = self
            .balances(tenant, Window { start: None, end: as_of }, false)
            .await?;
        let report = ReportService::balance_sheet(as_of, rows);

        debug!(
            tenant_id = %tenant.id,
            %as_of,
            total_assets = %report.total_assets,
            is_balanced = report.is_balanced,
            "Balance sheet computed"
        );

        Ok(report)
    }

    /// Income statement for `[start, end]`.
    pub async fn income_statement(
        &self,
        tenant: &TenantContext,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<IncomeStatementReport, LedgerError> {
        let rows = self.period_balances(tenant, start, end).await?;
        let report = ReportService::income_statement(start, end, rows);

        debug!(
            tenant_id = %tenant.id,
            %start,
            %end,
            net_income = %report.net_income,
            "Income statement computed"
        );

        Ok(report)
    }

    /// Sums booked base amounts per account over `window`.
    async fn balances(
        &self,
        tenant: &TenantContext,
        window: Window,
        income_statement_only: bool,
    ) -> Result<Vec<AccountBalance>, LedgerError> {
        let mut query = journal_lines::Entity::find()
            .select_only()
            .column_as(accounts::Column::Id, "account_id")
            .column_as(accounts::Column::Code, "code")
            .column_as(accounts::Column::Name, "name")
            .column_as(accounts::Column::AccountType, "account_type")
            .column_as(
                Expr::col((journal_lines::Entity, journal_lines::Column::BaseDebit)).sum(),
                "debit_total",
            )
            .column_as(
                Expr::col((journal_lines::Entity, journal_lines::Column::BaseCredit)).sum(),
                "credit_total",
            )
            .join(JoinType::InnerJoin, journal_lines::Relation::JournalEntry.def())
            .join(JoinType::InnerJoin, journal_lines::Relation::Account.def())
            .filter(journal_entries::Column::TenantId.eq(tenant.id.into_inner()))
            .filter(accounts::Column::TenantId.eq(tenant.id.into_inner()))
            .filter(journal_entries::Column::Status.is_in(BOOKED_STATUSES))
            .filter(journal_entries::Column::EntryDate.lte(window.end));

        if let Some(start) = window.start {
            query = query.filter(journal_entries::Column::EntryDate.gte(start));
        }
        if income_statement_only {
            query = query.filter(
                accounts::Column::AccountType.is_in([AccountType::Revenue, AccountType::Expense]),
            );
        }

        let rows = query
            .group_by(accounts::Column::Id)
            .group_by(accounts::Column::Code)
            .group_by(accounts::Column::Name)
            .group_by(accounts::Column::AccountType)
            .into_model::<BalanceRow>()
            .all(&self.db)
            .await
            .context("aggregate account balances")?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

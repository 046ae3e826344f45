//! Report derivation.
//!
//! Statements are built from balance rows already aggregated by the store.
//! Nothing here reads or writes persisted data.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::{BalanceSheetReport, IncomeStatementReport, ReportSection, TrialBalanceReport};
use crate::ledger::{AccountBalance, AccountType, LedgerError};

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Checks that a reporting period is not inverted.
    pub fn validate_period(start: NaiveDate, end: NaiveDate) -> Result<(), LedgerError> {
        if start > end {
            return Err(LedgerError::InvalidDateRange { start, end });
        }
        Ok(())
    }

    /// Orders trial balance rows: zero-activity accounts dropped, then by code.
    #[must_use]
    pub fn order_trial_balance(mut rows: Vec<AccountBalance>) -> Vec<AccountBalance> {
        rows.retain(|row| !row.has_no_activity());
        rows.sort_by(|a, b| a.code.cmp(&b.code));
        rows
    }

    /// Orders period rows: revenue and expense only, revenue first, then by
    /// code.
    #[must_use]
    pub fn order_period_balances(mut rows: Vec<AccountBalance>) -> Vec<AccountBalance> {
        rows.retain(|row| row.account_type.is_income_statement() && !row.has_no_activity());
        rows.sort_by(|a, b| {
            a.account_type
                .cmp(&b.account_type)
                .then_with(|| a.code.cmp(&b.code))
        });
        rows
    }

    /// Builds the trial balance report.
    #[must_use]
    pub fn trial_balance(as_of: NaiveDate, rows: Vec<AccountBalance>) -> TrialBalanceReport {
        let accounts = Self::order_trial_balance(rows);
        let total_debits: Decimal = accounts.iter().map(|a| a.debit_balance).sum();
        let total_credits: Decimal = accounts.iter().map(|a| a.credit_balance).sum();

        TrialBalanceReport {
            as_of,
            accounts,
            total_debits,
            total_credits,
            is_balanced: total_debits == total_credits,
        }
    }

    /// Builds the balance sheet from cumulative (trial balance) rows.
    ///
    /// Revenue and expense rows are folded into retained earnings.
    #[must_use]
    pub fn balance_sheet(as_of: NaiveDate, rows: Vec<AccountBalance>) -> BalanceSheetReport {
        let mut assets = ReportSection::default();
        let mut liabilities = ReportSection::default();
        let mut equity = ReportSection::default();
        let mut retained_earnings = Decimal::ZERO;

        for row in Self::order_trial_balance(rows) {
            match row.account_type {
                AccountType::Asset => assets.push(row),
                AccountType::Liability => liabilities.push(row),
                AccountType::Equity => equity.push(row),
                AccountType::Revenue => retained_earnings += row.net_balance,
                AccountType::Expense => retained_earnings -= row.net_balance,
            }
        }

        let total_assets = assets.total;
        let total_liabilities = liabilities.total;
        let total_equity = equity.total + retained_earnings;

        BalanceSheetReport {
            as_of,
            assets,
            liabilities,
            equity,
            retained_earnings,
            total_assets,
            total_liabilities,
            total_equity,
            is_balanced: total_assets == total_liabilities + total_equity,
        }
    }

    /// Builds the income statement from period rows.
    #[must_use]
    pub fn income_statement(
        start: NaiveDate,
        end: NaiveDate,
        rows: Vec<AccountBalance>,
    ) -> IncomeStatementReport {
        let mut revenue = ReportSection::default();
        let mut expenses = ReportSection::default();

        for row in Self::order_period_balances(rows) {
            match row.account_type {
                AccountType::Revenue => revenue.push(row),
                AccountType::Expense => expenses.push(row),
                _ => {}
            }
        }

        let total_revenue = revenue.total;
        let total_expenses = expenses.total;

        IncomeStatementReport {
            start,
            end,
            revenue,
            expenses,
            total_revenue,
            total_expenses,
            net_income: total_revenue - total_expenses,
        }
    }
}

//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::AccountBalance;

/// Trial balance as of a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// As of date (inclusive).
    pub as_of: NaiveDate,
    /// Accounts with posted activity, ordered by code.
    pub accounts: Vec<AccountBalance>,
    /// Sum of account debit totals.
    pub total_debits: Decimal,
    /// Sum of account credit totals.
    pub total_credits: Decimal,
    /// Whether debits equal credits.
    pub is_balanced: bool,
}

/// A group of accounts with its total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    /// Sum of the accounts' net balances.
    pub total: Decimal,
    /// Accounts in this section.
    pub accounts: Vec<AccountBalance>,
}

impl ReportSection {
    pub(crate) fn push(&mut self, account: AccountBalance) {
        self.total += account.net_balance;
        self.accounts.push(account);
    }
}

/// Balance sheet as of a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// As of date (inclusive).
    pub as_of: NaiveDate,
    /// Asset accounts.
    pub assets: ReportSection,
    /// Liability accounts.
    pub liabilities: ReportSection,
    /// Equity accounts, excluding retained earnings.
    pub equity: ReportSection,
    /// Cumulative revenue minus expenses.
    pub retained_earnings: Decimal,
    /// Total assets.
    pub total_assets: Decimal,
    /// Total liabilities.
    pub total_liabilities: Decimal,
    /// Equity accounts plus retained earnings.
    pub total_equity: Decimal,
    /// Whether assets equal liabilities plus equity.
    pub is_balanced: bool,
}

/// Income statement for a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeStatementReport {
    /// Period start (inclusive).
    pub start: NaiveDate,
    /// Period end (inclusive).
    pub end: NaiveDate,
    /// Revenue accounts.
    pub revenue: ReportSection,
    /// Expense accounts.
    pub expenses: ReportSection,
    /// Total revenue.
    pub total_revenue: Decimal,
    /// Total expenses.
    pub total_expenses: Decimal,
    /// Revenue minus expenses.
    pub net_income: Decimal,
}

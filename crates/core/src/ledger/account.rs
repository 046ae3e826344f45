//! Chart of accounts.
//!
//! Account type is a closed enumeration; the normal-balance polarity of an
//! account is a pure function of its type.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, TenantId};

use super::error::LedgerError;

/// The five fundamental account types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// Resources owned.
    Asset,
    /// Obligations owed.
    Liability,
    /// Owners' residual interest.
    Equity,
    /// Income earned.
    Revenue,
    /// Costs incurred.
    Expense,
}

impl AccountType {
    /// All account types in statement order.
    pub const ALL: [Self; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Revenue,
        Self::Expense,
    ];

    /// Returns the side on which balances of this type increase.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }

    /// Returns true for revenue and expense accounts.
    #[must_use]
    pub const fn is_income_statement(self) -> bool {
        matches!(self, Self::Revenue | Self::Expense)
    }

    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "ASSET",
            Self::Liability => "LIABILITY",
            Self::Equity => "EQUITY",
            Self::Revenue => "REVENUE",
            Self::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASSET" => Ok(Self::Asset),
            "LIABILITY" => Ok(Self::Liability),
            "EQUITY" => Ok(Self::Equity),
            "REVENUE" => Ok(Self::Revenue),
            "EXPENSE" => Ok(Self::Expense),
            other => Err(format!("unknown account type: {other}")),
        }
    }
}

/// Side of the ledger on which an account's balance grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalBalance {
    /// Asset and expense accounts.
    Debit,
    /// Liability, equity and revenue accounts.
    Credit,
}

impl NormalBalance {
    /// Signs a debit/credit pair according to this polarity.
    #[must_use]
    pub fn net(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// A node of a tenant's chart of accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account identifier.
    pub id: AccountId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Code, unique per tenant.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Optional parent in the account tree.
    pub parent_id: Option<AccountId>,
    /// Inactive accounts are hidden from active listings.
    pub is_active: bool,
    /// Seeded accounts, protected from removal by convention.
    pub is_system: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Returns this account's normal-balance polarity.
    #[must_use]
    pub const fn normal_balance(&self) -> NormalBalance {
        self.account_type.normal_balance()
    }
}

/// Input for creating an account.
///
/// `id` and `created_at` are assigned at creation when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    /// Pre-assigned identifier.
    pub id: Option<AccountId>,
    /// Code, unique per tenant.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Optional parent account.
    pub parent_id: Option<AccountId>,
    /// Whether the account starts active.
    pub is_active: bool,
    /// Whether the account is a seeded system account.
    pub is_system: bool,
    /// Pre-assigned creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
}

impl NewAccount {
    /// Creates an active, non-system account input.
    pub fn new(code: impl Into<String>, name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            id: None,
            code: code.into(),
            name: name.into(),
            account_type,
            parent_id: None,
            is_active: true,
            is_system: false,
            created_at: None,
        }
    }

    /// Sets the parent account.
    #[must_use]
    pub const fn with_parent(mut self, parent_id: AccountId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Marks the account as a system account.
    #[must_use]
    pub const fn system(mut self) -> Self {
        self.is_system = true;
        self
    }

    /// Checks required fields.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.code.trim().is_empty() {
            return Err(LedgerError::MissingField("code"));
        }
        if self.name.trim().is_empty() {
            return Err(LedgerError::MissingField("name"));
        }
        Ok(())
    }
}

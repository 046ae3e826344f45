//! Account balance projection.
//!
//! Balances are always derived from posted lines and never stored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::AccountId;

use super::account::AccountType;

/// Debit/credit totals and signed net balance of one account over a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type, which fixes the sign of `net_balance`.
    pub account_type: AccountType,
    /// Sum of base debits.
    pub debit_balance: Decimal,
    /// Sum of base credits.
    pub credit_balance: Decimal,
    /// Balance signed by the account's normal side.
    pub net_balance: Decimal,
}

impl AccountBalance {
    /// Builds a balance from raw totals.
    #[must_use]
    pub fn from_totals(
        account_id: AccountId,
        code: String,
        name: String,
        account_type: AccountType,
        debit_balance: Decimal,
        credit_balance: Decimal,
    ) -> Self {
        Self {
            account_id,
            code,
            name,
            account_type,
            debit_balance,
            credit_balance,
            net_balance: account_type.normal_balance().net(debit_balance, credit_balance),
        }
    }

    /// Returns true if no posted activity contributed to this balance.
    #[must_use]
    pub fn has_no_activity(&self) -> bool {
        self.debit_balance.is_zero() && self.credit_balance.is_zero()
    }
}

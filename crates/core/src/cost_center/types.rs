//! Cost center data types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{CostAllocationId, CostCenterId, JournalLineId, TenantId};

use crate::ledger::LedgerError;

/// Period a cost center budget applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetPeriod {
    /// Calendar month.
    Monthly,
    /// Calendar quarter.
    Quarterly,
    /// Calendar year.
    Annual,
}

impl BudgetPeriod {
    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "MONTHLY",
            Self::Quarterly => "QUARTERLY",
            Self::Annual => "ANNUAL",
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MONTHLY" => Ok(Self::Monthly),
            "QUARTERLY" => Ok(Self::Quarterly),
            "ANNUAL" => Ok(Self::Annual),
            other => Err(format!("unknown budget period: {other}")),
        }
    }
}

/// A tenant's cost center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostCenter {
    /// Cost center identifier.
    pub id: CostCenterId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Code, unique per tenant.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional parent center.
    pub parent_id: Option<CostCenterId>,
    /// Budget for one `budget_period`; `None` means untracked.
    pub budget_amount: Option<Decimal>,
    /// Budget period.
    pub budget_period: BudgetPeriod,
    /// Only active centers appear in reports.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a cost center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCostCenter {
    /// Code, unique per tenant.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional parent center.
    pub parent_id: Option<CostCenterId>,
    /// Optional budget.
    pub budget_amount: Option<Decimal>,
    /// Budget period.
    pub budget_period: BudgetPeriod,
    /// Whether the center starts active.
    pub is_active: bool,
}

impl NewCostCenter {
    /// Creates an active, unbudgeted monthly center input.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            parent_id: None,
            budget_amount: None,
            budget_period: BudgetPeriod::Monthly,
            is_active: true,
        }
    }

    /// Sets the budget.
    #[must_use]
    pub const fn with_budget(mut self, amount: Decimal, period: BudgetPeriod) -> Self {
        self.budget_amount = Some(amount);
        self.budget_period = period;
        self
    }

    /// Sets the parent center.
    #[must_use]
    pub const fn with_parent(mut self, parent_id: CostCenterId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Checks required fields and the budget sign.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.code.trim().is_empty() {
            return Err(LedgerError::MissingField("code"));
        }
        if self.name.trim().is_empty() {
            return Err(LedgerError::MissingField("name"));
        }
        validate_budget(self.budget_amount)
    }
}

/// Partial update of a cost center. `None` leaves a field unchanged; the
/// nested options clear the parent or budget when set to `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostCenterUpdate {
    /// New name.
    pub name: Option<String>,
    /// New parent, or `Some(None)` to detach.
    pub parent_id: Option<Option<CostCenterId>>,
    /// New budget, or `Some(None)` to clear.
    pub budget_amount: Option<Option<Decimal>>,
    /// New budget period.
    pub budget_period: Option<BudgetPeriod>,
    /// New active flag.
    pub is_active: Option<bool>,
}

impl CostCenterUpdate {
    /// Checks the fields being changed.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(LedgerError::MissingField("name"));
        }
        validate_budget(self.budget_amount.flatten())
    }
}

fn validate_budget(budget: Option<Decimal>) -> Result<(), LedgerError> {
    if budget.is_some_and(|b| b < Decimal::ZERO) {
        return Err(LedgerError::NegativeBudget);
    }
    Ok(())
}

/// A posted line amount attributed to a cost center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostAllocation {
    /// Allocation identifier.
    pub id: CostAllocationId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Receiving cost center.
    pub cost_center_id: CostCenterId,
    /// Source journal line.
    pub journal_line_id: JournalLineId,
    /// Allocated amount in base currency.
    pub amount: Decimal,
    /// Date the allocation counts toward.
    pub allocation_date: NaiveDate,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input for allocating a posted line to a cost center.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAllocation {
    /// Receiving cost center.
    pub cost_center_id: CostCenterId,
    /// Source journal line; its entry must be posted.
    pub journal_line_id: JournalLineId,
    /// Amount to allocate; the line's base amount when absent.
    pub amount: Option<Decimal>,
    /// Date the allocation counts toward.
    pub allocation_date: NaiveDate,
}

/// Budget usage of one cost center over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostCenterUsage {
    /// Cost center identifier.
    pub cost_center_id: CostCenterId,
    /// Code.
    pub code: String,
    /// Name.
    pub name: String,
    /// Budget, if any.
    pub budget_amount: Option<Decimal>,
    /// Budget period.
    pub budget_period: BudgetPeriod,
    /// Allocated amounts within the period.
    pub expenses: Decimal,
    /// `expenses / budget * 100` to 2 places; 0 without a budget.
    pub budget_used_percentage: Decimal,
    /// Whether expenses exceed a set budget.
    pub is_over_budget: bool,
}

/// Budget usage across all active cost centers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostCenterReport {
    /// Period start (inclusive).
    pub start: NaiveDate,
    /// Period end (inclusive).
    pub end: NaiveDate,
    /// Per-center usage, ordered by code.
    pub centers: Vec<CostCenterUsage>,
    /// Sum of set budgets.
    pub total_budget: Decimal,
    /// Sum of allocated amounts.
    pub total_expenses: Decimal,
    /// Usage of the combined budget.
    pub total_used_percentage: Decimal,
    /// Number of centers over budget.
    pub over_budget_count: usize,
}

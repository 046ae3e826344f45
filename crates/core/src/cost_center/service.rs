//! Cost center budget math.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::{CostCenter, CostCenterReport, CostCenterUsage};

/// Stateless service for cost center reporting.
pub struct CostCenterService;

impl CostCenterService {
    /// Percentage of `budget` consumed by `expenses`, to 2 places.
    ///
    /// Returns 0 when there is no positive budget. A ratio too large for a
    /// `Decimal` saturates at `Decimal::MAX`.
    #[must_use]
    pub fn used_percentage(budget: Option<Decimal>, expenses: Decimal) -> Decimal {
        match budget {
            Some(budget) if budget > Decimal::ZERO => expenses
                .checked_div(budget)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .map_or(Decimal::MAX, |percentage| percentage.round_dp(2)),
            _ => Decimal::ZERO,
        }
    }

    /// Usage of one center given its allocated expenses.
    #[must_use]
    pub fn usage(center: &CostCenter, expenses: Decimal) -> CostCenterUsage {
        let is_over_budget = center
            .budget_amount
            .is_some_and(|budget| budget > Decimal::ZERO && expenses > budget);

        CostCenterUsage {
            cost_center_id: center.id,
            code: center.code.clone(),
            name: center.name.clone(),
            budget_amount: center.budget_amount,
            budget_period: center.budget_period,
            expenses,
            budget_used_percentage: Self::used_percentage(center.budget_amount, expenses),
            is_over_budget,
        }
    }

    /// Builds the report from active centers paired with their expenses.
    #[must_use]
    pub fn report(
        start: NaiveDate,
        end: NaiveDate,
        centers: &[(CostCenter, Decimal)],
    ) -> CostCenterReport {
        let mut usages: Vec<CostCenterUsage> = centers
            .iter()
            .filter(|(center, _)| center.is_active)
            .map(|(center, expenses)| Self::usage(center, *expenses))
            .collect();
        usages.sort_by(|a, b| a.code.cmp(&b.code));

        let total_budget: Decimal = usages.iter().filter_map(|u| u.budget_amount).sum();
        let total_expenses: Decimal = usages.iter().map(|u| u.expenses).sum();
        let over_budget_count = usages.iter().filter(|u| u.is_over_budget).count();

        CostCenterReport {
            start,
            end,
            centers: usages,
            total_budget,
            total_expenses,
            total_used_percentage: Self::used_percentage(Some(total_budget), total_expenses),
            over_budget_count,
        }
    }
}

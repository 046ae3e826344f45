//! Integration tests for cost centers and allocations.

mod common;

use rust_decimal_macros::dec;
use tally_core::cost_center::{BudgetPeriod, CostCenterUpdate, NewAllocation, NewCostCenter};
use tally_core::ledger::{ErrorKind, LedgerError};
use tally_shared::types::{CostCenterId, JournalLineId};

use common::{TestLedger, setup, today};

async fn center(t: &TestLedger, code: &str) -> CostCenterId {
    t.ledger
        .cost_centers
        .create(&t.tenant, NewCostCenter::new(code, format!("Center {code}")))
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_create_get_and_list() {
    let t = setup().await;
    let ops = t
        .ledger
        .cost_centers
        .create(
            &t.tenant,
            NewCostCenter::new("OPS", "Operations").with_budget(dec!(5000), BudgetPeriod::Quarterly),
        )
        .await
        .unwrap();
    let mut inactive = NewCostCenter::new("ARCH", "Archive");
    inactive.is_active = false;
    t.ledger
        .cost_centers
        .create(&t.tenant, inactive)
        .await
        .unwrap();

    let fetched = t.ledger.cost_centers.get(&t.tenant, ops.id).await.unwrap();
    assert_eq!(fetched.budget_amount, Some(dec!(5000)));
    assert_eq!(fetched.budget_period, BudgetPeriod::Quarterly);

    let all = t.ledger.cost_centers.list(&t.tenant, false).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].code, "ARCH");
    let active = t.ledger.cost_centers.list(&t.tenant, true).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].code, "OPS");
}

#[tokio::test]
async fn test_duplicate_code_rejected() {
    let t = setup().await;
    center(&t, "OPS").await;
    let err = t
        .ledger
        .cost_centers
        .create(&t.tenant, NewCostCenter::new("OPS", "Again"))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateCode(code) if code == "OPS"));
}

#[tokio::test]
async fn test_negative_budget_rejected() {
    let t = setup().await;
    let err = t
        .ledger
        .cost_centers
        .create(
            &t.tenant,
            NewCostCenter::new("OPS", "Operations").with_budget(dec!(-1), BudgetPeriod::Monthly),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NegativeBudget));
}

#[tokio::test]
async fn test_update_applies_changes_and_refuses_cycles() {
    let t = setup().await;
    let parent = center(&t, "CORP").await;
    let child = t
        .ledger
        .cost_centers
        .create(&t.tenant, NewCostCenter::new("OPS", "Operations").with_parent(parent))
        .await
        .unwrap();

    let updated = t
        .ledger
        .cost_centers
        .update(
            &t.tenant,
            child.id,
            CostCenterUpdate {
                name: Some("Field Operations".to_string()),
                budget_amount: Some(Some(dec!(1200))),
                ..CostCenterUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Field Operations");
    assert_eq!(updated.budget_amount, Some(dec!(1200)));
    assert_eq!(updated.parent_id, Some(parent));
    assert!(updated.updated_at >= updated.created_at);

    let err = t
        .ledger
        .cost_centers
        .update(
            &t.tenant,
            parent,
            CostCenterUpdate {
                parent_id: Some(Some(child.id)),
                ..CostCenterUpdate::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::HierarchyCycle(_)));

    let err = t
        .ledger
        .cost_centers
        .create(
            &t.tenant,
            NewCostCenter::new("X", "Orphan").with_parent(CostCenterId::new()),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_allocation_defaults_to_line_amount() {
    let t = setup().await;
    let ops = center(&t, "OPS").await;
    let entry = t.posted(t.chart.rent, t.chart.cash, dec!(450)).await;

    let allocation = t
        .ledger
        .cost_centers
        .allocate(
            &t.tenant,
            NewAllocation {
                cost_center_id: ops,
                journal_line_id: entry.lines[0].id,
                amount: None,
                allocation_date: today(),
            },
        )
        .await
        .unwrap();
    assert_eq!(allocation.amount, dec!(450));

    let partial = t
        .ledger
        .cost_centers
        .allocate(
            &t.tenant,
            NewAllocation {
                cost_center_id: ops,
                journal_line_id: entry.lines[1].id,
                amount: Some(dec!(50)),
                allocation_date: today(),
            },
        )
        .await
        .unwrap();
    assert_eq!(partial.amount, dec!(50));

    let listed = t
        .ledger
        .cost_centers
        .list_allocations(&t.tenant, ops)
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
}

#[tokio::test]
async fn test_allocation_requires_posted_line() {
    let t = setup().await;
    let ops = center(&t, "OPS").await;
    let draft = t.draft(t.chart.rent, t.chart.cash, dec!(10)).await;

    let err = t
        .ledger
        .cost_centers
        .allocate(
            &t.tenant,
            NewAllocation {
                cost_center_id: ops,
                journal_line_id: draft.lines[0].id,
                amount: None,
                allocation_date: today(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::EntryNotPosted(id) if id == draft.id.into_inner()));

    let err = t
        .ledger
        .cost_centers
        .allocate(
            &t.tenant,
            NewAllocation {
                cost_center_id: ops,
                journal_line_id: JournalLineId::new(),
                amount: None,
                allocation_date: today(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::LineNotFound(_)));

    let posted = t.posted(t.chart.rent, t.chart.cash, dec!(10)).await;
    let err = t
        .ledger
        .cost_centers
        .allocate(
            &t.tenant,
            NewAllocation {
                cost_center_id: ops,
                journal_line_id: posted.lines[0].id,
                amount: Some(dec!(0)),
                allocation_date: today(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAllocationAmount));
}

#[tokio::test]
async fn test_report_without_budget_is_never_over() {
    let t = setup().await;
    let ops = center(&t, "OPS").await;
    let entry = t.posted(t.chart.rent, t.chart.cash, dec!(700)).await;
    t.ledger
        .cost_centers
        .allocate(
            &t.tenant,
            NewAllocation {
                cost_center_id: ops,
                journal_line_id: entry.lines[0].id,
                amount: None,
                allocation_date: today(),
            },
        )
        .await
        .unwrap();

    let report = t
        .ledger
        .cost_centers
        .report(&t.tenant, today(), today())
        .await
        .unwrap();
    assert_eq!(report.centers.len(), 1);
    let usage = &report.centers[0];
    assert_eq!(usage.expenses, dec!(700));
    assert_eq!(usage.budget_used_percentage, dec!(0));
    assert!(!usage.is_over_budget);
    assert_eq!(report.over_budget_count, 0);
}

#[tokio::test]
async fn test_report_flags_over_budget_centers() {
    let t = setup().await;
    let ops = t
        .ledger
        .cost_centers
        .create(
            &t.tenant,
            NewCostCenter::new("OPS", "Operations").with_budget(dec!(400), BudgetPeriod::Monthly),
        )
        .await
        .unwrap()
        .id;
    let idle = t
        .ledger
        .cost_centers
        .create(
            &t.tenant,
            NewCostCenter::new("RND", "Research").with_budget(dec!(1000), BudgetPeriod::Monthly),
        )
        .await
        .unwrap()
        .id;
    let entry = t.posted(t.chart.rent, t.chart.cash, dec!(500)).await;
    t.ledger
        .cost_centers
        .allocate(
            &t.tenant,
            NewAllocation {
                cost_center_id: ops,
                journal_line_id: entry.lines[0].id,
                amount: None,
                allocation_date: today(),
            },
        )
        .await
        .unwrap();

    let report = t
        .ledger
        .cost_centers
        .report(&t.tenant, today(), today())
        .await
        .unwrap();
    assert_eq!(report.over_budget_count, 1);
    assert_eq!(report.total_budget, dec!(1400));
    assert_eq!(report.total_expenses, dec!(500));

    let ops_usage = report.centers.iter().find(|c| c.cost_center_id == ops).unwrap();
    assert!(ops_usage.is_over_budget);
    assert_eq!(ops_usage.budget_used_percentage, dec!(125));
    let idle_usage = report.centers.iter().find(|c| c.cost_center_id == idle).unwrap();
    assert_eq!(idle_usage.expenses, dec!(0));
    assert!(!idle_usage.is_over_budget);
}

#[tokio::test]
async fn test_delete_refused_while_referenced() {
    let t = setup().await;
    let parent = center(&t, "CORP").await;
    let child = t
        .ledger
        .cost_centers
        .create(&t.tenant, NewCostCenter::new("OPS", "Operations").with_parent(parent))
        .await
        .unwrap()
        .id;

    let err = t
        .ledger
        .cost_centers
        .delete(&t.tenant, parent)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::CostCenterHasChildren(_)));
    assert_eq!(err.kind(), ErrorKind::ReferentialIntegrity);

    let entry = t.posted(t.chart.rent, t.chart.cash, dec!(20)).await;
    t.ledger
        .cost_centers
        .allocate(
            &t.tenant,
            NewAllocation {
                cost_center_id: child,
                journal_line_id: entry.lines[0].id,
                amount: None,
                allocation_date: today(),
            },
        )
        .await
        .unwrap();
    let err = t
        .ledger
        .cost_centers
        .delete(&t.tenant, child)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::CostCenterHasAllocations(_)));

    let spare = center(&t, "SPARE").await;
    t.ledger
        .cost_centers
        .delete(&t.tenant, spare)
        .await
        .unwrap();
    let err = t
        .ledger
        .cost_centers
        .get(&t.tenant, spare)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::CostCenterNotFound(_)));
}

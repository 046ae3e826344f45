//! Cost center tracker: budget buckets, allocations and usage reports.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use tally_core::cost_center::{
    CostAllocation, CostCenter, CostCenterReport, CostCenterService, CostCenterUpdate,
    NewAllocation, NewCostCenter,
};
use tally_core::hierarchy::{HierarchyViolation, check_parent};
use tally_core::ledger::LedgerError;
use tally_core::reports::ReportService;
use tally_shared::TenantContext;
use tally_shared::types::{CostAllocationId, CostCenterId, TenantId};

use crate::entities::sea_orm_active_enums::EntryStatus;
use crate::entities::{cost_allocations, cost_centers, journal_entries, journal_lines};
use crate::error::{StoreResultExt, is_unique_violation, store_error};
use crate::rls::scope_to_tenant;

/// Cost center repository.
#[derive(Debug, Clone)]
pub struct CostCenterRepository {
    db: DatabaseConnection,
}

impl CostCenterRepository {
    /// Creates a new cost center repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets a cost center of the tenant.
    pub async fn get(
        &self,
        tenant: &TenantContext,
        id: CostCenterId,
    ) -> Result<CostCenter, LedgerError> {
        find_cost_center(&self.db, tenant.id, id)
            .await
            .map(Into::into)
    }

    /// Lists the tenant's cost centers ordered by code.
    pub async fn list(
        &self,
        tenant: &TenantContext,
        active_only: bool,
    ) -> Result<Vec<CostCenter>, LedgerError> {
        let mut query = cost_centers::Entity::find()
            .filter(cost_centers::Column::TenantId.eq(tenant.id.into_inner()));
        if active_only {
            query = query.filter(cost_centers::Column::IsActive.eq(true));
        }

        let models = query
            .order_by_asc(cost_centers::Column::Code)
            .all(&self.db)
            .await
            .context("list cost centers")?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    /// Creates a cost center.
    pub async fn create(
        &self,
        tenant: &TenantContext,
        input: NewCostCenter,
    ) -> Result<CostCenter, LedgerError> {
        input.validate()?;

        let txn = self.db.begin().await.context("begin create cost center")?;
        scope_to_tenant(&txn, tenant.id)
            .await
            .context("scope create cost center")?;

        if let Some(parent_id) = input.parent_id {
            ensure_valid_parent(&txn, tenant.id, None, parent_id).await?;
        }

        let now = Utc::now();
        let model = cost_centers::ActiveModel {
            id: Set(CostCenterId::new().into_inner()),
            tenant_id: Set(tenant.id.into_inner()),
            code: Set(input.code.clone()),
            name: Set(input.name),
            parent_id: Set(input.parent_id.map(CostCenterId::into_inner)),
            budget_amount: Set(input.budget_amount),
            budget_period: Set(input.budget_period.into()),
            is_active: Set(input.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                LedgerError::DuplicateCode(input.code.clone())
            } else {
                store_error("insert cost center", err)
            }
        })?;

        txn.commit().await.context("commit create cost center")?;

        info!(
            tenant_id = %tenant.id,
            cost_center_id = %model.id,
            code = %model.code,
            "Cost center created"
        );

        Ok(model.into())
    }

    /// Applies a partial update to a cost center.
    pub async fn update(
        &self,
        tenant: &TenantContext,
        id: CostCenterId,
        changes: CostCenterUpdate,
    ) -> Result<CostCenter, LedgerError> {
        changes.validate()?;

        let txn = self.db.begin().await.context("begin update cost center")?;
        scope_to_tenant(&txn, tenant.id)
            .await
            .context("scope update cost center")?;

        let existing = find_cost_center(&txn, tenant.id, id).await?;
        if let Some(Some(parent_id)) = changes.parent_id {
            ensure_valid_parent(&txn, tenant.id, Some(id), parent_id).await?;
        }

        let mut active: cost_centers::ActiveModel = existing.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(parent_id) = changes.parent_id {
            active.parent_id = Set(parent_id.map(CostCenterId::into_inner));
        }
        if let Some(budget_amount) = changes.budget_amount {
            active.budget_amount = Set(budget_amount);
        }
        if let Some(budget_period) = changes.budget_period {
            active.budget_period = Set(budget_period.into());
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&txn).await.context("update cost center")?;
        txn.commit().await.context("commit update cost center")?;

        info!(
            tenant_id = %tenant.id,
            cost_center_id = %id,
            "Cost center updated"
        );

        Ok(model.into())
    }

    /// Deletes a cost center that has no children and no allocations.
    ///
    /// # Errors
    ///
    /// Returns `CostCenterHasChildren` or `CostCenterHasAllocations` when the
    /// center is still referenced; nothing is deleted in that case.
    pub async fn delete(
        &self,
        tenant: &TenantContext,
        id: CostCenterId,
    ) -> Result<(), LedgerError> {
        let txn = self.db.begin().await.context("begin delete cost center")?;
        scope_to_tenant(&txn, tenant.id)
            .await
            .context("scope delete cost center")?;

        find_cost_center(&txn, tenant.id, id).await?;

        let children = cost_centers::Entity::find()
            .filter(cost_centers::Column::TenantId.eq(tenant.id.into_inner()))
            .filter(cost_centers::Column::ParentId.eq(id.into_inner()))
            .count(&txn)
            .await
            .context("count child cost centers")?;
        if children > 0 {
            warn!(
                tenant_id = %tenant.id,
                cost_center_id = %id,
                children,
                "Refused delete of cost center with children"
            );
            return Err(LedgerError::CostCenterHasChildren(id.into_inner()));
        }

        let allocations = cost_allocations::Entity::find()
            .filter(cost_allocations::Column::TenantId.eq(tenant.id.into_inner()))
            .filter(cost_allocations::Column::CostCenterId.eq(id.into_inner()))
            .count(&txn)
            .await
            .context("count cost allocations")?;
        if allocations > 0 {
            warn!(
                tenant_id = %tenant.id,
                cost_center_id = %id,
                allocations,
                "Refused delete of cost center with allocations"
            );
            return Err(LedgerError::CostCenterHasAllocations(id.into_inner()));
        }

        cost_centers::Entity::delete_many()
            .filter(cost_centers::Column::Id.eq(id.into_inner()))
            .filter(cost_centers::Column::TenantId.eq(tenant.id.into_inner()))
            .exec(&txn)
            .await
            .context("delete cost center")?;
        txn.commit().await.context("commit delete cost center")?;

        info!(tenant_id = %tenant.id, cost_center_id = %id, "Cost center deleted");
        Ok(())
    }

    /// Allocates a posted line amount to a cost center.
    ///
    /// The amount defaults to the line's base amount (its base debit, or its
    /// base credit for a credit line) and must be positive.
    pub async fn allocate(
        &self,
        tenant: &TenantContext,
        input: NewAllocation,
    ) -> Result<CostAllocation, LedgerError> {
        let txn = self.db.begin().await.context("begin allocate cost")?;
        scope_to_tenant(&txn, tenant.id)
            .await
            .context("scope allocate cost")?;

        find_cost_center(&txn, tenant.id, input.cost_center_id).await?;

        let line_id = input.journal_line_id.into_inner();
        let (entry_id, status, base_debit, base_credit): (Uuid, EntryStatus, Decimal, Decimal) =
            journal_lines::Entity::find_by_id(line_id)
                .select_only()
                .column(journal_lines::Column::EntryId)
                .column(journal_entries::Column::Status)
                .column(journal_lines::Column::BaseDebit)
                .column(journal_lines::Column::BaseCredit)
                .join(JoinType::InnerJoin, journal_lines::Relation::JournalEntry.def())
                .filter(journal_lines::Column::TenantId.eq(tenant.id.into_inner()))
                .into_tuple()
                .one(&txn)
                .await
                .context("load allocated line")?
                .ok_or(LedgerError::LineNotFound(line_id))?;

        if status != EntryStatus::Posted {
            return Err(LedgerError::EntryNotPosted(entry_id));
        }

        let amount = input.amount.unwrap_or(if base_debit > Decimal::ZERO {
            base_debit
        } else {
            base_credit
        });
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAllocationAmount);
        }

        let model = cost_allocations::ActiveModel {
            id: Set(CostAllocationId::new().into_inner()),
            tenant_id: Set(tenant.id.into_inner()),
            cost_center_id: Set(input.cost_center_id.into_inner()),
            journal_line_id: Set(line_id),
            amount: Set(amount),
            allocation_date: Set(input.allocation_date),
            created_at: Set(Utc::now()),
        }
        .insert(&txn)
        .await
        .context("insert cost allocation")?;
        txn.commit().await.context("commit allocate cost")?;

        info!(
            tenant_id = %tenant.id,
            cost_center_id = %input.cost_center_id,
            journal_line_id = %line_id,
            %amount,
            "Cost allocated"
        );

        Ok(model.into())
    }

    /// Lists allocations of one cost center, oldest first.
    pub async fn list_allocations(
        &self,
        tenant: &TenantContext,
        id: CostCenterId,
    ) -> Result<Vec<CostAllocation>, LedgerError> {
        find_cost_center(&self.db, tenant.id, id).await?;

        let models = cost_allocations::Entity::find()
            .filter(cost_allocations::Column::TenantId.eq(tenant.id.into_inner()))
            .filter(cost_allocations::Column::CostCenterId.eq(id.into_inner()))
            .order_by_asc(cost_allocations::Column::AllocationDate)
            .order_by_asc(cost_allocations::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list cost allocations")?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    /// Budget usage of every active center for allocations dated within
    /// `[start, end]`.
    pub async fn report(
        &self,
        tenant: &TenantContext,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<CostCenterReport, LedgerError> {
        ReportService::validate_period(start, end)?;

        let centers = self.list(tenant, true).await?;

        let totals: HashMap<Uuid, Decimal> = cost_allocations::Entity::find()
            .select_only()
            .column(cost_allocations::Column::CostCenterId)
            .column_as(Expr::col(cost_allocations::Column::Amount).sum(), "expenses")
            .filter(cost_allocations::Column::TenantId.eq(tenant.id.into_inner()))
            .filter(cost_allocations::Column::AllocationDate.gte(start))
            .filter(cost_allocations::Column::AllocationDate.lte(end))
            .group_by(cost_allocations::Column::CostCenterId)
            .into_tuple::<(Uuid, Option<Decimal>)>()
            .all(&self.db)
            .await
            .context("sum cost allocations")?
            .into_iter()
            .map(|(id, total)| (id, total.unwrap_or_default()))
            .collect();

        let rows: Vec<(CostCenter, Decimal)> = centers
            .into_iter()
            .map(|center| {
                let expenses = totals
                    .get(&center.id.into_inner())
                    .copied()
                    .unwrap_or_default();
                (center, expenses)
            })
            .collect();
        let report = CostCenterService::report(start, end, &rows);

        debug!(
            tenant_id = %tenant.id,
            %start,
            %end,
            centers = report.centers.len(),
            over_budget = report.over_budget_count,
            "Cost center report computed"
        );

        Ok(report)
    }
}

async fn find_cost_center<C: ConnectionTrait>(
    conn: &C,
    tenant_id: TenantId,
    id: CostCenterId,
) -> Result<cost_centers::Model, LedgerError> {
    cost_centers::Entity::find_by_id(id.into_inner())
        .filter(cost_centers::Column::TenantId.eq(tenant_id.into_inner()))
        .one(conn)
        .await
        .context("load cost center")?
        .ok_or(LedgerError::CostCenterNotFound(id.into_inner()))
}

/// Refuses a parent outside the tenant or one that would close a cycle.
async fn ensure_valid_parent<C: ConnectionTrait>(
    conn: &C,
    tenant_id: TenantId,
    node: Option<CostCenterId>,
    parent_id: CostCenterId,
) -> Result<(), LedgerError> {
    let rows: Vec<(Uuid, Option<Uuid>)> = cost_centers::Entity::find()
        .select_only()
        .column(cost_centers::Column::Id)
        .column(cost_centers::Column::ParentId)
        .filter(cost_centers::Column::TenantId.eq(tenant_id.into_inner()))
        .into_tuple()
        .all(conn)
        .await
        .context("load cost center hierarchy")?;
    let parents: HashMap<Uuid, Option<Uuid>> = rows.into_iter().collect();

    let parent = parent_id.into_inner();
    check_parent(node.map(CostCenterId::into_inner), parent, &parents).map_err(|violation| {
        match violation {
            HierarchyViolation::MissingParent => LedgerError::CostCenterNotFound(parent),
            HierarchyViolation::Cycle | HierarchyViolation::TooDeep => {
                LedgerError::HierarchyCycle(parent)
            }
        }
    })
}

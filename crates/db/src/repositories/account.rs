//! Account directory: the tenant's chart of accounts.
//!
//! Accounts are created and read here; there is no update or delete path.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use tally_core::hierarchy::{HierarchyViolation, check_parent};
use tally_core::ledger::{Account, LedgerError, NewAccount};
use tally_shared::TenantContext;
use tally_shared::types::{AccountId, TenantId};

use crate::entities::accounts;
use crate::error::{StoreResultExt, is_unique_violation, store_error};
use crate::rls::scope_to_tenant;

/// Account repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets an account of the tenant.
    pub async fn get(
        &self,
        tenant: &TenantContext,
        account_id: AccountId,
    ) -> Result<Account, LedgerError> {
        find_account(&self.db, tenant.id, account_id).await
    }

    /// Lists the tenant's accounts ordered by code.
    pub async fn list(
        &self,
        tenant: &TenantContext,
        active_only: bool,
    ) -> Result<Vec<Account>, LedgerError> {
        let mut query =
            accounts::Entity::find().filter(accounts::Column::TenantId.eq(tenant.id.into_inner()));
        if active_only {
            query = query.filter(accounts::Column::IsActive.eq(true));
        }

        let models = query
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await
            .context("list accounts")?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    /// Creates an account.
    ///
    /// Assigns an id and creation timestamp when the input has none. A parent,
    /// if given, must belong to the tenant. A duplicate code is rejected by
    /// the store's unique constraint.
    pub async fn create(
        &self,
        tenant: &TenantContext,
        input: NewAccount,
    ) -> Result<Account, LedgerError> {
        input.validate()?;

        let txn = self.db.begin().await.context("begin create account")?;
        scope_to_tenant(&txn, tenant.id)
            .await
            .context("scope create account")?;

        if let Some(parent_id) = input.parent_id {
            let parents = parent_map(&txn, tenant.id).await?;
            let parent = parent_id.into_inner();
            check_parent(input.id.map(AccountId::into_inner), parent, &parents).map_err(
                |violation| match violation {
                    HierarchyViolation::MissingParent => LedgerError::AccountNotFound(parent),
                    HierarchyViolation::Cycle | HierarchyViolation::TooDeep => {
                        LedgerError::HierarchyCycle(parent)
                    }
                },
            )?;
        }

        let id = input.id.unwrap_or_default();
        let model = accounts::ActiveModel {
            id: Set(id.into_inner()),
            tenant_id: Set(tenant.id.into_inner()),
            code: Set(input.code.clone()),
            name: Set(input.name),
            account_type: Set(input.account_type.into()),
            parent_id: Set(input.parent_id.map(AccountId::into_inner)),
            is_active: Set(input.is_active),
            is_system: Set(input.is_system),
            created_at: Set(input.created_at.unwrap_or_else(Utc::now)),
        }
        .insert(&txn)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                LedgerError::DuplicateCode(input.code.clone())
            } else {
                store_error("insert account", err)
            }
        })?;

        txn.commit().await.context("commit create account")?;

        info!(
            tenant_id = %tenant.id,
            account_id = %id,
            code = %model.code,
            "Account created"
        );

        Ok(model.into())
    }
}

/// Loads one account of the tenant; other tenants' accounts are not found.
pub(crate) async fn find_account<C: ConnectionTrait>(
    conn: &C,
    tenant_id: TenantId,
    account_id: AccountId,
) -> Result<Account, LedgerError> {
    accounts::Entity::find_by_id(account_id.into_inner())
        .filter(accounts::Column::TenantId.eq(tenant_id.into_inner()))
        .one(conn)
        .await
        .context("load account")?
        .map(Into::into)
        .ok_or(LedgerError::AccountNotFound(account_id.into_inner()))
}

/// Loads the tenant's account tree as `id -> parent`.
async fn parent_map<C: ConnectionTrait>(
    conn: &C,
    tenant_id: TenantId,
) -> Result<HashMap<Uuid, Option<Uuid>>, LedgerError> {
    let rows: Vec<(Uuid, Option<Uuid>)> = accounts::Entity::find()
        .select_only()
        .column(accounts::Column::Id)
        .column(accounts::Column::ParentId)
        .filter(accounts::Column::TenantId.eq(tenant_id.into_inner()))
        .into_tuple()
        .all(conn)
        .await
        .context("load account hierarchy")?;

    Ok(rows.into_iter().collect())
}

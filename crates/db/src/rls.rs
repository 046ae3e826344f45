//! Row-Level Security (RLS) tenant context.
//!
//! On `PostgreSQL` every write transaction sets `app.current_tenant_id` with
//! `SET LOCAL`, so the tenant policies installed by the migrations apply to
//! it. Other backends have no RLS and the call does nothing.

use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseTransaction, DbErr};
use tally_shared::types::TenantId;

/// Builds the statement that scopes a transaction to `tenant`.
///
/// The value is a UUID rendered by `Uuid`'s formatter, so it cannot carry
/// quotes.
pub fn tenant_setting_sql(tenant: TenantId) -> String {
    format!("SET LOCAL app.current_tenant_id = '{tenant}'")
}

/// Sets the RLS tenant context on an open transaction.
///
/// # Errors
///
/// Returns an error if the setting cannot be applied.
pub async fn scope_to_tenant(txn: &DatabaseTransaction, tenant: TenantId) -> Result<(), DbErr> {
    if txn.get_database_backend() != DatabaseBackend::Postgres {
        return Ok(());
    }
    txn.execute_unprepared(&tenant_setting_sql(tenant)).await?;
    Ok(())
}

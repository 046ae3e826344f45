//! Row-level security for tenant isolation on `PostgreSQL`.
//!
//! Policies match rows on `tenant_id = app.current_tenant_id`. Other
//! backends rely on the tenant filter every repository query carries, so
//! this migration is a no-op there.

use sea_orm::DatabaseBackend;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.get_database_backend() != DatabaseBackend::Postgres {
            return Ok(());
        }
        manager
            .get_connection()
            .execute_unprepared(ENABLE_RLS_SQL)
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.get_database_backend() != DatabaseBackend::Postgres {
            return Ok(());
        }
        manager
            .get_connection()
            .execute_unprepared(DISABLE_RLS_SQL)
            .await?;
        Ok(())
    }
}

const ENABLE_RLS_SQL: &str = r"
ALTER TABLE accounts ENABLE ROW LEVEL SECURITY;
ALTER TABLE journal_entries ENABLE ROW LEVEL SECURITY;
ALTER TABLE journal_lines ENABLE ROW LEVEL SECURITY;
ALTER TABLE cost_centers ENABLE ROW LEVEL SECURITY;
ALTER TABLE cost_allocations ENABLE ROW LEVEL SECURITY;

CREATE POLICY tenant_isolation ON accounts
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);

CREATE POLICY tenant_isolation ON journal_entries
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);

CREATE POLICY tenant_isolation ON journal_lines
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);

CREATE POLICY tenant_isolation ON cost_centers
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);

CREATE POLICY tenant_isolation ON cost_allocations
    USING (tenant_id = current_setting('app.current_tenant_id', true)::UUID);
";

const DISABLE_RLS_SQL: &str = r"
DROP POLICY IF EXISTS tenant_isolation ON cost_allocations;
DROP POLICY IF EXISTS tenant_isolation ON cost_centers;
DROP POLICY IF EXISTS tenant_isolation ON journal_lines;
DROP POLICY IF EXISTS tenant_isolation ON journal_entries;
DROP POLICY IF EXISTS tenant_isolation ON accounts;

ALTER TABLE cost_allocations DISABLE ROW LEVEL SECURITY;
ALTER TABLE cost_centers DISABLE ROW LEVEL SECURITY;
ALTER TABLE journal_lines DISABLE ROW LEVEL SECURITY;
ALTER TABLE journal_entries DISABLE ROW LEVEL SECURITY;
ALTER TABLE accounts DISABLE ROW LEVEL SECURITY;
";

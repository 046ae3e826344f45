//! Ledger schema: accounts, journal entries and lines, cost centers and
//! allocations.
//!
//! Built with the schema builder so the same migration runs on `PostgreSQL`
//! and `SQLite`. Amount columns are `DECIMAL(28, 8)` on `PostgreSQL`.

use sea_orm::DatabaseBackend;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let fixed_point = manager.get_database_backend() == DatabaseBackend::Postgres;

        // ============================================================
        // ACCOUNTS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Accounts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Accounts::TenantId).uuid().not_null())
                    .col(ColumnDef::new(Accounts::Code).string_len(32).not_null())
                    .col(ColumnDef::new(Accounts::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Accounts::AccountType).string_len(16).not_null())
                    .col(ColumnDef::new(Accounts::ParentId).uuid().null())
                    .col(ColumnDef::new(Accounts::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Accounts::IsSystem).boolean().not_null().default(false))
                    .col(ColumnDef::new(Accounts::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_accounts_parent")
                            .from(Accounts::Table, Accounts::ParentId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_accounts_tenant_code")
                    .table(Accounts::Table)
                    .col(Accounts::TenantId)
                    .col(Accounts::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // JOURNAL ENTRIES
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(JournalEntries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(JournalEntries::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(JournalEntries::TenantId).uuid().not_null())
                    .col(ColumnDef::new(JournalEntries::Sequence).big_integer().not_null())
                    .col(ColumnDef::new(JournalEntries::EntryNumber).string_len(32).not_null())
                    .col(ColumnDef::new(JournalEntries::EntryDate).date().not_null())
                    .col(ColumnDef::new(JournalEntries::Description).text().not_null())
                    .col(ColumnDef::new(JournalEntries::Reference).string_len(255).null())
                    .col(ColumnDef::new(JournalEntries::SourceType).string_len(32).null())
                    .col(ColumnDef::new(JournalEntries::SourceId).uuid().null())
                    .col(
                        ColumnDef::new(JournalEntries::Status)
                            .string_len(16)
                            .not_null()
                            .default("DRAFT"),
                    )
                    .col(ColumnDef::new(JournalEntries::PostedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(JournalEntries::PostedBy).uuid().null())
                    .col(ColumnDef::new(JournalEntries::VoidedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(JournalEntries::VoidedBy).uuid().null())
                    .col(ColumnDef::new(JournalEntries::VoidReason).text().null())
                    .col(
                        ColumnDef::new(JournalEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(JournalEntries::CreatedBy).uuid().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_journal_entries_tenant_sequence")
                    .table(JournalEntries::Table)
                    .col(JournalEntries::TenantId)
                    .col(JournalEntries::Sequence)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_journal_entries_tenant_number")
                    .table(JournalEntries::Table)
                    .col(JournalEntries::TenantId)
                    .col(JournalEntries::EntryNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_entries_tenant_status_date")
                    .table(JournalEntries::Table)
                    .col(JournalEntries::TenantId)
                    .col(JournalEntries::Status)
                    .col(JournalEntries::EntryDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_entries_source")
                    .table(JournalEntries::Table)
                    .col(JournalEntries::TenantId)
                    .col(JournalEntries::SourceType)
                    .col(JournalEntries::SourceId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // JOURNAL LINES
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(JournalLines::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(JournalLines::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(JournalLines::TenantId).uuid().not_null())
                    .col(ColumnDef::new(JournalLines::EntryId).uuid().not_null())
                    .col(ColumnDef::new(JournalLines::LineNumber).integer().not_null())
                    .col(ColumnDef::new(JournalLines::AccountId).uuid().not_null())
                    .col(ColumnDef::new(JournalLines::Description).text().null())
                    .col(ColumnDef::new(JournalLines::Currency).string_len(3).not_null())
                    .col(amount(JournalLines::DebitAmount, fixed_point))
                    .col(amount(JournalLines::CreditAmount, fixed_point))
                    .col(amount(JournalLines::ExchangeRate, fixed_point))
                    .col(amount(JournalLines::BaseDebit, fixed_point))
                    .col(amount(JournalLines::BaseCredit, fixed_point))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_lines_entry")
                            .from(JournalLines::Table, JournalLines::EntryId)
                            .to(JournalEntries::Table, JournalEntries::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_lines_account")
                            .from(JournalLines::Table, JournalLines::AccountId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_lines_entry")
                    .table(JournalLines::Table)
                    .col(JournalLines::EntryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_lines_account")
                    .table(JournalLines::Table)
                    .col(JournalLines::TenantId)
                    .col(JournalLines::AccountId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // COST CENTERS
        // ============================================================
        let mut budget = ColumnDef::new(CostCenters::BudgetAmount);
        if fixed_point {
            budget.decimal_len(28, 8);
        } else {
            budget.decimal();
        }

        manager
            .create_table(
                Table::create()
                    .table(CostCenters::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CostCenters::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(CostCenters::TenantId).uuid().not_null())
                    .col(ColumnDef::new(CostCenters::Code).string_len(32).not_null())
                    .col(ColumnDef::new(CostCenters::Name).string_len(255).not_null())
                    .col(ColumnDef::new(CostCenters::ParentId).uuid().null())
                    .col(budget.null())
                    .col(
                        ColumnDef::new(CostCenters::BudgetPeriod)
                            .string_len(16)
                            .not_null()
                            .default("MONTHLY"),
                    )
                    .col(ColumnDef::new(CostCenters::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(CostCenters::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(CostCenters::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_cost_centers_tenant_code")
                    .table(CostCenters::Table)
                    .col(CostCenters::TenantId)
                    .col(CostCenters::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // COST ALLOCATIONS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(CostAllocations::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CostAllocations::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(CostAllocations::TenantId).uuid().not_null())
                    .col(ColumnDef::new(CostAllocations::CostCenterId).uuid().not_null())
                    .col(ColumnDef::new(CostAllocations::JournalLineId).uuid().not_null())
                    .col(amount(CostAllocations::Amount, fixed_point))
                    .col(ColumnDef::new(CostAllocations::AllocationDate).date().not_null())
                    .col(
                        ColumnDef::new(CostAllocations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cost_allocations_line")
                            .from(CostAllocations::Table, CostAllocations::JournalLineId)
                            .to(JournalLines::Table, JournalLines::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cost_allocations_center_date")
                    .table(CostAllocations::Table)
                    .col(CostAllocations::TenantId)
                    .col(CostAllocations::CostCenterId)
                    .col(CostAllocations::AllocationDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CostAllocations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CostCenters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JournalLines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JournalEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await
    }
}

/// Non-null amount column: fixed-point on `PostgreSQL`, the backend's
/// native decimal elsewhere.
fn amount<T: IntoIden>(name: T, fixed_point: bool) -> ColumnDef {
    let mut col = ColumnDef::new(name);
    if fixed_point {
        col.decimal_len(28, 8);
    } else {
        col.decimal();
    }
    col.not_null().to_owned()
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
    TenantId,
    Code,
    Name,
    AccountType,
    ParentId,
    IsActive,
    IsSystem,
    CreatedAt,
}

#[derive(DeriveIden)]
enum JournalEntries {
    Table,
    Id,
    TenantId,
    Sequence,
    EntryNumber,
    EntryDate,
    Description,
    Reference,
    SourceType,
    SourceId,
    Status,
    PostedAt,
    PostedBy,
    VoidedAt,
    VoidedBy,
    VoidReason,
    CreatedAt,
    CreatedBy,
}

#[derive(DeriveIden)]
enum JournalLines {
    Table,
    Id,
    TenantId,
    EntryId,
    LineNumber,
    AccountId,
    Description,
    Currency,
    DebitAmount,
    CreditAmount,
    ExchangeRate,
    BaseDebit,
    BaseCredit,
}

#[derive(DeriveIden)]
enum CostCenters {
    Table,
    Id,
    TenantId,
    Code,
    Name,
    ParentId,
    BudgetAmount,
    BudgetPeriod,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CostAllocations {
    Table,
    Id,
    TenantId,
    CostCenterId,
    JournalLineId,
    Amount,
    AllocationDate,
    CreatedAt,
}

//! Default chart of system accounts.
//!
//! Seeding is additive: codes that already exist in the tenant are kept as
//! they are and reused as parents for the accounts created after them.

use std::collections::HashMap;

use tracing::{info, warn};

use tally_core::ledger::{AccountType, LedgerError, NewAccount};
use tally_shared::TenantContext;
use tally_shared::types::AccountId;

use crate::Ledger;

/// One row of a seed chart: code, name, type, parent code.
pub type SeedAccount = (&'static str, &'static str, AccountType, Option<&'static str>);

/// Default chart. Parents precede their children.
pub const SYSTEM_ACCOUNTS: &[SeedAccount] = &[
    ("1000", "Assets", AccountType::Asset, None),
    ("1100", "Cash and Cash Equivalents", AccountType::Asset, Some("1000")),
    ("1200", "Accounts Receivable", AccountType::Asset, Some("1000")),
    ("1500", "Fixed Assets", AccountType::Asset, Some("1000")),
    ("2000", "Liabilities", AccountType::Liability, None),
    ("2100", "Accounts Payable", AccountType::Liability, Some("2000")),
    ("2200", "Accrued Liabilities", AccountType::Liability, Some("2000")),
    ("3000", "Equity", AccountType::Equity, None),
    ("3100", "Share Capital", AccountType::Equity, Some("3000")),
    ("3200", "Retained Earnings", AccountType::Equity, Some("3000")),
    ("4000", "Revenue", AccountType::Revenue, None),
    ("4100", "Sales", AccountType::Revenue, Some("4000")),
    ("4900", "Other Income", AccountType::Revenue, Some("4000")),
    ("5000", "Cost of Sales", AccountType::Expense, None),
    ("6000", "Operating Expenses", AccountType::Expense, None),
    ("6100", "Rent", AccountType::Expense, Some("6000")),
    ("6200", "Salaries", AccountType::Expense, Some("6000")),
];

/// Seeds [`SYSTEM_ACCOUNTS`] for `tenant` and returns how many were created.
///
/// # Errors
///
/// Returns an error if listing or creating an account fails.
pub async fn seed_system_accounts(
    ledger: &Ledger,
    tenant: &TenantContext,
) -> Result<usize, LedgerError> {
    let known = account_ids_by_code(ledger, tenant).await?;
    seed_accounts(ledger, tenant, SYSTEM_ACCOUNTS, known).await
}

async fn account_ids_by_code(
    ledger: &Ledger,
    tenant: &TenantContext,
) -> Result<HashMap<String, AccountId>, LedgerError> {
    Ok(ledger
        .accounts
        .list(tenant, false)
        .await?
        .into_iter()
        .map(|account| (account.code, account.id))
        .collect())
}

/// Creates the accounts of `chart` missing from `by_code`.
///
/// `by_code` may be stale. A code that turns out to exist already is
/// resolved by re-reading the tenant's accounts, so its children still get
/// the right parent.
async fn seed_accounts(
    ledger: &Ledger,
    tenant: &TenantContext,
    chart: &[SeedAccount],
    mut by_code: HashMap<String, AccountId>,
) -> Result<usize, LedgerError> {
    let mut created = 0;
    for &(code, name, account_type, parent_code) in chart {
        if by_code.contains_key(code) {
            continue;
        }

        let mut input = NewAccount::new(code, name, account_type).system();
        if let Some(parent_code) = parent_code {
            let parent = by_code.get(parent_code).copied().ok_or_else(|| {
                LedgerError::ForeignKeyViolation(format!(
                    "parent account {parent_code} of {code} does not exist"
                ))
            })?;
            input = input.with_parent(parent);
        }

        match ledger.accounts.create(tenant, input).await {
            Ok(account) => {
                info!(tenant_id = %tenant.id, code = %account.code, "Seeded system account");
                by_code.insert(account.code, account.id);
                created += 1;
            }
            Err(LedgerError::DuplicateCode(code)) => {
                warn!(tenant_id = %tenant.id, %code, "Account already exists, reusing it");
                by_code = account_ids_by_code(ledger, tenant).await?;
            }
            Err(err) => return Err(err),
        }
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnectOptions, Database, DatabaseConnection};
    use sea_orm_migration::MigratorTrait;
    use tally_shared::config::LedgerConfig;
    use tally_shared::types::TenantId;

    use crate::migration::Migrator;

    async fn ledger() -> Ledger {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db: DatabaseConnection = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        Ledger::new(db, &LedgerConfig::default())
    }

    #[tokio::test]
    async fn test_stale_snapshot_reuses_existing_parent() {
        let ledger = ledger().await;
        let tenant = TenantContext::new(TenantId::new(), "USD");
        let existing = ledger
            .accounts
            .create(
                &tenant,
                NewAccount::new("6000", "Operating Expenses", AccountType::Expense),
            )
            .await
            .unwrap();

        let chart: &[SeedAccount] = &[
            ("6000", "Operating Expenses", AccountType::Expense, None),
            ("6100", "Rent", AccountType::Expense, Some("6000")),
        ];
        let created = seed_accounts(&ledger, &tenant, chart, HashMap::new())
            .await
            .unwrap();
        assert_eq!(created, 1);

        let accounts = ledger.accounts.list(&tenant, false).await.unwrap();
        assert_eq!(accounts.len(), 2);
        let rent = accounts.iter().find(|a| a.code == "6100").unwrap();
        assert_eq!(rent.parent_id, Some(existing.id));
        assert!(rent.is_system);
    }

    #[tokio::test]
    async fn test_seeding_twice_creates_nothing_new() {
        let ledger = ledger().await;
        let tenant = TenantContext::new(TenantId::new(), "EUR");

        let first = seed_system_accounts(&ledger, &tenant).await.unwrap();
        assert_eq!(first, SYSTEM_ACCOUNTS.len());
        let second = seed_system_accounts(&ledger, &tenant).await.unwrap();
        assert_eq!(second, 0);

        let accounts = ledger.accounts.list(&tenant, false).await.unwrap();
        let assets = accounts.iter().find(|a| a.code == "1000").unwrap();
        let cash = accounts.iter().find(|a| a.code == "1100").unwrap();
        assert_eq!(cash.parent_id, Some(assets.id));
        assert!(accounts.iter().all(|a| a.is_system));
    }

    #[tokio::test]
    async fn test_missing_parent_is_reported() {
        let ledger = ledger().await;
        let tenant = TenantContext::new(TenantId::new(), "USD");
        let chart: &[SeedAccount] = &[("6100", "Rent", AccountType::Expense, Some("6000"))];

        let err = seed_accounts(&ledger, &tenant, chart, HashMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::ForeignKeyViolation(_)));
    }
}

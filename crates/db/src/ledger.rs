//! Entry point bundling the ledger repositories over one connection pool.

use sea_orm::DatabaseConnection;
use tally_core::ledger::EntryNumbering;
use tally_shared::config::LedgerConfig;

use crate::repositories::{
    AccountRepository, CostCenterRepository, JournalRepository, ReportRepository,
};

/// The ledger engine's service contract.
///
/// Cloning is cheap; all repositories share the same pool.
#[derive(Debug, Clone)]
pub struct Ledger {
    /// Chart of accounts.
    pub accounts: AccountRepository,
    /// Journal entries: create, post, void and lookups.
    pub journal: JournalRepository,
    /// Balances and financial statements.
    pub reports: ReportRepository,
    /// Cost centers, allocations and budget usage.
    pub cost_centers: CostCenterRepository,
}

impl Ledger {
    /// Builds the ledger over an open connection.
    #[must_use]
    pub fn new(db: DatabaseConnection, config: &LedgerConfig) -> Self {
        Self {
            accounts: AccountRepository::new(db.clone()),
            journal: JournalRepository::new(db.clone(), EntryNumbering::from(config)),
            reports: ReportRepository::new(db.clone()),
            cost_centers: CostCenterRepository::new(db),
        }
    }
}

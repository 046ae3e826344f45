//! Shared fixtures for ledger integration tests.
//!
//! Each test gets its own in-memory `SQLite` database with the schema
//! migrated and a small chart of accounts for one tenant.

#![allow(dead_code)]

use chrono::{Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use tally_core::ledger::{AccountType, CreateEntryRequest, JournalEntry, LineInput, NewAccount};
use tally_db::Ledger;
use tally_db::migration::Migrator;
use tally_shared::TenantContext;
use tally_shared::config::LedgerConfig;
use tally_shared::types::{AccountId, TenantId, UserId};

/// Account ids of the seeded chart.
#[derive(Debug, Clone, Copy)]
pub struct Chart {
    pub cash: AccountId,
    pub receivables: AccountId,
    pub payables: AccountId,
    pub capital: AccountId,
    pub sales: AccountId,
    pub rent: AccountId,
}

/// A migrated database with one seeded tenant.
pub struct TestLedger {
    pub db: DatabaseConnection,
    pub ledger: Ledger,
    pub tenant: TenantContext,
    pub user: UserId,
    pub chart: Chart,
}

pub async fn connect() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Failed to migrate");
    db
}

pub async fn setup() -> TestLedger {
    let db = connect().await;
    let ledger = Ledger::new(db.clone(), &LedgerConfig::default());
    let tenant = TenantContext::new(TenantId::new(), "EUR");
    let chart = seed_chart(&ledger, &tenant).await;

    TestLedger {
        db,
        ledger,
        tenant,
        user: UserId::new(),
        chart,
    }
}

/// Seeds a second tenant on the same database.
pub async fn add_tenant(ledger: &Ledger) -> (TenantContext, Chart) {
    let tenant = TenantContext::new(TenantId::new(), "USD");
    let chart = seed_chart(ledger, &tenant).await;
    (tenant, chart)
}

async fn seed_chart(ledger: &Ledger, tenant: &TenantContext) -> Chart {
    Chart {
        cash: seed_account(ledger, tenant, "1000", "Cash", AccountType::Asset).await,
        receivables: seed_account(ledger, tenant, "1200", "Receivables", AccountType::Asset).await,
        payables: seed_account(ledger, tenant, "2000", "Payables", AccountType::Liability).await,
        capital: seed_account(ledger, tenant, "3000", "Share Capital", AccountType::Equity).await,
        sales: seed_account(ledger, tenant, "4000", "Sales", AccountType::Revenue).await,
        rent: seed_account(ledger, tenant, "6100", "Rent", AccountType::Expense).await,
    }
}

pub async fn seed_account(
    ledger: &Ledger,
    tenant: &TenantContext,
    code: &str,
    name: &str,
    account_type: AccountType,
) -> AccountId {
    ledger
        .accounts
        .create(tenant, NewAccount::new(code, name, account_type))
        .await
        .expect("Failed to seed account")
        .id
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// A date safely after anything booked during the test, reversals included.
pub fn far_future() -> NaiveDate {
    today() + Days::new(1)
}

pub fn request(
    user: UserId,
    description: &str,
    lines: Vec<LineInput>,
) -> CreateEntryRequest {
    CreateEntryRequest {
        entry_date: today(),
        description: description.to_string(),
        reference: None,
        source_type: None,
        source_id: None,
        created_by: user,
        lines,
    }
}

impl TestLedger {
    /// Creates a two-line draft: debit `debit`, credit `credit`.
    pub async fn draft(
        &self,
        debit: AccountId,
        credit: AccountId,
        amount: Decimal,
    ) -> JournalEntry {
        self.ledger
            .journal
            .create(
                &self.tenant,
                request(
                    self.user,
                    "Test entry",
                    vec![LineInput::debit(debit, amount), LineInput::credit(credit, amount)],
                ),
            )
            .await
            .expect("Failed to create draft")
    }

    /// Creates and posts a two-line entry.
    pub async fn posted(
        &self,
        debit: AccountId,
        credit: AccountId,
        amount: Decimal,
    ) -> JournalEntry {
        let draft = self.draft(debit, credit, amount).await;
        self.ledger
            .journal
            .post(&self.tenant, draft.id, self.user)
            .await
            .expect("Failed to post entry")
    }

    pub async fn balance(&self, account: AccountId) -> Decimal {
        self.ledger
            .reports
            .account_balance(&self.tenant, account, far_future())
            .await
            .expect("Failed to compute balance")
    }

    pub async fn count_rows(&self, table: &str) -> i64 {
        let row = self
            .db
            .query_one(sea_orm::Statement::from_string(
                self.db.get_database_backend(),
                format!("SELECT COUNT(*) AS n FROM {table}"),
            ))
            .await
            .expect("Failed to count rows")
            .expect("COUNT returned no row");
        row.try_get("", "n").expect("Failed to read count")
    }
}

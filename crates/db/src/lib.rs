//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Tenant-scoped repositories implementing the ledger operations
//! - Database migrations, including `PostgreSQL` row-level security
//! - Seeding of the default system chart of accounts

pub mod entities;
mod error;
mod ledger;
pub mod migration;
pub mod repositories;
pub mod rls;
pub mod seed;

pub use ledger::Ledger;
pub use repositories::{
    AccountRepository, CostCenterRepository, JournalRepository, ReportRepository,
};
pub use seed::{SYSTEM_ACCOUNTS, seed_system_accounts};

use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tally_shared::config::DatabaseConfig;
use tracing::info;

/// Establishes a connection pool to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    info!(
        backend = ?db.get_database_backend(),
        max_connections = config.max_connections,
        "Connected to database"
    );
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DatabaseBackend;

    #[tokio::test]
    async fn test_connect_opens_configured_backend() {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
        };
        let db = connect(&config).await.unwrap();
        assert_eq!(db.get_database_backend(), DatabaseBackend::Sqlite);
        db.ping().await.unwrap();
    }
}

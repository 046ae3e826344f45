//! Seeds the default chart of system accounts for one tenant.
//!
//! Usage: `seeder [TENANT_ID] [BASE_CURRENCY]`
//!
//! Without arguments the development tenant is seeded in `USD`. Accounts
//! whose code already exists are left untouched, so the seeder can be
//! re-run safely.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use tally_db::{Ledger, connect, seed_system_accounts};
use tally_shared::types::TenantId;
use tally_shared::{AppConfig, TenantContext};

/// Development tenant ID (consistent for all seeds)
const DEV_TENANT_ID: &str = "00000000-0000-0000-0000-000000000001";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally_db=info,tally_seeder=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let tenant_id = args.next().unwrap_or_else(|| DEV_TENANT_ID.to_string());
    let tenant_id = Uuid::parse_str(&tenant_id)
        .with_context(|| format!("invalid tenant id: {tenant_id}"))?;
    let base_currency = args.next().unwrap_or_else(|| "USD".to_string());
    let tenant = TenantContext::new(TenantId::from_uuid(tenant_id), base_currency);

    let config = AppConfig::load().context("failed to load configuration")?;
    let db = connect(&config.database)
        .await
        .context("failed to connect to database")?;
    let ledger = Ledger::new(db, &config.ledger);

    let created = seed_system_accounts(&ledger, &tenant)
        .await
        .context("failed to seed system accounts")?;
    info!(tenant_id = %tenant.id, created, "Seeding complete");
    Ok(())
}

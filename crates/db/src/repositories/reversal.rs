//! Void protocol: marks a posted entry voided and books its reversal.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, TransactionTrait};
use tracing::{info, warn};

use tally_core::ledger::{EntryStatus, JournalEntry, LedgerError, ReversalService};
use tally_shared::TenantContext;
use tally_shared::types::{JournalEntryId, UserId};

use super::journal::{JournalRepository, Posting, current_status, insert_entry, load_entry};
use crate::entities::journal_entries;
use crate::entities::sea_orm_active_enums::EntryStatus as DbEntryStatus;
use crate::error::StoreResultExt;
use crate::rls::scope_to_tenant;

impl JournalRepository {
    /// Voids a posted entry and returns the reversal entry.
    ///
    /// The original is marked voided and a posted reversal with swapped
    /// debit/credit roles is created, dated on the void date, in the same
    /// transaction. If any step fails the transaction is dropped and the
    /// original stays posted.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The reason is blank
    /// - The entry does not exist for this tenant
    /// - The entry is not posted, including when a concurrent void won
    /// - A reversal line references an account that no longer exists
    /// - A store operation fails
    pub async fn void(
        &self,
        tenant: &TenantContext,
        entry_id: JournalEntryId,
        voided_by: UserId,
        reason: &str,
    ) -> Result<JournalEntry, LedgerError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(LedgerError::MissingField("reason"));
        }

        let txn = self.db.begin().await.context("begin void entry")?;
        scope_to_tenant(&txn, tenant.id)
            .await
            .context("scope void entry")?;

        let original = load_entry(&txn, tenant.id, entry_id).await?;
        if original.status != EntryStatus::Posted {
            warn!(
                tenant_id = %tenant.id,
                entry_id = %entry_id,
                status = %original.status,
                "Rejected void of non-posted entry"
            );
            return Err(LedgerError::invalid_transition(
                entry_id.into_inner(),
                original.status,
                EntryStatus::Voided,
            ));
        }

        let now = Utc::now();
        let result = journal_entries::Entity::update_many()
            .col_expr(
                journal_entries::Column::Status,
                Expr::value(DbEntryStatus::Voided),
            )
            .col_expr(journal_entries::Column::VoidedAt, Expr::value(now))
            .col_expr(
                journal_entries::Column::VoidedBy,
                Expr::value(voided_by.into_inner()),
            )
            .col_expr(journal_entries::Column::VoidReason, Expr::value(reason))
            .filter(journal_entries::Column::Id.eq(entry_id.into_inner()))
            .filter(journal_entries::Column::TenantId.eq(tenant.id.into_inner()))
            .filter(journal_entries::Column::Status.eq(DbEntryStatus::Posted))
            .exec(&txn)
            .await
            .context("void entry")?;

        if result.rows_affected == 0 {
            let current = current_status(&txn, tenant.id, entry_id).await?;
            warn!(
                tenant_id = %tenant.id,
                entry_id = %entry_id,
                status = %current,
                "Concurrent transition won the race to void entry"
            );
            return Err(LedgerError::invalid_transition(
                entry_id.into_inner(),
                current,
                EntryStatus::Voided,
            ));
        }

        let reversal =
            ReversalService::build_reversal(&original, reason, voided_by, now.date_naive());
        let reversal = insert_entry(
            &txn,
            tenant.id,
            &self.numbering,
            reversal,
            Some(Posting {
                by: voided_by,
                at: now,
            }),
        )
        .await?;

        txn.commit().await.context("commit void entry")?;

        info!(
            tenant_id = %tenant.id,
            entry_id = %entry_id,
            entry_number = %original.entry_number,
            reversal_id = %reversal.id,
            reversal_number = %reversal.entry_number,
            "Journal entry voided"
        );

        Ok(reversal)
    }
}

//! Journal entry engine: persistence and the draft -> posted transition.
//!
//! Every mutation runs in one database transaction covering the entry and
//! all of its lines. Entry creation is shared with the void path in
//! `reversal.rs` through [`insert_entry`].

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait, TryIntoModel,
};
use tracing::{info, warn};
use uuid::Uuid;

use tally_core::ledger::{
    CreateEntryRequest, EntryFilter, EntryNumbering, EntryStatus, JournalEntry, LedgerError,
    LedgerService, NewEntry, validate_lines,
};
use tally_shared::TenantContext;
use tally_shared::types::{JournalEntryId, JournalLineId, TenantId, UserId};

use crate::entities::sea_orm_active_enums::EntryStatus as DbEntryStatus;
use crate::entities::{accounts, journal_entries, journal_lines};
use crate::error::{StoreResultExt, is_unique_violation, store_error};
use crate::rls::scope_to_tenant;

/// Journal entry repository.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    pub(super) db: DatabaseConnection,
    pub(super) numbering: EntryNumbering,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, numbering: EntryNumbering) -> Self {
        Self { db, numbering }
    }

    /// Gets an entry of the tenant with its lines.
    pub async fn get(
        &self,
        tenant: &TenantContext,
        entry_id: JournalEntryId,
    ) -> Result<JournalEntry, LedgerError> {
        load_entry(&self.db, tenant.id, entry_id).await
    }

    /// Lists entries matching `filter`, ordered by date then entry number.
    pub async fn list(
        &self,
        tenant: &TenantContext,
        filter: &EntryFilter,
    ) -> Result<Vec<JournalEntry>, LedgerError> {
        let mut query = journal_entries::Entity::find()
            .filter(journal_entries::Column::TenantId.eq(tenant.id.into_inner()));

        if let Some(status) = filter.status {
            query = query.filter(journal_entries::Column::Status.eq(DbEntryStatus::from(status)));
        }
        if let Some(from) = filter.from {
            query = query.filter(journal_entries::Column::EntryDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(journal_entries::Column::EntryDate.lte(to));
        }
        if let Some(source_type) = &filter.source_type {
            query = query.filter(journal_entries::Column::SourceType.eq(source_type.as_str()));
        }
        if let Some(source_id) = filter.source_id {
            query = query.filter(journal_entries::Column::SourceId.eq(source_id));
        }

        let headers = query
            .order_by_asc(journal_entries::Column::EntryDate)
            .order_by_asc(journal_entries::Column::Sequence)
            .all(&self.db)
            .await
            .context("list journal entries")?;

        if headers.is_empty() {
            return Ok(Vec::new());
        }

        let mut lines_by_entry: HashMap<Uuid, Vec<journal_lines::Model>> = HashMap::new();
        for line in journal_lines::Entity::find()
            .filter(journal_lines::Column::TenantId.eq(tenant.id.into_inner()))
            .filter(journal_lines::Column::EntryId.is_in(headers.iter().map(|h| h.id)))
            .order_by_asc(journal_lines::Column::LineNumber)
            .all(&self.db)
            .await
            .context("list journal lines")?
        {
            lines_by_entry.entry(line.entry_id).or_default().push(line);
        }

        Ok(headers
            .into_iter()
            .map(|header| {
                let lines = lines_by_entry.remove(&header.id).unwrap_or_default();
                header.into_entry(lines)
            })
            .collect())
    }

    /// Finds entries created from a given source document.
    pub async fn find_by_source(
        &self,
        tenant: &TenantContext,
        source_type: &str,
        source_id: Uuid,
    ) -> Result<Vec<JournalEntry>, LedgerError> {
        let filter = EntryFilter {
            source_type: Some(source_type.to_string()),
            source_id: Some(source_id),
            ..EntryFilter::default()
        };
        self.list(tenant, &filter).await
    }

    /// Creates a draft entry.
    ///
    /// The request is validated before anything is written; on success the
    /// entry and its lines are persisted in one transaction.
    pub async fn create(
        &self,
        tenant: &TenantContext,
        request: CreateEntryRequest,
    ) -> Result<JournalEntry, LedgerError> {
        let new_entry = LedgerService::prepare_entry(tenant, request)?;

        let txn = self.db.begin().await.context("begin create entry")?;
        scope_to_tenant(&txn, tenant.id)
            .await
            .context("scope create entry")?;
        let entry = insert_entry(&txn, tenant.id, &self.numbering, new_entry, None).await?;
        txn.commit().await.context("commit create entry")?;

        info!(
            tenant_id = %tenant.id,
            entry_id = %entry.id,
            entry_number = %entry.entry_number,
            lines = entry.lines.len(),
            "Journal entry created"
        );

        Ok(entry)
    }

    /// Posts a draft entry.
    ///
    /// The persisted lines are validated again before the status changes. The
    /// status change is a conditional update on `status = DRAFT`; if it
    /// matches no row the entry was not a draft and the call fails.
    pub async fn post(
        &self,
        tenant: &TenantContext,
        entry_id: JournalEntryId,
        posted_by: UserId,
    ) -> Result<JournalEntry, LedgerError> {
        let txn = self.db.begin().await.context("begin post entry")?;
        scope_to_tenant(&txn, tenant.id)
            .await
            .context("scope post entry")?;

        let mut entry = load_entry(&txn, tenant.id, entry_id).await?;
        if entry.status != EntryStatus::Draft {
            warn!(
                tenant_id = %tenant.id,
                entry_id = %entry_id,
                status = %entry.status,
                "Rejected post of non-draft entry"
            );
            return Err(LedgerError::invalid_transition(
                entry_id.into_inner(),
                entry.status,
                EntryStatus::Posted,
            ));
        }

        validate_lines(&entry.lines)?;

        let posted_at = Utc::now();
        let result = journal_entries::Entity::update_many()
            .col_expr(
                journal_entries::Column::Status,
                Expr::value(DbEntryStatus::Posted),
            )
            .col_expr(journal_entries::Column::PostedAt, Expr::value(posted_at))
            .col_expr(
                journal_entries::Column::PostedBy,
                Expr::value(posted_by.into_inner()),
            )
            .filter(journal_entries::Column::Id.eq(entry_id.into_inner()))
            .filter(journal_entries::Column::TenantId.eq(tenant.id.into_inner()))
            .filter(journal_entries::Column::Status.eq(DbEntryStatus::Draft))
            .exec(&txn)
            .await
            .context("post entry")?;

        if result.rows_affected == 0 {
            let current = current_status(&txn, tenant.id, entry_id).await?;
            warn!(
                tenant_id = %tenant.id,
                entry_id = %entry_id,
                status = %current,
                "Concurrent transition won the race to post entry"
            );
            return Err(LedgerError::invalid_transition(
                entry_id.into_inner(),
                current,
                EntryStatus::Posted,
            ));
        }

        txn.commit().await.context("commit post entry")?;

        entry.status = EntryStatus::Posted;
        entry.posted_at = Some(posted_at);
        entry.posted_by = Some(posted_by);

        info!(
            tenant_id = %tenant.id,
            entry_id = %entry_id,
            entry_number = %entry.entry_number,
            "Journal entry posted"
        );

        Ok(entry)
    }
}

/// Marks an entry as posted at creation time.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Posting {
    pub by: UserId,
    pub at: DateTime<Utc>,
}

/// Loads one entry of the tenant with its lines in line order.
pub(crate) async fn load_entry<C: ConnectionTrait>(
    conn: &C,
    tenant_id: TenantId,
    entry_id: JournalEntryId,
) -> Result<JournalEntry, LedgerError> {
    let header = journal_entries::Entity::find_by_id(entry_id.into_inner())
        .filter(journal_entries::Column::TenantId.eq(tenant_id.into_inner()))
        .one(conn)
        .await
        .context("load journal entry")?
        .ok_or(LedgerError::EntryNotFound(entry_id.into_inner()))?;

    let lines = journal_lines::Entity::find()
        .filter(journal_lines::Column::EntryId.eq(header.id))
        .order_by_asc(journal_lines::Column::LineNumber)
        .all(conn)
        .await
        .context("load journal lines")?;

    Ok(header.into_entry(lines))
}

/// Reads the current status of an entry.
pub(crate) async fn current_status<C: ConnectionTrait>(
    conn: &C,
    tenant_id: TenantId,
    entry_id: JournalEntryId,
) -> Result<EntryStatus, LedgerError> {
    journal_entries::Entity::find_by_id(entry_id.into_inner())
        .filter(journal_entries::Column::TenantId.eq(tenant_id.into_inner()))
        .select_only()
        .column(journal_entries::Column::Status)
        .into_tuple::<DbEntryStatus>()
        .one(conn)
        .await
        .context("read entry status")?
        .map(Into::into)
        .ok_or(LedgerError::EntryNotFound(entry_id.into_inner()))
}

/// Persists a validated entry inside `txn`.
///
/// Lines are validated once more, every referenced account must belong to
/// the tenant, and the entry gets the next tenant-sequential number. The
/// entry is stored as a draft unless `posting` is given.
pub(crate) async fn insert_entry(
    txn: &DatabaseTransaction,
    tenant_id: TenantId,
    numbering: &EntryNumbering,
    entry: NewEntry,
    posting: Option<Posting>,
) -> Result<JournalEntry, LedgerError> {
    validate_lines(&entry.lines)?;
    ensure_accounts_exist(txn, tenant_id, &entry).await?;

    let entry_id = JournalEntryId::new();
    let status = if posting.is_some() {
        DbEntryStatus::Posted
    } else {
        DbEntryStatus::Draft
    };

    let header = journal_entries::ActiveModel {
        id: Set(entry_id.into_inner()),
        tenant_id: Set(tenant_id.into_inner()),
        sequence: Set(0),
        entry_number: Set(String::new()),
        entry_date: Set(entry.entry_date),
        description: Set(entry.description),
        reference: Set(entry.reference),
        source_type: Set(entry.source_type),
        source_id: Set(entry.source_id),
        status: Set(status),
        posted_at: Set(posting.map(|p| p.at)),
        posted_by: Set(posting.map(|p| p.by.into_inner())),
        voided_at: Set(None),
        voided_by: Set(None),
        void_reason: Set(None),
        created_at: Set(Utc::now()),
        created_by: Set(entry.created_by.into_inner()),
    };
    let header = insert_numbered(txn, tenant_id, numbering, header).await?;

    let line_models = entry
        .lines
        .into_iter()
        .zip(1..)
        .map(|(line, line_number)| journal_lines::ActiveModel {
            id: Set(JournalLineId::new().into_inner()),
            tenant_id: Set(tenant_id.into_inner()),
            entry_id: Set(entry_id.into_inner()),
            line_number: Set(line_number),
            account_id: Set(line.account_id.into_inner()),
            description: Set(line.description),
            currency: Set(line.currency),
            debit_amount: Set(line.debit_amount),
            credit_amount: Set(line.credit_amount),
            exchange_rate: Set(line.exchange_rate),
            base_debit: Set(line.base_debit),
            base_credit: Set(line.base_credit),
        })
        .collect::<Vec<_>>();

    let lines = line_models
        .iter()
        .cloned()
        .map(|line| line.try_into_model())
        .collect::<Result<Vec<_>, _>>()
        .context("build journal lines")?;

    journal_lines::Entity::insert_many(line_models)
        .exec_without_returning(txn)
        .await
        .context("insert journal lines")?;

    Ok(header.into_entry(lines))
}

/// Inserts the entry header with the next free sequence number.
///
/// The read of the current maximum and the insert are not atomic across
/// transactions; the unique index on `(tenant_id, sequence)` rejects a
/// duplicate, and allocation is retried once inside a savepoint.
async fn insert_numbered(
    txn: &DatabaseTransaction,
    tenant_id: TenantId,
    numbering: &EntryNumbering,
    header: journal_entries::ActiveModel,
) -> Result<journal_entries::Model, LedgerError> {
    for attempt in 1..=2 {
        let current_max: Option<i64> = journal_entries::Entity::find()
            .select_only()
            .column_as(Expr::col(journal_entries::Column::Sequence).max(), "max_sequence")
            .filter(journal_entries::Column::TenantId.eq(tenant_id.into_inner()))
            .into_tuple::<Option<i64>>()
            .one(txn)
            .await
            .context("read entry sequence")?
            .flatten();
        let sequence = EntryNumbering::next_sequence(current_max);

        let mut candidate = header.clone();
        candidate.sequence = Set(sequence);
        candidate.entry_number = Set(numbering.format(sequence));

        let savepoint = txn.begin().await.context("begin entry number savepoint")?;
        match candidate.insert(&savepoint).await {
            Ok(model) => {
                savepoint
                    .commit()
                    .await
                    .context("release entry number savepoint")?;
                return Ok(model);
            }
            Err(err) if is_unique_violation(&err) => {
                savepoint
                    .rollback()
                    .await
                    .context("rollback entry number savepoint")?;
                warn!(
                    tenant_id = %tenant_id,
                    sequence,
                    attempt,
                    "Entry number already taken"
                );
            }
            Err(err) => return Err(store_error("insert journal entry", err)),
        }
    }

    Err(LedgerError::EntryNumberConflict(tenant_id.into_inner()))
}

/// Fails with `UnknownAccount` if any line points outside the tenant's chart.
async fn ensure_accounts_exist(
    txn: &DatabaseTransaction,
    tenant_id: TenantId,
    entry: &NewEntry,
) -> Result<(), LedgerError> {
    let wanted: BTreeSet<Uuid> = entry
        .lines
        .iter()
        .map(|line| line.account_id.into_inner())
        .collect();

    let found: HashSet<Uuid> = accounts::Entity::find()
        .select_only()
        .column(accounts::Column::Id)
        .filter(accounts::Column::TenantId.eq(tenant_id.into_inner()))
        .filter(accounts::Column::Id.is_in(wanted.iter().copied()))
        .into_tuple::<Uuid>()
        .all(txn)
        .await
        .context("check line accounts")?
        .into_iter()
        .collect();

    match wanted.into_iter().find(|id| !found.contains(id)) {
        Some(missing) => Err(LedgerError::UnknownAccount(missing)),
        None => Ok(()),
    }
}

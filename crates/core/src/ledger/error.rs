//! Ledger error types.
//!
//! Every failure the ledger engine reports belongs to one of five kinds
//! (see [`ErrorKind`]). Variants carry the context a caller needs to act on
//! the failure: the entity id, the attempted transition, or the imbalance.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use super::types::EntryStatus;

/// Broad classification of a [`LedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input rejected before any write.
    Validation,
    /// Record absent, or owned by another tenant.
    NotFound,
    /// Status change not allowed from the current state.
    InvalidTransition,
    /// Mutation would break a reference between records.
    ReferentialIntegrity,
    /// Connection, transaction or query failure in the store.
    Store,
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Entry has no lines.
    #[error("journal entry must have at least one line")]
    NoLines,

    /// A line carries both a debit and a credit amount.
    #[error("line {line} has both a debit and a credit amount")]
    DualSidedLine {
        /// 1-based line position.
        line: usize,
    },

    /// A line carries a negative amount.
    #[error("line {line} has a negative amount")]
    NegativeAmount {
        /// 1-based line position.
        line: usize,
    },

    /// A line's exchange rate is zero or negative.
    #[error("line {line} has a non-positive exchange rate")]
    InvalidExchangeRate {
        /// 1-based line position.
        line: usize,
    },

    /// Base-currency debits and credits differ.
    #[error("journal entry does not balance: debits={debits}, credits={credits}")]
    Unbalanced {
        /// Sum of base debits.
        debits: Decimal,
        /// Sum of base credits.
        credits: Decimal,
    },

    /// Every line is zero.
    #[error("journal entry has a zero total amount")]
    ZeroAmount,

    /// A required field is absent or blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Period start is after its end.
    #[error("invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// Requested start date.
        start: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },

    /// Parent assignment would create a cycle (or exceed the depth bound).
    #[error("parent assignment for {0} would create a cycle in the hierarchy")]
    HierarchyCycle(Uuid),

    /// Code already used by another record of the tenant.
    #[error("code already exists: {0}")]
    DuplicateCode(String),

    /// Cost center budget below zero.
    #[error("budget amount cannot be negative")]
    NegativeBudget,

    /// Allocation amount is zero or negative.
    #[error("allocation amount must be positive")]
    InvalidAllocationAmount,

    /// Allocations may only reference lines of posted entries.
    #[error("journal entry {0} is not posted and cannot receive cost allocations")]
    EntryNotPosted(Uuid),

    // ========== Not Found Errors ==========
    /// Account not found.
    #[error("account not found: {0}")]
    AccountNotFound(Uuid),

    /// Journal entry not found.
    #[error("journal entry not found: {0}")]
    EntryNotFound(Uuid),

    /// Journal line not found.
    #[error("journal line not found: {0}")]
    LineNotFound(Uuid),

    /// Cost center not found.
    #[error("cost center not found: {0}")]
    CostCenterNotFound(Uuid),

    // ========== Transition Errors ==========
    /// Status change rejected.
    #[error("cannot change entry {entry_id} from {from} to {to}: {reason}")]
    InvalidTransition {
        /// Entry whose status was to change.
        entry_id: Uuid,
        /// Status observed (or assumed) before the change.
        from: EntryStatus,
        /// Requested status.
        to: EntryStatus,
        /// Human-readable rule that was violated.
        reason: &'static str,
    },

    // ========== Referential Integrity Errors ==========
    /// A line references an account missing from the tenant's chart.
    #[error("line references unknown account {0}")]
    UnknownAccount(Uuid),

    /// Cost center still has child centers.
    #[error("cost center {0} has child cost centers")]
    CostCenterHasChildren(Uuid),

    /// Cost center still has allocations.
    #[error("cost center {0} has cost allocations")]
    CostCenterHasAllocations(Uuid),

    /// Store rejected a write because of a foreign key.
    #[error("referential integrity violation: {0}")]
    ForeignKeyViolation(String),

    // ========== Store Errors ==========
    /// Two writers allocated the same entry number twice in a row.
    #[error("entry number allocation conflicted for tenant {0}")]
    EntryNumberConflict(Uuid),

    /// Store failure, wrapped with the operation that hit it.
    #[error("store error during {context}: {message}")]
    Store {
        /// Operation being performed.
        context: &'static str,
        /// Underlying store message.
        message: String,
    },
}

impl LedgerError {
    /// Builds an [`LedgerError::InvalidTransition`] with the rule text for the
    /// attempted target status.
    #[must_use]
    pub fn invalid_transition(entry_id: Uuid, from: EntryStatus, to: EntryStatus) -> Self {
        let reason = match to {
            EntryStatus::Posted => "only draft entries can be posted",
            EntryStatus::Voided => "only posted entries can be voided",
            EntryStatus::Draft => "entries cannot return to draft",
        };
        Self::InvalidTransition {
            entry_id,
            from,
            to,
            reason,
        }
    }

    /// Returns the kind this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NoLines
            | Self::DualSidedLine { .. }
            | Self::NegativeAmount { .. }
            | Self::InvalidExchangeRate { .. }
            | Self::Unbalanced { .. }
            | Self::ZeroAmount
            | Self::MissingField(_)
            | Self::InvalidDateRange { .. }
            | Self::HierarchyCycle(_)
            | Self::DuplicateCode(_)
            | Self::NegativeBudget
            | Self::InvalidAllocationAmount
            | Self::EntryNotPosted(_) => ErrorKind::Validation,
            Self::AccountNotFound(_)
            | Self::EntryNotFound(_)
            | Self::LineNotFound(_)
            | Self::CostCenterNotFound(_) => ErrorKind::NotFound,
            Self::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            Self::UnknownAccount(_)
            | Self::CostCenterHasChildren(_)
            | Self::CostCenterHasAllocations(_)
            | Self::ForeignKeyViolation(_) => ErrorKind::ReferentialIntegrity,
            Self::EntryNumberConflict(_) | Self::Store { .. } => ErrorKind::Store,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NoLines => "NO_LINES",
            Self::DualSidedLine { .. } => "DUAL_SIDED_LINE",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::InvalidExchangeRate { .. } => "INVALID_EXCHANGE_RATE",
            Self::Unbalanced { .. } => "UNBALANCED_ENTRY",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::HierarchyCycle(_) => "HIERARCHY_CYCLE",
            Self::DuplicateCode(_) => "DUPLICATE_CODE",
            Self::NegativeBudget => "NEGATIVE_BUDGET",
            Self::InvalidAllocationAmount => "INVALID_ALLOCATION_AMOUNT",
            Self::EntryNotPosted(_) => "ENTRY_NOT_POSTED",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::LineNotFound(_) => "LINE_NOT_FOUND",
            Self::CostCenterNotFound(_) => "COST_CENTER_NOT_FOUND",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::UnknownAccount(_) => "UNKNOWN_ACCOUNT",
            Self::CostCenterHasChildren(_) => "COST_CENTER_HAS_CHILDREN",
            Self::CostCenterHasAllocations(_) => "COST_CENTER_HAS_ALLOCATIONS",
            Self::ForeignKeyViolation(_) => "FOREIGN_KEY_VIOLATION",
            Self::EntryNumberConflict(_) => "ENTRY_NUMBER_CONFLICT",
            Self::Store { .. } => "STORE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::DuplicateCode(_) | Self::EntryNumberConflict(_) => 409,
            _ => match self.kind() {
                ErrorKind::Validation => 400,
                ErrorKind::NotFound => 404,
                ErrorKind::InvalidTransition => 409,
                ErrorKind::ReferentialIntegrity => 422,
                ErrorKind::Store => 500,
            },
        }
    }

    /// Returns true if the caller may reasonably retry the operation.
    ///
    /// The engine itself never retries.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::EntryNumberConflict(_))
    }
}

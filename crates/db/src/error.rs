//! Conversion of store errors into ledger errors.

use sea_orm::{DbErr, SqlErr};
use tally_core::ledger::LedgerError;

/// Wraps a store error with the operation that produced it.
///
/// Foreign key rejections become referential integrity failures; everything
/// else is a store failure.
pub(crate) fn store_error(context: &'static str, err: DbErr) -> LedgerError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(message)) => {
            LedgerError::ForeignKeyViolation(message)
        }
        _ => LedgerError::Store {
            context,
            message: err.to_string(),
        },
    }
}

/// Returns true if the store rejected a write on a unique constraint.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Adds operation context to store results.
pub(crate) trait StoreResultExt<T> {
    /// Maps a `DbErr` into [`LedgerError`] with `context`.
    fn context(self, context: &'static str) -> Result<T, LedgerError>;
}

impl<T> StoreResultExt<T> for Result<T, DbErr> {
    fn context(self, context: &'static str) -> Result<T, LedgerError> {
        self.map_err(|err| store_error(context, err))
    }
}

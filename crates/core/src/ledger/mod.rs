//! Double-entry bookkeeping logic.
//!
//! This module implements the pure side of the ledger engine:
//! - Account types and normal-balance polarity
//! - Journal entry and line types, and the entry status machine
//! - Balance validation
//! - Line building with currency translation
//! - Reversal construction
//! - Entry numbering
//! - Error types for ledger operations

pub mod account;
pub mod balance;
pub mod error;
pub mod numbering;
pub mod reversal;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod reversal_props;
#[cfg(test)]
mod validation_props;

pub use account::{Account, AccountType, NewAccount, NormalBalance};
pub use balance::AccountBalance;
pub use error::{ErrorKind, LedgerError};
pub use numbering::EntryNumbering;
pub use reversal::{ReversalService, VOID_SOURCE_TYPE};
pub use service::LedgerService;
pub use types::{
    CreateEntryRequest, EntryFilter, EntryStatus, EntryTotals, JournalEntry, JournalLine,
    LineAmounts, LineDraft, LineInput, NewEntry,
};
pub use validation::validate_lines;

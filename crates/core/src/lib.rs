//! Ledger engine logic for Tally.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Domain types, validation rules, and calculations live here; the `tally-db`
//! crate persists them.
//!
//! # Modules
//!
//! - `ledger` - Accounts, journal entries, validation, reversal
//! - `reports` - Trial balance, balance sheet, income statement
//! - `cost_center` - Cost center budget tracking
//! - `hierarchy` - Parent/child cycle checks

pub mod cost_center;
pub mod hierarchy;
pub mod ledger;
pub mod reports;

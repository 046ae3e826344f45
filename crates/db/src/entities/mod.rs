//! `SeaORM` entities for the ledger tables.

pub mod accounts;
pub mod cost_allocations;
pub mod cost_centers;
pub mod journal_entries;
pub mod journal_lines;
pub mod sea_orm_active_enums;

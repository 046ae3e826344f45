//! Repository abstractions for data access.
//!
//! Every repository method takes the tenant explicitly and filters every
//! query on it; a record of another tenant is reported as not found.

pub mod account;
pub mod cost_center;
pub mod journal;
pub mod report;
mod reversal;

pub use account::AccountRepository;
pub use cost_center::CostCenterRepository;
pub use journal::JournalRepository;
pub use report::ReportRepository;

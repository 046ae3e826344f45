//! Cost center budget tracking.
//!
//! Cost centers are budget buckets that posted line amounts are allocated
//! to, independently of the chart of accounts.

pub mod service;
pub mod types;

pub use service::CostCenterService;
pub use types::*;

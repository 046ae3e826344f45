//! Financial statements derived from account balances.
//!
//! This module provides pure business logic for:
//! - Trial Balance
//! - Balance Sheet
//! - Income Statement

pub mod service;
pub mod types;


pub use service::ReportService;
pub use types::*;

//! Shared types and configuration for Tally.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - The tenant context threaded through every ledger operation
//! - Configuration management

pub mod config;
pub mod tenant;
pub mod types;

pub use config::AppConfig;
pub use tenant::TenantContext;

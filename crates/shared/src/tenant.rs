//! Tenant context.
//!
//! Every ledger operation is tenant-qualified. The context is passed
//! explicitly by the caller and never inferred from ambient state.

use serde::{Deserialize, Serialize};

use crate::types::TenantId;

/// Identity and reporting currency of the tenant an operation acts on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantContext {
    /// Tenant whose books are read or written.
    pub id: TenantId,
    /// ISO 4217 code of the tenant's base (reporting) currency.
    pub base_currency: String,
}

impl TenantContext {
    /// Creates a context for the given tenant and base currency.
    pub fn new(id: TenantId, base_currency: impl Into<String>) -> Self {
        Self {
            id,
            base_currency: base_currency.into(),
        }
    }
}

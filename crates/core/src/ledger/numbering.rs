//! Human-readable entry numbers.

use tally_shared::config::LedgerConfig;

/// Formats tenant-sequential entry numbers such as `JE-000042`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryNumbering {
    prefix: String,
    width: usize,
}

impl EntryNumbering {
    /// Creates a formatter with the given prefix and zero-padded width.
    pub fn new(prefix: impl Into<String>, width: usize) -> Self {
        Self {
            prefix: prefix.into(),
            width,
        }
    }

    /// Formats a sequence value.
    #[must_use]
    pub fn format(&self, sequence: i64) -> String {
        format!("{}{:0width$}", self.prefix, sequence, width = self.width)
    }

    /// Returns the sequence that follows the current tenant maximum.
    #[must_use]
    pub fn next_sequence(current_max: Option<i64>) -> i64 {
        current_max.unwrap_or(0) + 1
    }
}

impl Default for EntryNumbering {
    fn default() -> Self {
        Self::from(&LedgerConfig::default())
    }
}

impl From<&LedgerConfig> for EntryNumbering {
    fn from(config: &LedgerConfig) -> Self {
        Self::new(config.entry_number_prefix.clone(), config.entry_number_width)
    }
}

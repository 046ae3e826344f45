//! Reversal construction for voiding posted entries.
//!
//! A reversal is built as a new value from the original; the original entry
//! and its lines are only borrowed.

use chrono::NaiveDate;
use tally_shared::types::UserId;

use super::types::{JournalEntry, LineDraft, NewEntry};

/// Source type stamped on every reversal entry.
pub const VOID_SOURCE_TYPE: &str = "VOID";

/// Stateless service for creating reversing entries.
pub struct ReversalService;

impl ReversalService {
    /// Builds the reversing entry for `original`.
    ///
    /// Each line keeps its account, currency, rate and amounts; only the
    /// debit and credit roles are swapped. The result references the original
    /// through `source_type = "VOID"` and `source_id = original.id`.
    #[must_use]
    pub fn build_reversal(
        original: &JournalEntry,
        reason: &str,
        voided_by: UserId,
        reversal_date: NaiveDate,
    ) -> NewEntry {
        let lines = original
            .lines
            .iter()
            .map(|line| LineDraft {
                account_id: line.account_id,
                description: line.description.clone(),
                currency: line.currency.clone(),
                debit_amount: line.credit_amount,
                credit_amount: line.debit_amount,
                exchange_rate: line.exchange_rate,
                base_debit: line.base_credit,
                base_credit: line.base_debit,
            })
            .collect();

        NewEntry {
            entry_date: reversal_date,
            description: format!("Reversal of {}: {reason}", original.entry_number),
            reference: original.reference.clone(),
            source_type: Some(VOID_SOURCE_TYPE.to_string()),
            source_id: Some(original.id.into_inner()),
            created_by: voided_by,
            lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::{EntryStatus, JournalLine};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tally_shared::types::{AccountId, JournalEntryId, JournalLineId, TenantId};

    fn posted_entry(lines: &[(AccountId, Decimal, Decimal)]) -> JournalEntry {
        let id = JournalEntryId::new();
        JournalEntry {
            id,
            tenant_id: TenantId::new(),
            entry_number: "JE-000007".to_string(),
            entry_date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
            description: "Office supplies".to_string(),
            reference: Some("INV-42".to_string()),
            source_type: None,
            source_id: None,
            status: EntryStatus::Posted,
            posted_at: Some(Utc::now()),
            posted_by: Some(UserId::new()),
            voided_at: None,
            voided_by: None,
            void_reason: None,
            created_at: Utc::now(),
            created_by: UserId::new(),
            lines: lines
                .iter()
                .zip(1..)
                .map(|(&(account_id, debit, credit), line_number)| JournalLine {
                    id: JournalLineId::new(),
                    entry_id: id,
                    line_number,
                    account_id,
                    description: None,
                    currency: "USD".to_string(),
                    debit_amount: debit,
                    credit_amount: credit,
                    exchange_rate: dec!(0.5),
                    base_debit: debit * dec!(0.5),
                    base_credit: credit * dec!(0.5),
                })
                .collect(),
        }
    }

    #[test]
    fn test_swaps_each_line() {
        let (a, b) = (AccountId::new(), AccountId::new());
        let original = posted_entry(&[(a, dec!(100), dec!(0)), (b, dec!(0), dec!(100))]);
        let reversal = ReversalService::build_reversal(
            &original,
            "correction",
            UserId::new(),
            NaiveDate::from_ymd_opt(2026, 2, 11).unwrap(),
        );

        assert_eq!(reversal.lines[0].account_id, a);
        assert_eq!(reversal.lines[0].credit_amount, dec!(100));
        assert_eq!(reversal.lines[0].debit_amount, dec!(0));
        assert_eq!(reversal.lines[0].base_credit, dec!(50));
        assert_eq!(reversal.lines[1].account_id, b);
        assert_eq!(reversal.lines[1].debit_amount, dec!(100));
        assert_eq!(reversal.lines[1].base_debit, dec!(50));
        assert!(reversal.lines.iter().all(|l| l.currency == "USD" && l.exchange_rate == dec!(0.5)));
    }

    #[test]
    fn test_references_original() {
        let original = posted_entry(&[
            (AccountId::new(), dec!(10), dec!(0)),
            (AccountId::new(), dec!(0), dec!(10)),
        ]);
        let reversal = ReversalService::build_reversal(
            &original,
            "duplicate",
            UserId::new(),
            original.entry_date,
        );

        assert_eq!(reversal.source_type.as_deref(), Some(VOID_SOURCE_TYPE));
        assert_eq!(reversal.source_id, Some(original.id.into_inner()));
        assert_eq!(reversal.description, "Reversal of JE-000007: duplicate");
        assert_eq!(reversal.reference.as_deref(), Some("INV-42"));
    }

    #[test]
    fn test_original_untouched() {
        let original = posted_entry(&[
            (AccountId::new(), dec!(10), dec!(0)),
            (AccountId::new(), dec!(0), dec!(10)),
        ]);
        let snapshot = original.clone();
        let _ = ReversalService::build_reversal(&original, "x", UserId::new(), original.entry_date);
        assert_eq!(original, snapshot);
    }
}

//! Property-based tests for reversal symmetry.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::{AccountId, JournalEntryId, JournalLineId, TenantId, UserId};

use super::account::AccountType;
use super::reversal::ReversalService;
use super::types::{EntryStatus, JournalEntry, JournalLine, LineDraft};
use super::validation::validate_lines;

fn amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn entry_from(pairs: &[(Decimal, bool)]) -> JournalEntry {
    let id = JournalEntryId::new();
    let lines = pairs
        .iter()
        .zip(1..)
        .map(|(&(value, is_debit), line_number)| {
            let (debit, credit) = if is_debit {
                (value, Decimal::ZERO)
            } else {
                (Decimal::ZERO, value)
            };
            JournalLine {
                id: JournalLineId::new(),
                entry_id: id,
                line_number,
                account_id: AccountId::new(),
                description: None,
                currency: "EUR".to_string(),
                debit_amount: debit,
                credit_amount: credit,
                exchange_rate: Decimal::ONE,
                base_debit: debit,
                base_credit: credit,
            }
        })
        .collect();

    JournalEntry {
        id,
        tenant_id: TenantId::new(),
        entry_number: "JE-000001".to_string(),
        entry_date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
        description: "generated".to_string(),
        reference: None,
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
        lines,
    }
}

fn net(lines: &[LineDraft], account_type: AccountType) -> Vec<Decimal> {
    lines
        .iter()
        .map(|l| account_type.normal_balance().net(l.base_debit, l.base_credit))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// For any balanced original, the reversal balances too and each line's
    /// effect exactly cancels the original's.
    #[test]
    fn prop_reversal_cancels_original(
        debits in prop::collection::vec(amount(), 1..6),
    ) {
        let total: Decimal = debits.iter().copied().sum();
        let mut pairs: Vec<(Decimal, bool)> = debits.iter().map(|d| (*d, true)).collect();
        pairs.push((total, false));
        let original = entry_from(&pairs);

        let reversal = ReversalService::build_reversal(
            &original,
            "generated",
            UserId::new(),
            original.entry_date,
        );
        prop_assert!(validate_lines(&reversal.lines).is_ok());

        let original_effect: Vec<Decimal> = original
            .lines
            .iter()
            .map(|l| AccountType::Asset.normal_balance().net(l.base_debit, l.base_credit))
            .collect();
        let reversal_effect = net(&reversal.lines, AccountType::Asset);
        for (o, r) in original_effect.iter().zip(reversal_effect.iter()) {
            prop_assert_eq!(*o + *r, Decimal::ZERO);
        }
    }

    /// Each reversal line keeps the account and takes the opposite role.
    #[test]
    fn prop_reversal_swaps_roles(value in amount()) {
        let original = entry_from(&[(value, true), (value, false)]);
        let once = ReversalService::build_reversal(&original, "a", UserId::new(), original.entry_date);

        prop_assert_eq!(once.lines[0].credit_amount, original.lines[0].debit_amount);
        prop_assert_eq!(once.lines[1].debit_amount, original.lines[1].credit_amount);
        prop_assert_eq!(once.lines[0].account_id, original.lines[0].account_id);
    }
}

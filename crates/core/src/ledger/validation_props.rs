//! Property-based tests for entry validation and line building.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::TenantContext;
use tally_shared::types::{AccountId, TenantId, UserId};

use super::error::LedgerError;
use super::service::LedgerService;
use super::types::{CreateEntryRequest, LineInput};
use super::validation::validate_lines;

/// Amounts from 0.01 to 1,000,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Rates from 0.0001 to 10.0000.
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000i64).prop_map(|n| Decimal::new(n, 4))
}

fn tenant() -> TenantContext {
    TenantContext::new(TenantId::new(), "EUR")
}

fn request(lines: Vec<LineInput>) -> CreateEntryRequest {
    CreateEntryRequest {
        entry_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        description: "generated".to_string(),
        reference: None,
        source_type: None,
        source_id: None,
        created_by: UserId::new(),
        lines,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Splitting a debit total across any number of lines against a single
    /// matching credit always validates, with equal totals.
    #[test]
    fn prop_split_debits_balance(amounts in prop::collection::vec(positive_amount(), 1..8)) {
        let total: Decimal = amounts.iter().copied().sum();
        let mut lines: Vec<LineInput> = amounts
            .iter()
            .map(|a| LineInput::debit(AccountId::new(), *a))
            .collect();
        lines.push(LineInput::credit(AccountId::new(), total));

        let entry = LedgerService::prepare_entry(&tenant(), request(lines)).unwrap();
        let totals = validate_lines(&entry.lines).unwrap();
        prop_assert_eq!(totals.debits, totals.credits);
        prop_assert_eq!(totals.debits, total);
    }

    /// The same rate on both sides keeps a balanced entry balanced in base
    /// currency.
    #[test]
    fn prop_uniform_rate_preserves_balance(amount in positive_amount(), rate in positive_rate()) {
        let lines = vec![
            LineInput::debit(AccountId::new(), amount).in_currency("USD", rate),
            LineInput::credit(AccountId::new(), amount).in_currency("USD", rate),
        ];
        let entry = LedgerService::prepare_entry(&tenant(), request(lines)).unwrap();
        prop_assert_eq!(entry.lines[0].base_debit, entry.lines[1].base_credit);
    }

    /// Any difference between debit and credit totals is rejected and
    /// reported with both totals.
    #[test]
    fn prop_imbalance_rejected(debit in positive_amount(), credit in positive_amount()) {
        prop_assume!(debit != credit);
        let lines = vec![
            LineInput::debit(AccountId::new(), debit),
            LineInput::credit(AccountId::new(), credit),
        ];
        let result = LedgerService::prepare_entry(&tenant(), request(lines));
        match result {
            Err(LedgerError::Unbalanced { debits, credits }) => {
                prop_assert_eq!(debits, debit.normalize());
                prop_assert_eq!(credits, credit.normalize());
            }
            other => prop_assert!(false, "expected Unbalanced, got {:?}", other),
        }
    }

    /// A line with both sides set is rejected regardless of amounts.
    #[test]
    fn prop_dual_sided_rejected(a in positive_amount(), b in positive_amount()) {
        let mut line = LineInput::debit(AccountId::new(), a);
        line.credit_amount = b;
        let result = LedgerService::prepare_entry(&tenant(), request(vec![line]));
        prop_assert!(
            matches!(result, Err(LedgerError::DualSidedLine { line: 1 })),
            "expected DualSidedLine error"
        );
    }
}

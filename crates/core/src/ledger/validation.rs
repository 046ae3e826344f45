//! Journal entry balance rules.
//!
//! The same rules run against line drafts at creation and against persisted
//! lines at posting time. Balance is compared on base amounts with exact
//! decimal equality.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{EntryTotals, LineAmounts};

/// Validates a set of entry lines and returns their base totals.
///
/// Rules, checked in order:
/// 1. at least one line
/// 2. per line: not both debit and credit, neither negative, rate positive
/// 3. base debits equal base credits
/// 4. the entry is not all zeros
pub fn validate_lines<L: LineAmounts>(lines: &[L]) -> Result<EntryTotals, LedgerError> {
    if lines.is_empty() {
        return Err(LedgerError::NoLines);
    }

    let mut debits = Decimal::ZERO;
    let mut credits = Decimal::ZERO;

    for (index, line) in lines.iter().enumerate() {
        let position = index + 1;
        let (debit, credit) = (line.debit_amount(), line.credit_amount());

        if !debit.is_zero() && !credit.is_zero() {
            return Err(LedgerError::DualSidedLine { line: position });
        }
        if debit < Decimal::ZERO
            || credit < Decimal::ZERO
            || line.base_debit() < Decimal::ZERO
            || line.base_credit() < Decimal::ZERO
        {
            return Err(LedgerError::NegativeAmount { line: position });
        }
        if line.exchange_rate() <= Decimal::ZERO {
            return Err(LedgerError::InvalidExchangeRate { line: position });
        }

        debits += line.base_debit();
        credits += line.base_credit();
    }

    if debits != credits {
        return Err(LedgerError::Unbalanced {
            debits: debits.normalize(),
            credits: credits.normalize(),
        });
    }
    if debits.is_zero() {
        return Err(LedgerError::ZeroAmount);
    }

    Ok(EntryTotals { debits, credits })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::LineDraft;
    use rust_decimal_macros::dec;
    use tally_shared::types::AccountId;

    fn line(debit: Decimal, credit: Decimal) -> LineDraft {
        LineDraft {
            account_id: AccountId::new(),
            description: None,
            currency: "EUR".to_string(),
            debit_amount: debit,
            credit_amount: credit,
            exchange_rate: Decimal::ONE,
            base_debit: debit,
            base_credit: credit,
        }
    }

    #[test]
    fn test_balanced_entry() {
        let totals = validate_lines(&[line(dec!(100), dec!(0)), line(dec!(0), dec!(100))]).unwrap();
        assert_eq!(totals.debits, dec!(100));
        assert_eq!(totals.credits, dec!(100));
    }

    #[test]
    fn test_multi_line_balanced_entry() {
        let lines = [
            line(dec!(60), dec!(0)),
            line(dec!(40), dec!(0)),
            line(dec!(0), dec!(100)),
        ];
        assert!(validate_lines(&lines).is_ok());
    }

    #[test]
    fn test_no_lines() {
        assert!(matches!(
            validate_lines::<LineDraft>(&[]),
            Err(LedgerError::NoLines)
        ));
    }

    #[test]
    fn test_unbalanced_message() {
        let err = validate_lines(&[line(dec!(100), dec!(0)), line(dec!(0), dec!(50))]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "journal entry does not balance: debits=100, credits=50"
        );
    }

    #[test]
    fn test_dual_sided_line() {
        let err = validate_lines(&[line(dec!(10), dec!(10))]).unwrap_err();
        assert!(matches!(err, LedgerError::DualSidedLine { line: 1 }));
    }

    #[test]
    fn test_negative_amount() {
        let err = validate_lines(&[line(dec!(0), dec!(100)), line(dec!(-100), dec!(0))]).unwrap_err();
        assert!(matches!(err, LedgerError::NegativeAmount { line: 2 }));
    }

    #[test]
    fn test_all_zero_entry() {
        let err = validate_lines(&[line(dec!(0), dec!(0)), line(dec!(0), dec!(0))]).unwrap_err();
        assert!(matches!(err, LedgerError::ZeroAmount));
    }

    #[test]
    fn test_non_positive_rate() {
        let mut bad = line(dec!(100), dec!(0));
        bad.exchange_rate = dec!(0);
        let err = validate_lines(&[bad, line(dec!(0), dec!(100))]).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidExchangeRate { line: 1 }));
    }

    #[test]
    fn test_balance_is_exact() {
        let lines = [line(dec!(100.00000001), dec!(0)), line(dec!(0), dec!(100))];
        assert!(matches!(
            validate_lines(&lines),
            Err(LedgerError::Unbalanced { .. })
        ));
    }
}

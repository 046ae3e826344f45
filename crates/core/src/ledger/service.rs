//! Ledger service: turns caller requests into validated, persistable entries.

use rust_decimal::Decimal;
use tally_shared::TenantContext;

use super::error::LedgerError;
use super::types::{CreateEntryRequest, LineDraft, LineInput, NewEntry};
use super::validation::validate_lines;

/// Fractional digits kept for base-currency amounts; matches the store's
/// amount column scale.
pub const BASE_AMOUNT_SCALE: u32 = 8;

/// Ledger service for entry preparation.
pub struct LedgerService;

impl LedgerService {
    /// Resolves a request into a validated [`NewEntry`].
    ///
    /// Currency defaults to the tenant base currency and the exchange rate to
    /// 1. Base amounts are `amount * rate`, rounded to [`BASE_AMOUNT_SCALE`]
    /// places. Nothing is returned unless the resulting lines balance.
    pub fn prepare_entry(
        tenant: &TenantContext,
        request: CreateEntryRequest,
    ) -> Result<NewEntry, LedgerError> {
        if request.description.trim().is_empty() {
            return Err(LedgerError::MissingField("description"));
        }

        let lines = request
            .lines
            .into_iter()
            .enumerate()
            .map(|(index, input)| Self::build_line(tenant, index + 1, input))
            .collect::<Result<Vec<_>, _>>()?;

        validate_lines(&lines)?;

        Ok(NewEntry {
            entry_date: request.entry_date,
            description: request.description,
            reference: request.reference,
            source_type: request.source_type,
            source_id: request.source_id,
            created_by: request.created_by,
            lines,
        })
    }

    /// Resolves one line input.
    pub fn build_line(
        tenant: &TenantContext,
        position: usize,
        input: LineInput,
    ) -> Result<LineDraft, LedgerError> {
        let currency = input
            .currency
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| tenant.base_currency.clone());
        let exchange_rate = input.exchange_rate.unwrap_or(Decimal::ONE);
        if exchange_rate <= Decimal::ZERO {
            return Err(LedgerError::InvalidExchangeRate { line: position });
        }

        Ok(LineDraft {
            account_id: input.account_id,
            description: input.description,
            currency,
            debit_amount: input.debit_amount,
            credit_amount: input.credit_amount,
            exchange_rate,
            base_debit: to_base(input.debit_amount, exchange_rate),
            base_credit: to_base(input.credit_amount, exchange_rate),
        })
    }
}

fn to_base(amount: Decimal, rate: Decimal) -> Decimal {
    (amount * rate).round_dp(BASE_AMOUNT_SCALE)
}

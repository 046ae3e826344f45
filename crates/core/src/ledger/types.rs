//! Journal entry domain types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{AccountId, JournalEntryId, JournalLineId, TenantId, UserId};
use uuid::Uuid;

/// Journal entry lifecycle status.
///
/// ```text
/// DRAFT --post--> POSTED --void--> VOIDED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    /// Created, not yet visible to reports.
    Draft,
    /// Visible to reports, immutable.
    Posted,
    /// Neutralized by a reversal entry. Terminal.
    Voided,
}

impl EntryStatus {
    /// Returns true if moving from `self` to `to` is a legal transition.
    #[must_use]
    pub const fn can_transition_to(self, to: Self) -> bool {
        matches!((self, to), (Self::Draft, Self::Posted) | (Self::Posted, Self::Voided))
    }

    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Posted => "POSTED",
            Self::Voided => "VOIDED",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DRAFT" => Ok(Self::Draft),
            "POSTED" => Ok(Self::Posted),
            "VOIDED" => Ok(Self::Voided),
            other => Err(format!("unknown entry status: {other}")),
        }
    }
}

/// Amount accessors shared by line drafts and persisted lines, so the same
/// validation runs at creation and at posting.
pub trait LineAmounts {
    /// Debit in transaction currency.
    fn debit_amount(&self) -> Decimal;
    /// Credit in transaction currency.
    fn credit_amount(&self) -> Decimal;
    /// Transaction currency to base currency rate.
    fn exchange_rate(&self) -> Decimal;
    /// Debit in base currency.
    fn base_debit(&self) -> Decimal;
    /// Credit in base currency.
    fn base_credit(&self) -> Decimal;
}

/// A persisted journal entry with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Entry identifier.
    pub id: JournalEntryId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Tenant-sequential human-readable number.
    pub entry_number: String,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Narrative.
    pub description: String,
    /// External reference.
    pub reference: Option<String>,
    /// Kind of originating document, e.g. `INVOICE` or `VOID`.
    pub source_type: Option<String>,
    /// Identifier of the originating document.
    pub source_id: Option<Uuid>,
    /// Lifecycle status.
    pub status: EntryStatus,
    /// When the entry was posted.
    pub posted_at: Option<DateTime<Utc>>,
    /// Who posted the entry.
    pub posted_by: Option<UserId>,
    /// When the entry was voided.
    pub voided_at: Option<DateTime<Utc>>,
    /// Who voided the entry.
    pub voided_by: Option<UserId>,
    /// Why the entry was voided.
    pub void_reason: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Creator.
    pub created_by: UserId,
    /// Lines in entry order.
    pub lines: Vec<JournalLine>,
}

/// A persisted journal entry line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Line identifier.
    pub id: JournalLineId,
    /// Owning entry.
    pub entry_id: JournalEntryId,
    /// 1-based position within the entry.
    pub line_number: i32,
    /// Account posted to.
    pub account_id: AccountId,
    /// Line narrative.
    pub description: Option<String>,
    /// Transaction currency.
    pub currency: String,
    /// Debit in transaction currency.
    pub debit_amount: Decimal,
    /// Credit in transaction currency.
    pub credit_amount: Decimal,
    /// Transaction currency to base currency rate.
    pub exchange_rate: Decimal,
    /// Debit in base currency.
    pub base_debit: Decimal,
    /// Credit in base currency.
    pub base_credit: Decimal,
}

impl LineAmounts for JournalLine {
    fn debit_amount(&self) -> Decimal {
        self.debit_amount
    }
    fn credit_amount(&self) -> Decimal {
        self.credit_amount
    }
    fn exchange_rate(&self) -> Decimal {
        self.exchange_rate
    }
    fn base_debit(&self) -> Decimal {
        self.base_debit
    }
    fn base_credit(&self) -> Decimal {
        self.base_credit
    }
}

/// Caller input for one line of a new entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineInput {
    /// Account to post to.
    pub account_id: AccountId,
    /// Line narrative.
    pub description: Option<String>,
    /// Debit in transaction currency.
    pub debit_amount: Decimal,
    /// Credit in transaction currency.
    pub credit_amount: Decimal,
    /// Transaction currency; the tenant base currency when absent.
    pub currency: Option<String>,
    /// Rate to base currency; 1 when absent.
    pub exchange_rate: Option<Decimal>,
}

impl LineInput {
    /// A debit line in base currency.
    #[must_use]
    pub const fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            description: None,
            debit_amount: amount,
            credit_amount: Decimal::ZERO,
            currency: None,
            exchange_rate: None,
        }
    }

    /// A credit line in base currency.
    #[must_use]
    pub const fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            description: None,
            debit_amount: Decimal::ZERO,
            credit_amount: amount,
            currency: None,
            exchange_rate: None,
        }
    }

    /// Sets the transaction currency and its rate to base currency.
    #[must_use]
    pub fn in_currency(mut self, currency: impl Into<String>, exchange_rate: Decimal) -> Self {
        self.currency = Some(currency.into());
        self.exchange_rate = Some(exchange_rate);
        self
    }

    /// Sets the line narrative.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Caller request to create a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEntryRequest {
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Narrative.
    pub description: String,
    /// External reference.
    pub reference: Option<String>,
    /// Kind of originating document.
    pub source_type: Option<String>,
    /// Identifier of the originating document.
    pub source_id: Option<Uuid>,
    /// Creator.
    pub created_by: UserId,
    /// Lines in entry order.
    pub lines: Vec<LineInput>,
}

/// A fully resolved line ready to persist: currency and rate filled in,
/// base amounts computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDraft {
    /// Account to post to.
    pub account_id: AccountId,
    /// Line narrative.
    pub description: Option<String>,
    /// Transaction currency.
    pub currency: String,
    /// Debit in transaction currency.
    pub debit_amount: Decimal,
    /// Credit in transaction currency.
    pub credit_amount: Decimal,
    /// Rate to base currency.
    pub exchange_rate: Decimal,
    /// Debit in base currency.
    pub base_debit: Decimal,
    /// Credit in base currency.
    pub base_credit: Decimal,
}

impl LineAmounts for LineDraft {
    fn debit_amount(&self) -> Decimal {
        self.debit_amount
    }
    fn credit_amount(&self) -> Decimal {
        self.credit_amount
    }
    fn exchange_rate(&self) -> Decimal {
        self.exchange_rate
    }
    fn base_debit(&self) -> Decimal {
        self.base_debit
    }
    fn base_credit(&self) -> Decimal {
        self.base_credit
    }
}

/// A validated entry ready to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Narrative.
    pub description: String,
    /// External reference.
    pub reference: Option<String>,
    /// Kind of originating document.
    pub source_type: Option<String>,
    /// Identifier of the originating document.
    pub source_id: Option<Uuid>,
    /// Creator.
    pub created_by: UserId,
    /// Lines in entry order.
    pub lines: Vec<LineDraft>,
}

/// Criteria for listing journal entries. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFilter {
    /// Only entries in this status.
    pub status: Option<EntryStatus>,
    /// Only entries dated on or after this date.
    pub from: Option<NaiveDate>,
    /// Only entries dated on or before this date.
    pub to: Option<NaiveDate>,
    /// Only entries from this kind of source document.
    pub source_type: Option<String>,
    /// Only entries from this source document.
    pub source_id: Option<Uuid>,
}

/// Base-currency totals of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryTotals {
    /// Sum of base debits.
    pub debits: Decimal,
    /// Sum of base credits.
    pub credits: Decimal,
}

//! String-backed enums stored in ledger tables.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use tally_core::cost_center::BudgetPeriod as CoreBudgetPeriod;
use tally_core::ledger::{AccountType as CoreAccountType, EntryStatus as CoreEntryStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum AccountType {
    #[sea_orm(string_value = "ASSET")]
    Asset,
    #[sea_orm(string_value = "LIABILITY")]
    Liability,
    #[sea_orm(string_value = "EQUITY")]
    Equity,
    #[sea_orm(string_value = "REVENUE")]
    Revenue,
    #[sea_orm(string_value = "EXPENSE")]
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum EntryStatus {
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    #[sea_orm(string_value = "POSTED")]
    Posted,
    #[sea_orm(string_value = "VOIDED")]
    Voided,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum BudgetPeriod {
    #[sea_orm(string_value = "MONTHLY")]
    Monthly,
    #[sea_orm(string_value = "QUARTERLY")]
    Quarterly,
    #[sea_orm(string_value = "ANNUAL")]
    Annual,
}

impl From<CoreAccountType> for AccountType {
    fn from(value: CoreAccountType) -> Self {
        match value {
            CoreAccountType::Asset => Self::Asset,
            CoreAccountType::Liability => Self::Liability,
            CoreAccountType::Equity => Self::Equity,
            CoreAccountType::Revenue => Self::Revenue,
            CoreAccountType::Expense => Self::Expense,
        }
    }
}

impl From<AccountType> for CoreAccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Revenue => Self::Revenue,
            AccountType::Expense => Self::Expense,
        }
    }
}

impl From<CoreEntryStatus> for EntryStatus {
    fn from(value: CoreEntryStatus) -> Self {
        match value {
            CoreEntryStatus::Draft => Self::Draft,
            CoreEntryStatus::Posted => Self::Posted,
            CoreEntryStatus::Voided => Self::Voided,
        }
    }
}

impl From<EntryStatus> for CoreEntryStatus {
    fn from(value: EntryStatus) -> Self {
        match value {
            EntryStatus::Draft => Self::Draft,
            EntryStatus::Posted => Self::Posted,
            EntryStatus::Voided => Self::Voided,
        }
    }
}

impl From<CoreBudgetPeriod> for BudgetPeriod {
    fn from(value: CoreBudgetPeriod) -> Self {
        match value {
            CoreBudgetPeriod::Monthly => Self::Monthly,
            CoreBudgetPeriod::Quarterly => Self::Quarterly,
            CoreBudgetPeriod::Annual => Self::Annual,
        }
    }
}

impl From<BudgetPeriod> for CoreBudgetPeriod {
    fn from(value: BudgetPeriod) -> Self {
        match value {
            BudgetPeriod::Monthly => Self::Monthly,
            BudgetPeriod::Quarterly => Self::Quarterly,
            BudgetPeriod::Annual => Self::Annual,
        }
    }
}

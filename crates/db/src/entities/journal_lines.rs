//! `SeaORM` Entity for the journal_lines table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub entry_id: Uuid,
    pub line_number: i32,
    pub account_id: Uuid,
    pub description: Option<String>,
    pub currency: String,
    #[sea_orm(column_type = "Decimal(Some((28, 8)))")]
    pub debit_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((28, 8)))")]
    pub credit_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((28, 8)))")]
    pub exchange_rate: Decimal,
    #[sea_orm(column_type = "Decimal(Some((28, 8)))")]
    pub base_debit: Decimal,
    #[sea_orm(column_type = "Decimal(Some((28, 8)))")]
    pub base_credit: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::journal_entries::Entity",
        from = "Column::EntryId",
        to = "super::journal_entries::Column::Id"
    )]
    JournalEntry,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Account,
}

impl Related<super::journal_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntry.def()
    }
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for tally_core::ledger::JournalLine {
    fn from(model: Model) -> Self {
        Self {
            id: model.id.into(),
            entry_id: model.entry_id.into(),
            line_number: model.line_number,
            account_id: model.account_id.into(),
            description: model.description,
            currency: model.currency,
            debit_amount: model.debit_amount,
            credit_amount: model.credit_amount,
            exchange_rate: model.exchange_rate,
            base_debit: model.base_debit,
            base_credit: model.base_credit,
        }
    }
}

//! `SeaORM` Entity for the accounts table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::AccountType;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub code: String,
    pub name: String,
    pub account_type: AccountType,
    pub parent_id: Option<Uuid>,
    pub is_active: bool,
    pub is_system: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::journal_lines::Entity")]
    JournalLines,
}

impl Related<super::journal_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for tally_core::ledger::Account {
    fn from(model: Model) -> Self {
        Self {
            id: model.id.into(),
            tenant_id: model.tenant_id.into(),
            code: model.code,
            name: model.name,
            account_type: model.account_type.into(),
            parent_id: model.parent_id.map(Into::into),
            is_active: model.is_active,
            is_system: model.is_system,
            created_at: model.created_at,
        }
    }
}

//! `SeaORM` Entity for the cost_allocations table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cost_allocations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub cost_center_id: Uuid,
    pub journal_line_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((28, 8)))")]
    pub amount: Decimal,
    pub allocation_date: Date,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cost_centers::Entity",
        from = "Column::CostCenterId",
        to = "super::cost_centers::Column::Id"
    )]
    CostCenter,
    #[sea_orm(
        belongs_to = "super::journal_lines::Entity",
        from = "Column::JournalLineId",
        to = "super::journal_lines::Column::Id"
    )]
    JournalLine,
}

impl Related<super::cost_centers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CostCenter.def()
    }
}

impl Related<super::journal_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalLine.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for tally_core::cost_center::CostAllocation {
    fn from(model: Model) -> Self {
        Self {
            id: model.id.into(),
            tenant_id: model.tenant_id.into(),
            cost_center_id: model.cost_center_id.into(),
            journal_line_id: model.journal_line_id.into(),
            amount: model.amount,
            allocation_date: model.allocation_date,
            created_at: model.created_at,
        }
    }
}

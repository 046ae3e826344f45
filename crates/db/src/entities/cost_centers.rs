//! `SeaORM` Entity for the cost_centers table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::BudgetPeriod;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cost_centers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub code: String,
    pub name: String,
    pub parent_id: Option<Uuid>,
    #[sea_orm(column_type = "Decimal(Some((28, 8)))", nullable)]
    pub budget_amount: Option<Decimal>,
    pub budget_period: BudgetPeriod,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cost_allocations::Entity")]
    CostAllocations,
}

impl Related<super::cost_allocations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CostAllocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for tally_core::cost_center::CostCenter {
    fn from(model: Model) -> Self {
        Self {
            id: model.id.into(),
            tenant_id: model.tenant_id.into(),
            code: model.code,
            name: model.name,
            parent_id: model.parent_id.map(Into::into),
            budget_amount: model.budget_amount,
            budget_period: model.budget_period.into(),
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

//! `SeaORM` Entity for the journal_entries table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::EntryStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    /// Numeric part of `entry_number`, unique per tenant.
    pub sequence: i64,
    pub entry_number: String,
    pub entry_date: Date,
    pub description: String,
    pub reference: Option<String>,
    pub source_type: Option<String>,
    pub source_id: Option<Uuid>,
    pub status: EntryStatus,
    pub posted_at: Option<DateTimeUtc>,
    pub posted_by: Option<Uuid>,
    pub voided_at: Option<DateTimeUtc>,
    pub voided_by: Option<Uuid>,
    pub void_reason: Option<String>,
    pub created_at: DateTimeUtc,
    pub created_by: Uuid,
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

impl Model {
    /// Converts into the domain entry with the given lines.
    pub fn into_entry(
        self,
        lines: Vec<super::journal_lines::Model>,
    ) -> tally_core::ledger::JournalEntry {
        tally_core::ledger::JournalEntry {
            id: self.id.into(),
            tenant_id: self.tenant_id.into(),
            entry_number: self.entry_number,
            entry_date: self.entry_date,
            description: self.description,
            reference: self.reference,
            source_type: self.source_type,
            source_id: self.source_id,
            status: self.status.into(),
            posted_at: self.posted_at,
            posted_by: self.posted_by.map(Into::into),
            voided_at: self.voided_at,
            voided_by: self.voided_by.map(Into::into),
            void_reason: self.void_reason,
            created_at: self.created_at,
            created_by: self.created_by.into(),
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

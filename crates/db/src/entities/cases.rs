//! `SeaORM` Entity for the cases table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{CaseStatus, CaseType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Human-readable case number in the `NNNN/YYYY` format.
    pub case_number: String,
    pub case_type: CaseType,
    pub status: CaseStatus,
    pub taxpayer_name: String,
    pub taxpayer_document: String,
    pub original_value: Decimal,
    pub negotiated_value: Option<Decimal>,
    pub opened_on: Date,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::decisions::Entity")]
    Decisions,
    #[sea_orm(has_many = "super::docket_entries::Entity")]
    DocketEntries,
    #[sea_orm(has_many = "super::agreements::Entity")]
    Agreements,
}

impl Related<super::decisions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Decisions.def()
    }
}

impl Related<super::docket_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DocketEntries.def()
    }
}

impl Related<super::agreements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Agreements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

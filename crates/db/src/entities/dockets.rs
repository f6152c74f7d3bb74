//! `SeaORM` Entity for the dockets table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "dockets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub docket_number: String,
    pub scheduled_for: Date,
    pub session_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::judgment_sessions::Entity",
        from = "Column::SessionId",
        to = "super::judgment_sessions::Column::Id"
    )]
    JudgmentSessions,
    #[sea_orm(has_many = "super::docket_entries::Entity")]
    DocketEntries,
}

impl Related<super::judgment_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JudgmentSessions.def()
    }
}

impl Related<super::docket_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DocketEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! `SeaORM` Entity for the decisions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::DecisionOutcome;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "decisions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub case_id: Uuid,
    pub session_id: Option<Uuid>,
    pub outcome: DecisionOutcome,
    pub decided_on: Date,
    pub summary: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cases::Entity",
        from = "Column::CaseId",
        to = "super::cases::Column::Id"
    )]
    Cases,
    #[sea_orm(
        belongs_to = "super::judgment_sessions::Entity",
        from = "Column::SessionId",
        to = "super::judgment_sessions::Column::Id"
    )]
    JudgmentSessions,
}

impl Related<super::cases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cases.def()
    }
}

impl Related<super::judgment_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JudgmentSessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! `SeaORM` Entity for the agreements table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::AgreementStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "agreements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub case_id: Uuid,
    /// Sequential year-scoped term number in the `NNNN/YYYY` format.
    pub term_number: String,
    pub status: AgreementStatus,
    pub signing_date: Date,
    pub first_due_date: Date,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cases::Entity",
        from = "Column::CaseId",
        to = "super::cases::Column::Id"
    )]
    Cases,
    #[sea_orm(has_one = "super::agreement_compensation_details::Entity")]
    CompensationDetails,
    #[sea_orm(has_one = "super::agreement_dacao_details::Entity")]
    DacaoDetails,
    #[sea_orm(has_one = "super::agreement_transaction_details::Entity")]
    TransactionDetails,
    #[sea_orm(has_many = "super::agreement_registrations::Entity")]
    Registrations,
    #[sea_orm(has_many = "super::agreement_credits::Entity")]
    Credits,
    #[sea_orm(has_many = "super::installments::Entity")]
    Installments,
}

impl Related<super::cases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cases.def()
    }
}

impl Related<super::agreement_compensation_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompensationDetails.def()
    }
}

impl Related<super::agreement_dacao_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DacaoDetails.def()
    }
}

impl Related<super::agreement_transaction_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionDetails.def()
    }
}

impl Related<super::agreement_registrations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registrations.def()
    }
}

impl Related<super::agreement_credits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Credits.def()
    }
}

impl Related<super::installments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Installments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

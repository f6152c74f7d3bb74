//! `SeaORM` Entity for the installment_payments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "installment_payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub installment_id: Uuid,
    pub amount: Decimal,
    pub paid_on: Date,
    pub method: Option<String>,
    pub receipt_number: Option<String>,
    pub observations: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::installments::Entity",
        from = "Column::InstallmentId",
        to = "super::installments::Column::Id"
    )]
    Installments,
}

impl Related<super::installments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Installments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

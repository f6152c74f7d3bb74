//! `SeaORM` entity definitions for the conciliation board schema.

pub mod agreement_compensation_details;
pub mod agreement_credits;
pub mod agreement_dacao_details;
pub mod agreement_registrations;
pub mod agreement_transaction_details;
pub mod agreements;
pub mod cases;
pub mod decisions;
pub mod docket_entries;
pub mod dockets;
pub mod installment_payments;
pub mod installments;
pub mod judgment_sessions;
pub mod registration_debts;
pub mod sea_orm_active_enums;

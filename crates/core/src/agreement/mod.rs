//! Agreement (acordo) value resolution and installment schedules.
//!
//! This module implements the post-judgment settlement logic:
//! - Type-specific agreement detail sub-records as a sum type
//! - Value resolution (original, final, discount) per case type
//! - Installment schedule generation with drift-absorbing rounding
//! - Error types for agreement operations

pub mod error;
pub mod resolver;
pub mod schedule;
pub mod types;

#[cfg(test)]
mod schedule_props;

pub use error::AgreementError;
pub use resolver::ValueResolver;
pub use schedule::ScheduleGenerator;
pub use types::{
    AgreementDetail, AgreementStatus, CompensationDetail, DacaoDetail, DebtLine, InstallmentStatus,
    InstallmentType, PaymentMethod, RegistrationPurpose, ResolvedValues, ScheduleInput,
    ScheduledInstallment, TransactionDetail,
};

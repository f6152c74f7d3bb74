//! `SeaORM` active enums mirroring the Postgres enum types.
//!
//! Each enum converts to and from its `concilia-core` counterpart so the
//! repositories can hand plain domain values to the core services.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use concilia_core::agreement;
use concilia_core::case;

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "case_type")]
pub enum CaseType {
    #[sea_orm(string_value = "compensation")]
    Compensation,
    #[sea_orm(string_value = "dacao")]
    Dacao,
    #[sea_orm(string_value = "exceptional_transaction")]
    ExceptionalTransaction,
}

impl From<case::CaseType> for CaseType {
    fn from(value: case::CaseType) -> Self {
        match value {
            case::CaseType::Compensation => Self::Compensation,
            case::CaseType::Dacao => Self::Dacao,
            case::CaseType::ExceptionalTransaction => Self::ExceptionalTransaction,
        }
    }
}

impl From<CaseType> for case::CaseType {
    fn from(value: CaseType) -> Self {
        match value {
            CaseType::Compensation => Self::Compensation,
            CaseType::Dacao => Self::Dacao,
            CaseType::ExceptionalTransaction => Self::ExceptionalTransaction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "case_status")]
pub enum CaseStatus {
    #[sea_orm(string_value = "intake")]
    Intake,
    #[sea_orm(string_value = "under_analysis")]
    UnderAnalysis,
    #[sea_orm(string_value = "scheduled")]
    Scheduled,
    #[sea_orm(string_value = "judged")]
    Judged,
    #[sea_orm(string_value = "agreement_in_effect")]
    AgreementInEffect,
    #[sea_orm(string_value = "suspended")]
    Suspended,
    #[sea_orm(string_value = "concluded")]
    Concluded,
    #[sea_orm(string_value = "archived")]
    Archived,
}

impl From<case::CaseStatus> for CaseStatus {
    fn from(value: case::CaseStatus) -> Self {
        match value {
            case::CaseStatus::Intake => Self::Intake,
            case::CaseStatus::UnderAnalysis => Self::UnderAnalysis,
            case::CaseStatus::Scheduled => Self::Scheduled,
            case::CaseStatus::Judged => Self::Judged,
            case::CaseStatus::AgreementInEffect => Self::AgreementInEffect,
            case::CaseStatus::Suspended => Self::Suspended,
            case::CaseStatus::Concluded => Self::Concluded,
            case::CaseStatus::Archived => Self::Archived,
        }
    }
}

impl From<CaseStatus> for case::CaseStatus {
    fn from(value: CaseStatus) -> Self {
        match value {
            CaseStatus::Intake => Self::Intake,
            CaseStatus::UnderAnalysis => Self::UnderAnalysis,
            CaseStatus::Scheduled => Self::Scheduled,
            CaseStatus::Judged => Self::Judged,
            CaseStatus::AgreementInEffect => Self::AgreementInEffect,
            CaseStatus::Suspended => Self::Suspended,
            CaseStatus::Concluded => Self::Concluded,
            CaseStatus::Archived => Self::Archived,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "decision_outcome")]
pub enum DecisionOutcome {
    #[sea_orm(string_value = "granted")]
    Granted,
    #[sea_orm(string_value = "partially_granted")]
    PartiallyGranted,
    #[sea_orm(string_value = "denied")]
    Denied,
}

impl From<case::DecisionOutcome> for DecisionOutcome {
    fn from(value: case::DecisionOutcome) -> Self {
        match value {
            case::DecisionOutcome::Granted => Self::Granted,
            case::DecisionOutcome::PartiallyGranted => Self::PartiallyGranted,
            case::DecisionOutcome::Denied => Self::Denied,
        }
    }
}

impl From<DecisionOutcome> for case::DecisionOutcome {
    fn from(value: DecisionOutcome) -> Self {
        match value {
            DecisionOutcome::Granted => Self::Granted,
            DecisionOutcome::PartiallyGranted => Self::PartiallyGranted,
            DecisionOutcome::Denied => Self::Denied,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "agreement_status")]
pub enum AgreementStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "fulfilled")]
    Fulfilled,
    #[sea_orm(string_value = "expired")]
    Expired,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "renegotiated")]
    Renegotiated,
}

impl From<agreement::AgreementStatus> for AgreementStatus {
    fn from(value: agreement::AgreementStatus) -> Self {
        match value {
            agreement::AgreementStatus::Active => Self::Active,
            agreement::AgreementStatus::Fulfilled => Self::Fulfilled,
            agreement::AgreementStatus::Expired => Self::Expired,
            agreement::AgreementStatus::Cancelled => Self::Cancelled,
            agreement::AgreementStatus::Renegotiated => Self::Renegotiated,
        }
    }
}

impl From<AgreementStatus> for agreement::AgreementStatus {
    fn from(value: AgreementStatus) -> Self {
        match value {
            AgreementStatus::Active => Self::Active,
            AgreementStatus::Fulfilled => Self::Fulfilled,
            AgreementStatus::Expired => Self::Expired,
            AgreementStatus::Cancelled => Self::Cancelled,
            AgreementStatus::Renegotiated => Self::Renegotiated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "lump_sum")]
    LumpSum,
    #[sea_orm(string_value = "installments")]
    Installments,
}

impl From<agreement::PaymentMethod> for PaymentMethod {
    fn from(value: agreement::PaymentMethod) -> Self {
        match value {
            agreement::PaymentMethod::LumpSum => Self::LumpSum,
            agreement::PaymentMethod::Installments => Self::Installments,
        }
    }
}

impl From<PaymentMethod> for agreement::PaymentMethod {
    fn from(value: PaymentMethod) -> Self {
        match value {
            PaymentMethod::LumpSum => Self::LumpSum,
            PaymentMethod::Installments => Self::Installments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "installment_type")]
pub enum InstallmentType {
    #[sea_orm(string_value = "entry")]
    Entry,
    #[sea_orm(string_value = "agreement_installment")]
    AgreementInstallment,
    #[sea_orm(string_value = "fee_installment")]
    FeeInstallment,
}

impl From<agreement::InstallmentType> for InstallmentType {
    fn from(value: agreement::InstallmentType) -> Self {
        match value {
            agreement::InstallmentType::Entry => Self::Entry,
            agreement::InstallmentType::AgreementInstallment => Self::AgreementInstallment,
            agreement::InstallmentType::FeeInstallment => Self::FeeInstallment,
        }
    }
}

impl From<InstallmentType> for agreement::InstallmentType {
    fn from(value: InstallmentType) -> Self {
        match value {
            InstallmentType::Entry => Self::Entry,
            InstallmentType::AgreementInstallment => Self::AgreementInstallment,
            InstallmentType::FeeInstallment => Self::FeeInstallment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "installment_status")]
pub enum InstallmentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "overdue")]
    Overdue,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl From<agreement::InstallmentStatus> for InstallmentStatus {
    fn from(value: agreement::InstallmentStatus) -> Self {
        match value {
            agreement::InstallmentStatus::Pending => Self::Pending,
            agreement::InstallmentStatus::Paid => Self::Paid,
            agreement::InstallmentStatus::Overdue => Self::Overdue,
            agreement::InstallmentStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<InstallmentStatus> for agreement::InstallmentStatus {
    fn from(value: InstallmentStatus) -> Self {
        match value {
            InstallmentStatus::Pending => Self::Pending,
            InstallmentStatus::Paid => Self::Paid,
            InstallmentStatus::Overdue => Self::Overdue,
            InstallmentStatus::Cancelled => Self::Cancelled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "registration_purpose")]
pub enum RegistrationPurpose {
    #[sea_orm(string_value = "included_in_agreement")]
    IncludedInAgreement,
    #[sea_orm(string_value = "offered_for_compensation")]
    OfferedForCompensation,
    #[sea_orm(string_value = "offered_for_dacao")]
    OfferedForDacao,
}

impl From<agreement::RegistrationPurpose> for RegistrationPurpose {
    fn from(value: agreement::RegistrationPurpose) -> Self {
        match value {
            agreement::RegistrationPurpose::IncludedInAgreement => Self::IncludedInAgreement,
            agreement::RegistrationPurpose::OfferedForCompensation => Self::OfferedForCompensation,
            agreement::RegistrationPurpose::OfferedForDacao => Self::OfferedForDacao,
        }
    }
}

impl From<RegistrationPurpose> for agreement::RegistrationPurpose {
    fn from(value: RegistrationPurpose) -> Self {
        match value {
            RegistrationPurpose::IncludedInAgreement => Self::IncludedInAgreement,
            RegistrationPurpose::OfferedForCompensation => Self::OfferedForCompensation,
            RegistrationPurpose::OfferedForDacao => Self::OfferedForDacao,
        }
    }
}

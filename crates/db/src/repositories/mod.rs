//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod agreement;
pub mod case;
pub mod report;

pub use agreement::{
    AgreementError, AgreementFilter, AgreementRepository, AgreementWithSchedule,
    CreateAgreementInput, CreditInput, DebtInput, InstallmentWithPayments, RecordPaymentInput,
    RegistrationInput,
};
pub use case::{CaseError, CaseFilter, CaseRepository, CreateCaseInput};
pub use report::{DashboardError, ReportRepository};

//! Agreement error types for value resolution and schedule generation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::case::{CaseType, DecisionOutcome};

/// Errors that can occur while resolving values or generating schedules.
///
/// All of these are caller-input problems raised synchronously before any
/// row is written; none are retried.
#[derive(Debug, Error)]
pub enum AgreementError {
    /// The type-specific detail sub-record is missing.
    ///
    /// Raised instead of defaulting to zero so callers can distinguish
    /// "zero value" from "unset".
    #[error("Agreement detail not configured for case type {}", .0.label())]
    DetailNotConfigured(CaseType),

    /// The attached detail belongs to a different case type.
    #[error(
        "Agreement detail mismatch: case type {} has a {} detail",
        expected.label(),
        found.label()
    )]
    DetailMismatch {
        /// The case's type.
        expected: CaseType,
        /// The type the attached detail belongs to.
        found: CaseType,
    },

    /// Installment count was supplied but is below 1.
    #[error("Invalid installment count: {0}")]
    InvalidInstallmentCount(u32),

    /// A monetary input is out of range (negative, or entry above the final value).
    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),

    /// A monthly due-date offset fell outside the representable date range.
    #[error("Installment due date out of range from baseline {0}")]
    DueDateOutOfRange(NaiveDate),

    /// The case's latest decision does not allow an agreement.
    #[error("Case is not agreement-eligible: latest decision is {}", .0.label())]
    CaseNotEligible(DecisionOutcome),

    /// The case has no decision yet.
    #[error("Case has not been judged yet")]
    CaseNotJudged,
}

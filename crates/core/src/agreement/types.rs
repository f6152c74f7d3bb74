//! Agreement domain types for value resolution and schedule generation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::case::CaseType;

/// Status of an agreement in its lifecycle.
///
/// `Fulfilled` is terminal: an agreement never transitions backward from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgreementStatus {
    /// In effect, installments being paid.
    Active,
    /// All obligations settled.
    Fulfilled,
    /// Lapsed without fulfillment.
    Expired,
    /// Cancelled by the board or the taxpayer.
    Cancelled,
    /// Replaced by a renegotiated agreement.
    Renegotiated,
}

impl AgreementStatus {
    /// Returns true if no further status change is allowed.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Fulfilled)
    }

    /// Returns the display label for this status.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Vigente",
            Self::Fulfilled => "Cumprido",
            Self::Expired => "Vencido",
            Self::Cancelled => "Cancelado",
            Self::Renegotiated => "Renegociado",
        }
    }

    /// Returns the display color token for this status.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Active => "blue",
            Self::Fulfilled => "green",
            Self::Expired => "red",
            Self::Cancelled => "gray",
            Self::Renegotiated => "amber",
        }
    }
}

/// How the negotiated value is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Single payment on the agreement due date.
    LumpSum,
    /// Monthly installments, optionally with an entry payment.
    Installments,
}

/// Tag distinguishing the three kinds of generated installments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstallmentType {
    /// Entry payment (number 0, due on the agreement due date).
    #[serde(rename = "ENTRY")]
    Entry,
    /// Regular agreement installment.
    #[serde(rename = "AGREEMENT_INSTALLMENT")]
    AgreementInstallment,
    /// Legal-cost/fee installment, never part of the agreement-value sum.
    #[serde(rename = "FEE_INSTALLMENT")]
    FeeInstallment,
}

impl InstallmentType {
    /// Returns true if this installment counts toward the agreement value.
    #[must_use]
    pub const fn counts_toward_agreement(self) -> bool {
        matches!(self, Self::Entry | Self::AgreementInstallment)
    }
}

/// Payment status of an installment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstallmentStatus {
    /// Awaiting payment.
    Pending,
    /// Fully paid.
    Paid,
    /// Past due date without full payment.
    Overdue,
    /// Cancelled together with the agreement.
    Cancelled,
}

impl InstallmentStatus {
    /// Returns the display label for this status.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pendente",
            Self::Paid => "Paga",
            Self::Overdue => "Vencida",
            Self::Cancelled => "Cancelada",
        }
    }

    /// Returns the display color token for this status.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Pending => "amber",
            Self::Paid => "green",
            Self::Overdue => "red",
            Self::Cancelled => "gray",
        }
    }
}

/// Purpose of a registration (inscrição) line attached to an agreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationPurpose {
    /// Debt line included in the agreement.
    #[serde(rename = "INCLUDED_IN_AGREEMENT")]
    IncludedInAgreement,
    /// Credit line offered for compensation.
    #[serde(rename = "OFFERED_FOR_COMPENSATION")]
    OfferedForCompensation,
    /// Property line offered for dação.
    #[serde(rename = "OFFERED_FOR_DACAO")]
    OfferedForDacao,
}

/// A debt line (débito) with its posted amount (valor lançado).
///
/// The exceptional-transaction resolver sums these to obtain the original
/// value before discount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtLine {
    /// Posted amount of the debt line.
    pub posted_amount: Decimal,
}

/// Detail sub-record of a compensation agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationDetail {
    /// Total of offered tax credits.
    pub total_credits: Decimal,
    /// Total of tax debits to offset.
    pub total_debits: Decimal,
    /// Optional legal costs (custas).
    pub legal_costs: Option<Decimal>,
    /// Optional fees (honorários).
    pub fees: Option<Decimal>,
}

/// Detail sub-record of a dação em pagamento agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DacaoDetail {
    /// Total value of the offered property.
    pub total_offered: Decimal,
    /// Total debt value to be extinguished.
    pub total_to_offset: Decimal,
    /// Optional legal costs (custas).
    pub legal_costs: Option<Decimal>,
    /// Optional fees (honorários).
    pub fees: Option<Decimal>,
}

/// Detail sub-record of an exceptional-transaction agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDetail {
    /// Total proposed (negotiated) value.
    pub total_proposed: Decimal,
    /// Payment modality for the proposed value.
    pub payment_method: PaymentMethod,
    /// Optional entry payment value.
    pub entry_value: Option<Decimal>,
    /// Optional number of installments.
    pub installment_count: Option<u32>,
    /// Optional per-installment value as proposed.
    pub installment_value: Option<Decimal>,
    /// Optional legal costs (custas).
    pub legal_costs: Option<Decimal>,
    /// Optional fees (honorários).
    pub fees: Option<Decimal>,
}

/// Type-specific agreement detail, selected by the case's type.
///
/// Exactly one variant is attached per agreement; an exhaustive match over
/// this sum type replaces string-keyed branching so that adding a fourth
/// case type is a compile-time event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgreementDetail {
    /// Compensation detail.
    Compensation(CompensationDetail),
    /// Dação em pagamento detail.
    Dacao(DacaoDetail),
    /// Exceptional-transaction detail.
    Transaction(TransactionDetail),
}

impl AgreementDetail {
    /// Returns the case type this detail belongs to.
    #[must_use]
    pub const fn case_type(&self) -> CaseType {
        match self {
            Self::Compensation(_) => CaseType::Compensation,
            Self::Dacao(_) => CaseType::Dacao,
            Self::Transaction(_) => CaseType::ExceptionalTransaction,
        }
    }

    /// Returns the legal costs recorded on this detail, zero when absent.
    #[must_use]
    pub fn legal_costs(&self) -> Decimal {
        let raw = match self {
            Self::Compensation(d) => d.legal_costs,
            Self::Dacao(d) => d.legal_costs,
            Self::Transaction(d) => d.legal_costs,
        };
        concilia_shared::types::money::from_optional(raw)
    }

    /// Returns the fees recorded on this detail, zero when absent.
    #[must_use]
    pub fn fees(&self) -> Decimal {
        let raw = match self {
            Self::Compensation(d) => d.fees,
            Self::Dacao(d) => d.fees,
            Self::Transaction(d) => d.fees,
        };
        concilia_shared::types::money::from_optional(raw)
    }
}

/// Resolved monetary values for an agreement.
///
/// Output of the value resolver; all fields derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedValues {
    /// Value before the settlement (full debt or larger side).
    pub original_value: Decimal,
    /// Negotiated/compensable value the taxpayer actually settles.
    pub final_value: Decimal,
    /// Difference between original and final value.
    pub discount_value: Decimal,
    /// Discount as a percentage of the original value (0 when original is 0).
    pub discount_percent: Decimal,
}

/// Input to the installment schedule generator.
#[derive(Debug, Clone)]
pub struct ScheduleInput {
    /// Final (negotiated) value to be paid.
    pub final_value: Decimal,
    /// Payment modality.
    pub payment_method: PaymentMethod,
    /// Number of installments when paying in installments.
    pub installment_count: Option<u32>,
    /// Entry payment deducted from the installment principal.
    pub entry_value: Option<Decimal>,
    /// Legal-cost/fee add-on, charged as a single separate installment.
    pub fee_value: Option<Decimal>,
    /// Agreement due date; baseline for the monthly offsets.
    pub due_date: NaiveDate,
}

/// One generated installment record, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledInstallment {
    /// Kind of installment.
    pub installment_type: InstallmentType,
    /// Sequence number, unique within each type (0 reserved for entry).
    pub number: u32,
    /// Amount due.
    pub amount: Decimal,
    /// Due date.
    pub due_date: NaiveDate,
    /// Initial status; always `Pending` at generation time.
    pub status: InstallmentStatus,
}

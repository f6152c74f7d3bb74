//! Dashboard snapshot inputs and view-model types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::agreement::{AgreementDetail, AgreementStatus, DebtLine, InstallmentStatus, InstallmentType};
use crate::case::{CaseType, DecisionOutcome};

use super::error::ReportError;

/// Optional date window applied to the aggregation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DateRange {
    /// Inclusive lower bound.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound.
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Validates the window bounds.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` when `from` is after `to`.
    pub fn validate(&self) -> Result<(), ReportError> {
        if let (Some(from), Some(to)) = (self.from, self.to)
            && from > to
        {
            return Err(ReportError::InvalidDateRange { from, to });
        }
        Ok(())
    }

    /// Returns true if the date falls inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }
}

/// A recorded payment against an installment.
#[derive(Debug, Clone)]
pub struct PaymentSnapshot {
    /// Amount paid.
    pub amount: Decimal,
    /// Date the payment was made.
    pub paid_at: NaiveDate,
}

/// An installment as fetched for aggregation.
#[derive(Debug, Clone)]
pub struct InstallmentSnapshot {
    /// Installment kind.
    pub installment_type: InstallmentType,
    /// Current status.
    pub status: InstallmentStatus,
    /// Amount due.
    pub amount: Decimal,
    /// Due date.
    pub due_date: NaiveDate,
    /// Date the installment was settled, when paid.
    pub payment_date: Option<NaiveDate>,
    /// Individual payment records (possibly partial).
    pub payments: Vec<PaymentSnapshot>,
}

/// An agreement with everything the engine needs to value it.
#[derive(Debug, Clone)]
pub struct AgreementSnapshot {
    /// Type of the owning case.
    pub case_type: CaseType,
    /// Agreement status.
    pub status: AgreementStatus,
    /// Term signing date; keys the collected series for compensation/dação.
    pub signing_date: NaiveDate,
    /// Type-specific detail, when configured.
    pub detail: Option<AgreementDetail>,
    /// Debt lines backing the exceptional-transaction original value.
    pub debt_lines: Vec<DebtLine>,
    /// Installments with their payments.
    pub installments: Vec<InstallmentSnapshot>,
}

/// A board decision as fetched for aggregation.
#[derive(Debug, Clone)]
pub struct DecisionSnapshot {
    /// Decision outcome.
    pub outcome: DecisionOutcome,
    /// Value of the decided case.
    pub case_value: Decimal,
    /// Date of the decision.
    pub decided_at: NaiveDate,
}

/// Entity counts fetched by the repository fan-out.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EntityCounts {
    /// Total cases.
    pub cases: u64,
    /// Total dockets (pautas).
    pub dockets: u64,
    /// Total judgment sessions.
    pub sessions: u64,
    /// Total agreements.
    pub agreements: u64,
}

/// Installment counts grouped by status.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct InstallmentStatusCounts {
    /// Pending installments.
    pub pending: u64,
    /// Paid installments.
    pub paid: u64,
    /// Overdue installments.
    pub overdue: u64,
    /// Cancelled installments.
    pub cancelled: u64,
}

/// Value totals for one case type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseTypeTotals {
    /// The case type.
    pub case_type: CaseType,
    /// Number of agreements of this type in the window.
    pub agreement_count: u64,
    /// Sum of resolved final values (agreement principal).
    pub principal: Decimal,
    /// Sum of legal costs, kept separate from the principal.
    pub legal_costs: Decimal,
    /// Sum of fees, kept separate from the principal.
    pub fees: Decimal,
}

/// Value totals for one decision outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeTotals {
    /// The outcome.
    pub outcome: DecisionOutcome,
    /// Decisions with this outcome in the window.
    pub decision_count: u64,
    /// Sum of the decided cases' values.
    pub total_value: Decimal,
}

/// One month of the collected series, split by case type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyCollection {
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1-12).
    pub month: u32,
    /// Collected from compensation agreements.
    pub compensation: Decimal,
    /// Collected from dação agreements.
    pub dacao: Decimal,
    /// Collected from exceptional-transaction installments.
    pub transaction: Decimal,
    /// Month total across the three types.
    pub total: Decimal,
}

/// The dashboard view model, JSON-serializable for the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardData {
    /// Entity counts.
    pub counts: EntityCounts,
    /// Installment counts by status.
    pub installments: InstallmentStatusCounts,
    /// Per-case-type value totals.
    pub by_case_type: Vec<CaseTypeTotals>,
    /// Per-decision-outcome value totals.
    pub by_outcome: Vec<OutcomeTotals>,
    /// Monthly collected series (12 months or the filtered range).
    pub monthly_collections: Vec<MonthlyCollection>,
    /// Active agreements counted as overdue under the lenient policy.
    pub overdue_agreements: u64,
}

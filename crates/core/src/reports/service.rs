//! Dashboard aggregation service.

use std::collections::HashMap;

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;

use crate::agreement::{AgreementStatus, InstallmentStatus, InstallmentType, ValueResolver};
use crate::case::{CaseType, DecisionOutcome};

use super::error::ReportError;
use super::types::{
    AgreementSnapshot, CaseTypeTotals, DashboardData, DateRange, DecisionSnapshot, EntityCounts,
    InstallmentStatusCounts, MonthlyCollection, OutcomeTotals,
};

/// Number of months in the default (unfiltered) collected series.
const DEFAULT_SERIES_MONTHS: u32 = 12;

/// Service building the dashboard view model from fetched snapshots.
pub struct DashboardService;

impl DashboardService {
    /// Builds the dashboard view model.
    ///
    /// "Collected" semantics differ per case type: exceptional-transaction
    /// agreements collect through paid non-fee installments keyed by payment
    /// date; compensation and dação agreements settle in a single
    /// compensating transaction, so their resolved final value is counted
    /// when the agreement is fulfilled, keyed by the signing date.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` when the window is inverted; no partial
    /// results are produced.
    pub fn build(
        range: &DateRange,
        counts: EntityCounts,
        agreements: &[AgreementSnapshot],
        decisions: &[DecisionSnapshot],
        today: NaiveDate,
    ) -> Result<DashboardData, ReportError> {
        range.validate()?;

        Ok(DashboardData {
            counts,
            installments: Self::count_installments(agreements, today),
            by_case_type: Self::totals_by_case_type(range, agreements),
            by_outcome: Self::totals_by_outcome(range, decisions),
            monthly_collections: Self::monthly_collections(range, agreements, today),
            overdue_agreements: Self::count_overdue_agreements(agreements, today),
        })
    }

    /// Counts installments per status.
    ///
    /// The overdue bucket is derived: a pending installment past its due
    /// date counts as overdue without requiring a stored status flip.
    fn count_installments(
        agreements: &[AgreementSnapshot],
        today: NaiveDate,
    ) -> InstallmentStatusCounts {
        let mut counts = InstallmentStatusCounts::default();
        for parcel in agreements.iter().flat_map(|a| &a.installments) {
            match parcel.status {
                InstallmentStatus::Pending if parcel.due_date < today => counts.overdue += 1,
                InstallmentStatus::Pending => counts.pending += 1,
                InstallmentStatus::Paid => counts.paid += 1,
                InstallmentStatus::Overdue => counts.overdue += 1,
                InstallmentStatus::Cancelled => counts.cancelled += 1,
            }
        }
        counts
    }

    /// Per-type totals over agreements signed inside the window.
    ///
    /// Agreements without a configured detail cannot be valued and are
    /// skipped; the resolver refuses to default them to zero.
    fn totals_by_case_type(
        range: &DateRange,
        agreements: &[AgreementSnapshot],
    ) -> Vec<CaseTypeTotals> {
        CaseType::ALL
            .into_iter()
            .map(|case_type| {
                let mut totals = CaseTypeTotals {
                    case_type,
                    agreement_count: 0,
                    principal: Decimal::ZERO,
                    legal_costs: Decimal::ZERO,
                    fees: Decimal::ZERO,
                };

                for agreement in agreements
                    .iter()
                    .filter(|a| a.case_type == case_type && range.contains(a.signing_date))
                {
                    let Ok(resolved) = ValueResolver::resolve(
                        case_type,
                        agreement.detail.as_ref(),
                        &agreement.debt_lines,
                    ) else {
                        continue;
                    };

                    totals.agreement_count += 1;
                    totals.principal += resolved.final_value;
                    if let Some(detail) = &agreement.detail {
                        totals.legal_costs += detail.legal_costs();
                        totals.fees += detail.fees();
                    }
                }

                totals
            })
            .collect()
    }

    fn totals_by_outcome(range: &DateRange, decisions: &[DecisionSnapshot]) -> Vec<OutcomeTotals> {
        DecisionOutcome::ALL
            .into_iter()
            .map(|outcome| {
                let mut totals = OutcomeTotals {
                    outcome,
                    decision_count: 0,
                    total_value: Decimal::ZERO,
                };
                for decision in decisions
                    .iter()
                    .filter(|d| d.outcome == outcome && range.contains(d.decided_at))
                {
                    totals.decision_count += 1;
                    totals.total_value += decision.case_value;
                }
                totals
            })
            .collect()
    }

    fn monthly_collections(
        range: &DateRange,
        agreements: &[AgreementSnapshot],
        today: NaiveDate,
    ) -> Vec<MonthlyCollection> {
        let (start, end) = series_window(range, today);
        let mut series: Vec<MonthlyCollection> = Vec::new();
        let mut index: HashMap<(i32, u32), usize> = HashMap::new();

        let mut cursor = start;
        while cursor <= end {
            index.insert((cursor.year(), cursor.month()), series.len());
            series.push(MonthlyCollection {
                year: cursor.year(),
                month: cursor.month(),
                compensation: Decimal::ZERO,
                dacao: Decimal::ZERO,
                transaction: Decimal::ZERO,
                total: Decimal::ZERO,
            });
            let Some(next) = cursor.checked_add_months(Months::new(1)) else {
                break;
            };
            cursor = next;
        }

        for agreement in agreements {
            match agreement.case_type {
                CaseType::ExceptionalTransaction => {
                    // Paid non-fee installments, keyed by payment date.
                    for parcel in &agreement.installments {
                        if !parcel.installment_type.counts_toward_agreement()
                            || parcel.status != InstallmentStatus::Paid
                        {
                            continue;
                        }
                        let Some(paid_at) = parcel.payment_date else {
                            continue;
                        };
                        if !range.contains(paid_at) {
                            continue;
                        }
                        if let Some(&slot) = index.get(&(paid_at.year(), paid_at.month())) {
                            series[slot].transaction += parcel.amount;
                            series[slot].total += parcel.amount;
                        }
                    }
                }
                CaseType::Compensation | CaseType::Dacao => {
                    // Fulfilled agreements, keyed by signing date.
                    if agreement.status != AgreementStatus::Fulfilled
                        || !range.contains(agreement.signing_date)
                    {
                        continue;
                    }
                    let Ok(resolved) = ValueResolver::resolve(
                        agreement.case_type,
                        agreement.detail.as_ref(),
                        &agreement.debt_lines,
                    ) else {
                        continue;
                    };
                    let key = (agreement.signing_date.year(), agreement.signing_date.month());
                    if let Some(&slot) = index.get(&key) {
                        if agreement.case_type == CaseType::Compensation {
                            series[slot].compensation += resolved.final_value;
                        } else {
                            series[slot].dacao += resolved.final_value;
                        }
                        series[slot].total += resolved.final_value;
                    }
                }
            }
        }

        series
    }

    /// Counts active agreements that are overdue.
    ///
    /// Policy: an active agreement is overdue if any non-fee installment is
    /// past its due date with zero recorded payments. An installment with at
    /// least one partial payment never counts; the rule is deliberately
    /// lenient toward taxpayers who keep paying.
    fn count_overdue_agreements(agreements: &[AgreementSnapshot], today: NaiveDate) -> u64 {
        let overdue = agreements
            .iter()
            .filter(|agreement| {
                agreement.status == AgreementStatus::Active
                    && agreement.installments.iter().any(|parcel| {
                        parcel.installment_type != InstallmentType::FeeInstallment
                            && parcel.due_date < today
                            && parcel.payments.is_empty()
                    })
            })
            .count();
        u64::try_from(overdue).unwrap_or(u64::MAX)
    }
}

/// Resolves the first and last month of the collected series.
///
/// Both bounds given: the filtered range. Only `from`: from there to today.
/// Only `to` or nothing: a 12-month window ending at the bound (or today).
fn series_window(range: &DateRange, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let end = range.to.unwrap_or(today);
    let start = range.from.unwrap_or_else(|| {
        end.checked_sub_months(Months::new(DEFAULT_SERIES_MONTHS - 1))
            .unwrap_or(end)
    });
    (month_start(start), month_start(end))
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

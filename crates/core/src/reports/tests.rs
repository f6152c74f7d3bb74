//! Tests for the dashboard aggregation engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::agreement::{
    AgreementDetail, AgreementStatus, CompensationDetail, DacaoDetail, DebtLine, InstallmentStatus,
    InstallmentType, PaymentMethod, TransactionDetail,
};
use crate::case::{CaseType, DecisionOutcome};

use super::service::DashboardService;
use super::types::{
    AgreementSnapshot, DateRange, DecisionSnapshot, EntityCounts, InstallmentSnapshot,
    PaymentSnapshot,
};
use super::ReportError;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn range(from: (i32, u32, u32), to: (i32, u32, u32)) -> DateRange {
    DateRange {
        from: Some(date(from.0, from.1, from.2)),
        to: Some(date(to.0, to.1, to.2)),
    }
}

fn paid_installment(
    installment_type: InstallmentType,
    amount: Decimal,
    paid_on: NaiveDate,
) -> InstallmentSnapshot {
    InstallmentSnapshot {
        installment_type,
        status: InstallmentStatus::Paid,
        amount,
        due_date: paid_on,
        payment_date: Some(paid_on),
        payments: vec![PaymentSnapshot {
            amount,
            paid_at: paid_on,
        }],
    }
}

fn pending_installment(due_date: NaiveDate) -> InstallmentSnapshot {
    InstallmentSnapshot {
        installment_type: InstallmentType::AgreementInstallment,
        status: InstallmentStatus::Pending,
        amount: dec!(100),
        due_date,
        payment_date: None,
        payments: vec![],
    }
}

fn transaction_agreement(installments: Vec<InstallmentSnapshot>) -> AgreementSnapshot {
    AgreementSnapshot {
        case_type: CaseType::ExceptionalTransaction,
        status: AgreementStatus::Active,
        signing_date: date(2024, 1, 5),
        detail: Some(AgreementDetail::Transaction(TransactionDetail {
            total_proposed: dec!(5000),
            payment_method: PaymentMethod::Installments,
            entry_value: None,
            installment_count: Some(5),
            installment_value: None,
            legal_costs: None,
            fees: None,
        })),
        debt_lines: vec![DebtLine {
            posted_amount: dec!(8000),
        }],
        installments,
    }
}

#[test]
fn test_transaction_collections_exclude_fees() {
    // Scenario: a 1,200 installment and a 300 fee paid the same day.
    let agreement = transaction_agreement(vec![
        paid_installment(
            InstallmentType::AgreementInstallment,
            dec!(1200),
            date(2024, 1, 15),
        ),
        paid_installment(InstallmentType::FeeInstallment, dec!(300), date(2024, 1, 15)),
    ]);

    let data = DashboardService::build(
        &range((2024, 1, 1), (2024, 1, 31)),
        EntityCounts::default(),
        &[agreement],
        &[],
        date(2024, 2, 1),
    )
    .unwrap();

    assert_eq!(data.monthly_collections.len(), 1);
    let january = &data.monthly_collections[0];
    assert_eq!((january.year, january.month), (2024, 1));
    assert_eq!(january.transaction, dec!(1200));
    assert_eq!(january.total, dec!(1200));
}

#[test]
fn test_entry_installments_count_as_collected() {
    let agreement = transaction_agreement(vec![paid_installment(
        InstallmentType::Entry,
        dec!(500),
        date(2024, 1, 10),
    )]);

    let data = DashboardService::build(
        &range((2024, 1, 1), (2024, 1, 31)),
        EntityCounts::default(),
        &[agreement],
        &[],
        date(2024, 2, 1),
    )
    .unwrap();

    assert_eq!(data.monthly_collections[0].transaction, dec!(500));
}

#[test]
fn test_inverted_range_produces_no_partial_output() {
    let result = DashboardService::build(
        &range((2024, 2, 1), (2024, 1, 1)),
        EntityCounts::default(),
        &[],
        &[],
        date(2024, 3, 1),
    );

    assert!(matches!(
        result,
        Err(ReportError::InvalidDateRange { .. })
    ));
}

#[test]
fn test_fulfilled_compensation_keyed_by_signing_date() {
    let agreement = AgreementSnapshot {
        case_type: CaseType::Compensation,
        status: AgreementStatus::Fulfilled,
        signing_date: date(2024, 3, 20),
        detail: Some(AgreementDetail::Compensation(CompensationDetail {
            total_credits: dec!(8000),
            total_debits: dec!(5000),
            legal_costs: None,
            fees: None,
        })),
        debt_lines: vec![],
        installments: vec![],
    };

    let data = DashboardService::build(
        &range((2024, 3, 1), (2024, 4, 30)),
        EntityCounts::default(),
        &[agreement],
        &[],
        date(2024, 5, 1),
    )
    .unwrap();

    // Compensable amount is the smaller side, booked in the signing month.
    let march = &data.monthly_collections[0];
    assert_eq!((march.year, march.month), (2024, 3));
    assert_eq!(march.compensation, dec!(5000));
    let april = &data.monthly_collections[1];
    assert_eq!(april.compensation, Decimal::ZERO);
}

#[test]
fn test_active_compensation_not_collected() {
    let agreement = AgreementSnapshot {
        case_type: CaseType::Dacao,
        status: AgreementStatus::Active,
        signing_date: date(2024, 3, 20),
        detail: Some(AgreementDetail::Dacao(DacaoDetail {
            total_offered: dec!(9000),
            total_to_offset: dec!(7000),
            legal_costs: None,
            fees: None,
        })),
        debt_lines: vec![],
        installments: vec![],
    };

    let data = DashboardService::build(
        &range((2024, 3, 1), (2024, 3, 31)),
        EntityCounts::default(),
        &[agreement],
        &[],
        date(2024, 4, 1),
    )
    .unwrap();

    assert_eq!(data.monthly_collections[0].dacao, Decimal::ZERO);
}

#[test]
fn test_default_window_is_twelve_months() {
    let data = DashboardService::build(
        &DateRange::default(),
        EntityCounts::default(),
        &[],
        &[],
        date(2024, 6, 15),
    )
    .unwrap();

    assert_eq!(data.monthly_collections.len(), 12);
    let first = &data.monthly_collections[0];
    assert_eq!((first.year, first.month), (2023, 7));
    let last = &data.monthly_collections[11];
    assert_eq!((last.year, last.month), (2024, 6));
}

#[test]
fn test_overdue_policy_is_lenient_to_partial_payment() {
    let today = date(2024, 6, 1);

    // Past-due installment with no payments: counts as overdue.
    let overdue = transaction_agreement(vec![pending_installment(date(2024, 5, 1))]);

    // Past-due installment with one partial payment: cured.
    let mut partially_paid_parcel = pending_installment(date(2024, 5, 1));
    partially_paid_parcel.payments.push(PaymentSnapshot {
        amount: dec!(10),
        paid_at: date(2024, 5, 2),
    });
    let partially_paid = transaction_agreement(vec![partially_paid_parcel]);

    // Past-due fee installment alone never makes the agreement overdue.
    let mut fee_parcel = pending_installment(date(2024, 5, 1));
    fee_parcel.installment_type = InstallmentType::FeeInstallment;
    let fee_only = transaction_agreement(vec![fee_parcel]);

    // Fulfilled agreements are out of scope for the overdue count.
    let mut fulfilled = transaction_agreement(vec![pending_installment(date(2024, 5, 1))]);
    fulfilled.status = AgreementStatus::Fulfilled;

    let data = DashboardService::build(
        &DateRange::default(),
        EntityCounts::default(),
        &[overdue, partially_paid, fee_only, fulfilled],
        &[],
        today,
    )
    .unwrap();

    assert_eq!(data.overdue_agreements, 1);
}

#[test]
fn test_totals_by_case_type_separate_fees_from_principal() {
    let agreement = AgreementSnapshot {
        case_type: CaseType::Compensation,
        status: AgreementStatus::Active,
        signing_date: date(2024, 2, 10),
        detail: Some(AgreementDetail::Compensation(CompensationDetail {
            total_credits: dec!(4000),
            total_debits: dec!(6000),
            legal_costs: Some(dec!(120)),
            fees: Some(dec!(80)),
        })),
        debt_lines: vec![],
        installments: vec![],
    };

    let data = DashboardService::build(
        &range((2024, 2, 1), (2024, 2, 29)),
        EntityCounts::default(),
        &[agreement],
        &[],
        date(2024, 3, 1),
    )
    .unwrap();

    let compensation = data
        .by_case_type
        .iter()
        .find(|t| t.case_type == CaseType::Compensation)
        .unwrap();
    assert_eq!(compensation.agreement_count, 1);
    assert_eq!(compensation.principal, dec!(4000));
    assert_eq!(compensation.legal_costs, dec!(120));
    assert_eq!(compensation.fees, dec!(80));

    let dacao = data
        .by_case_type
        .iter()
        .find(|t| t.case_type == CaseType::Dacao)
        .unwrap();
    assert_eq!(dacao.agreement_count, 0);
}

#[test]
fn test_agreement_without_detail_is_skipped_not_zeroed() {
    let agreement = AgreementSnapshot {
        case_type: CaseType::Compensation,
        status: AgreementStatus::Fulfilled,
        signing_date: date(2024, 2, 10),
        detail: None,
        debt_lines: vec![],
        installments: vec![],
    };

    let data = DashboardService::build(
        &range((2024, 2, 1), (2024, 2, 29)),
        EntityCounts::default(),
        &[agreement],
        &[],
        date(2024, 3, 1),
    )
    .unwrap();

    let compensation = data
        .by_case_type
        .iter()
        .find(|t| t.case_type == CaseType::Compensation)
        .unwrap();
    assert_eq!(compensation.agreement_count, 0);
    assert_eq!(data.monthly_collections[0].compensation, Decimal::ZERO);
}

#[test]
fn test_totals_by_outcome() {
    let decisions = vec![
        DecisionSnapshot {
            outcome: DecisionOutcome::Granted,
            case_value: dec!(1000),
            decided_at: date(2024, 1, 10),
        },
        DecisionSnapshot {
            outcome: DecisionOutcome::Granted,
            case_value: dec!(500),
            decided_at: date(2024, 1, 20),
        },
        DecisionSnapshot {
            outcome: DecisionOutcome::Denied,
            case_value: dec!(900),
            decided_at: date(2024, 1, 25),
        },
        // Outside the window.
        DecisionSnapshot {
            outcome: DecisionOutcome::Granted,
            case_value: dec!(9999),
            decided_at: date(2023, 12, 31),
        },
    ];

    let data = DashboardService::build(
        &range((2024, 1, 1), (2024, 1, 31)),
        EntityCounts::default(),
        &[],
        &decisions,
        date(2024, 2, 1),
    )
    .unwrap();

    let granted = data
        .by_outcome
        .iter()
        .find(|t| t.outcome == DecisionOutcome::Granted)
        .unwrap();
    assert_eq!(granted.decision_count, 2);
    assert_eq!(granted.total_value, dec!(1500));

    let denied = data
        .by_outcome
        .iter()
        .find(|t| t.outcome == DecisionOutcome::Denied)
        .unwrap();
    assert_eq!(denied.decision_count, 1);
    assert_eq!(denied.total_value, dec!(900));
}

#[test]
fn test_installment_status_counts() {
    let agreement = transaction_agreement(vec![
        pending_installment(date(2024, 7, 1)),
        pending_installment(date(2024, 8, 1)),
        paid_installment(
            InstallmentType::AgreementInstallment,
            dec!(100),
            date(2024, 5, 1),
        ),
    ]);

    let data = DashboardService::build(
        &DateRange::default(),
        EntityCounts::default(),
        &[agreement],
        &[],
        date(2024, 6, 1),
    )
    .unwrap();

    assert_eq!(data.installments.pending, 2);
    assert_eq!(data.installments.paid, 1);
    assert_eq!(data.installments.overdue, 0);
}

#[test]
fn test_past_due_pending_installment_counts_as_overdue() {
    let agreement = transaction_agreement(vec![
        pending_installment(date(2024, 4, 1)),
        pending_installment(date(2024, 8, 1)),
    ]);

    let data = DashboardService::build(
        &DateRange::default(),
        EntityCounts::default(),
        &[agreement],
        &[],
        date(2024, 6, 1),
    )
    .unwrap();

    assert_eq!(data.installments.overdue, 1);
    assert_eq!(data.installments.pending, 1);
}

#[test]
fn test_entity_counts_pass_through() {
    let counts = EntityCounts {
        cases: 10,
        dockets: 3,
        sessions: 4,
        agreements: 6,
    };

    let data = DashboardService::build(
        &DateRange::default(),
        counts,
        &[],
        &[],
        date(2024, 6, 1),
    )
    .unwrap();

    assert_eq!(data.counts.cases, 10);
    assert_eq!(data.counts.dockets, 3);
    assert_eq!(data.counts.sessions, 4);
    assert_eq!(data.counts.agreements, 6);
}

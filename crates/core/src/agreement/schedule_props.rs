//! Property-based tests for the installment schedule generator.
//!
//! - Property: entry + agreement installments reconstruct the final value
//!   exactly, to the cent, via the last-installment remainder, and no
//!   installment amount is ever negative.
//! - Property: agreement installments are numbered 1..count with no gaps or
//!   duplicates; the entry, when present, is always numbered 0.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::schedule::ScheduleGenerator;
use super::types::{InstallmentType, PaymentMethod, ScheduleInput};

/// Strategy for centavo-precision amounts between 0.00 and 1,000,000.00.
fn amount_cents() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for a due date within a realistic window.
fn due_date() -> impl Strategy<Value = NaiveDate> {
    (2020i32..2030, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    })
}

proptest! {
    /// For any final value, entry within it, and count >= 1, the sum of all
    /// entry + agreement installment amounts equals the final value exactly.
    #[test]
    fn prop_schedule_sum_reconstructs_final_value(
        final_value in amount_cents(),
        entry_fraction in 0u32..=100,
        count in 1u32..=60,
        fee in proptest::option::of(amount_cents()),
        due in due_date(),
    ) {
        let entry_value = (final_value * Decimal::from(entry_fraction)
            / Decimal::from(100u32)).round_dp(2);

        let schedule = ScheduleGenerator::generate(&ScheduleInput {
            final_value,
            payment_method: PaymentMethod::Installments,
            installment_count: Some(count),
            entry_value: Some(entry_value),
            fee_value: fee,
            due_date: due,
        }).unwrap();

        for parcel in &schedule {
            prop_assert!(parcel.amount >= Decimal::ZERO);
        }

        let agreement_sum: Decimal = schedule
            .iter()
            .filter(|p| p.installment_type.counts_toward_agreement())
            .map(|p| p.amount)
            .sum();

        prop_assert_eq!(agreement_sum, final_value);
    }

    /// Agreement installments are numbered 1..count without gaps; the entry
    /// is numbered 0; fee installments never join the agreement numbering.
    #[test]
    fn prop_schedule_numbering(
        final_value in amount_cents(),
        count in 2u32..=48,
        with_entry in any::<bool>(),
        due in due_date(),
    ) {
        let entry_value = if with_entry && final_value >= Decimal::ONE {
            Some(Decimal::ONE)
        } else {
            None
        };

        let schedule = ScheduleGenerator::generate(&ScheduleInput {
            final_value: final_value.max(Decimal::ONE),
            payment_method: PaymentMethod::Installments,
            installment_count: Some(count),
            entry_value,
            fee_value: None,
            due_date: due,
        }).unwrap();

        let numbers: Vec<u32> = schedule
            .iter()
            .filter(|p| p.installment_type == InstallmentType::AgreementInstallment)
            .map(|p| p.number)
            .collect();
        let expected: Vec<u32> = (1..=count).collect();
        prop_assert_eq!(numbers, expected);

        for parcel in &schedule {
            match parcel.installment_type {
                InstallmentType::Entry => prop_assert_eq!(parcel.number, 0),
                InstallmentType::AgreementInstallment | InstallmentType::FeeInstallment => {
                    prop_assert!(parcel.number >= 1);
                }
            }
        }
    }

    /// Due dates are strictly increasing across the monthly sequence.
    #[test]
    fn prop_schedule_due_dates_increase(
        count in 2u32..=36,
        due in due_date(),
    ) {
        let schedule = ScheduleGenerator::generate(&ScheduleInput {
            final_value: Decimal::from(10_000u32),
            payment_method: PaymentMethod::Installments,
            installment_count: Some(count),
            entry_value: None,
            fee_value: None,
            due_date: due,
        }).unwrap();

        for pair in schedule.windows(2) {
            prop_assert!(pair[0].due_date < pair[1].due_date);
        }
    }
}

//! Installment schedule generator.
//!
//! Given a final value, payment modality, entry value, and fee add-ons,
//! produces the ordered installment records persisted at agreement creation.
//! Pure and synchronous: failures surface before anything is written, so the
//! enclosing transaction never persists a partial schedule.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;

use concilia_shared::types::money;

use super::error::AgreementError;
use super::types::{
    InstallmentStatus, InstallmentType, PaymentMethod, ScheduleInput, ScheduledInstallment,
};

/// Service generating installment schedules.
pub struct ScheduleGenerator;

impl ScheduleGenerator {
    /// Generates the ordered installment sequence for an agreement.
    ///
    /// - Lump sum (or a single installment): one agreement installment due on
    ///   the agreement due date.
    /// - Installments: optional entry (number 0, due on the agreement due
    ///   date, deliberately not offset), then `count` monthly installments
    ///   due `due_date + i months`. The per-installment value is floored to
    ///   centavos; the last installment absorbs the remainder, which stays
    ///   non-negative, so the sum exactly reconstructs the principal.
    /// - A positive fee value always yields exactly one separate fee
    ///   installment due on the agreement due date, regardless of modality.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` for negative amounts or an entry above the
    /// final value, and `InvalidInstallmentCount` when a count below 1 is
    /// supplied.
    pub fn generate(input: &ScheduleInput) -> Result<Vec<ScheduledInstallment>, AgreementError> {
        if input.final_value < Decimal::ZERO {
            return Err(AgreementError::InvalidAmount(input.final_value));
        }
        let entry_value = money::from_optional(input.entry_value);
        if entry_value < Decimal::ZERO || entry_value > input.final_value {
            return Err(AgreementError::InvalidAmount(entry_value));
        }
        let fee_value = money::from_optional(input.fee_value);
        if fee_value < Decimal::ZERO {
            return Err(AgreementError::InvalidAmount(fee_value));
        }
        if let Some(count) = input.installment_count
            && count < 1
        {
            return Err(AgreementError::InvalidInstallmentCount(count));
        }

        let count = input.installment_count.unwrap_or(1);
        let mut schedule = Vec::new();

        if input.payment_method == PaymentMethod::Installments && count > 1 {
            if entry_value > Decimal::ZERO {
                schedule.push(pending(
                    InstallmentType::Entry,
                    0,
                    entry_value,
                    input.due_date,
                ));
            }

            let principal = input.final_value - entry_value;
            // Floored, not rounded: rounding up would overdraw the last
            // installment into a negative amount on small principals.
            let per_installment = money::floor_centavos(principal / Decimal::from(count));

            for number in 1..count {
                schedule.push(pending(
                    InstallmentType::AgreementInstallment,
                    number,
                    per_installment,
                    add_months(input.due_date, number)?,
                ));
            }

            // Last installment absorbs the flooring remainder.
            let last = principal - per_installment * Decimal::from(count - 1);
            schedule.push(pending(
                InstallmentType::AgreementInstallment,
                count,
                last,
                add_months(input.due_date, count)?,
            ));
        } else {
            schedule.push(pending(
                InstallmentType::AgreementInstallment,
                1,
                input.final_value,
                input.due_date,
            ));
        }

        if fee_value > Decimal::ZERO {
            schedule.push(pending(
                InstallmentType::FeeInstallment,
                1,
                fee_value,
                input.due_date,
            ));
        }

        Ok(schedule)
    }
}

fn pending(
    installment_type: InstallmentType,
    number: u32,
    amount: Decimal,
    due_date: NaiveDate,
) -> ScheduledInstallment {
    ScheduledInstallment {
        installment_type,
        number,
        amount,
        due_date,
        status: InstallmentStatus::Pending,
    }
}

fn add_months(base: NaiveDate, months: u32) -> Result<NaiveDate, AgreementError> {
    base.checked_add_months(Months::new(months))
        .ok_or(AgreementError::DueDateOutOfRange(base))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input(
        final_value: Decimal,
        payment_method: PaymentMethod,
        installment_count: Option<u32>,
        entry_value: Option<Decimal>,
        fee_value: Option<Decimal>,
    ) -> ScheduleInput {
        ScheduleInput {
            final_value,
            payment_method,
            installment_count,
            entry_value,
            fee_value,
            due_date: date(2024, 1, 10),
        }
    }

    #[test]
    fn test_entry_plus_three_installments() {
        // 10,000 with a 2,000 entry over 3 installments.
        let schedule = ScheduleGenerator::generate(&input(
            dec!(10000),
            PaymentMethod::Installments,
            Some(3),
            Some(dec!(2000)),
            None,
        ))
        .unwrap();

        assert_eq!(schedule.len(), 4);

        let entry = &schedule[0];
        assert_eq!(entry.installment_type, InstallmentType::Entry);
        assert_eq!(entry.number, 0);
        assert_eq!(entry.amount, dec!(2000));
        assert_eq!(entry.due_date, date(2024, 1, 10));

        assert_eq!(schedule[1].amount, dec!(2666.66));
        assert_eq!(schedule[1].due_date, date(2024, 2, 10));
        assert_eq!(schedule[2].amount, dec!(2666.66));
        assert_eq!(schedule[2].due_date, date(2024, 3, 10));
        assert_eq!(schedule[3].amount, dec!(2666.68));
        assert_eq!(schedule[3].due_date, date(2024, 4, 10));

        let total: Decimal = schedule.iter().map(|p| p.amount).sum();
        assert_eq!(total, dec!(10000));
        assert!(schedule.iter().all(|p| p.status == InstallmentStatus::Pending));
    }

    #[test]
    fn test_small_principal_never_yields_negative_last_installment() {
        // 0.06 over 10 installments: nearest-centavo rounding of the per
        // value (0.01) would leave the last at -0.03.
        let schedule = ScheduleGenerator::generate(&input(
            dec!(0.06),
            PaymentMethod::Installments,
            Some(10),
            None,
            None,
        ))
        .unwrap();

        assert!(schedule.iter().all(|p| p.amount >= Decimal::ZERO));
        let total: Decimal = schedule.iter().map(|p| p.amount).sum();
        assert_eq!(total, dec!(0.06));
        assert_eq!(schedule.last().unwrap().amount, dec!(0.06));
    }

    #[test]
    fn test_lump_sum_single_installment() {
        let schedule = ScheduleGenerator::generate(&input(
            dec!(5000),
            PaymentMethod::LumpSum,
            None,
            None,
            None,
        ))
        .unwrap();

        assert_eq!(schedule.len(), 1);
        assert_eq!(
            schedule[0].installment_type,
            InstallmentType::AgreementInstallment
        );
        assert_eq!(schedule[0].number, 1);
        assert_eq!(schedule[0].amount, dec!(5000));
        assert_eq!(schedule[0].due_date, date(2024, 1, 10));
    }

    #[test]
    fn test_single_installment_count_behaves_as_lump_sum() {
        let schedule = ScheduleGenerator::generate(&input(
            dec!(5000),
            PaymentMethod::Installments,
            Some(1),
            None,
            None,
        ))
        .unwrap();

        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].amount, dec!(5000));
        assert_eq!(schedule[0].due_date, date(2024, 1, 10));
    }

    #[test]
    fn test_fee_is_a_single_separate_installment() {
        let schedule = ScheduleGenerator::generate(&input(
            dec!(9000),
            PaymentMethod::Installments,
            Some(4),
            None,
            Some(dec!(450)),
        ))
        .unwrap();

        let fees: Vec<_> = schedule
            .iter()
            .filter(|p| p.installment_type == InstallmentType::FeeInstallment)
            .collect();
        assert_eq!(fees.len(), 1);
        assert_eq!(fees[0].number, 1);
        assert_eq!(fees[0].amount, dec!(450));
        assert_eq!(fees[0].due_date, date(2024, 1, 10));

        // The fee never joins the agreement-value sum.
        let agreement_total: Decimal = schedule
            .iter()
            .filter(|p| p.installment_type.counts_toward_agreement())
            .map(|p| p.amount)
            .sum();
        assert_eq!(agreement_total, dec!(9000));
    }

    #[test]
    fn test_fee_attached_to_lump_sum() {
        let schedule = ScheduleGenerator::generate(&input(
            dec!(1000),
            PaymentMethod::LumpSum,
            None,
            None,
            Some(dec!(100)),
        ))
        .unwrap();

        assert_eq!(schedule.len(), 2);
        assert_eq!(
            schedule[1].installment_type,
            InstallmentType::FeeInstallment
        );
    }

    #[test]
    fn test_month_end_due_dates_clamp() {
        let schedule = ScheduleGenerator::generate(&ScheduleInput {
            final_value: dec!(3000),
            payment_method: PaymentMethod::Installments,
            installment_count: Some(2),
            entry_value: None,
            fee_value: None,
            due_date: date(2024, 1, 31),
        })
        .unwrap();

        assert_eq!(schedule[0].due_date, date(2024, 2, 29));
        assert_eq!(schedule[1].due_date, date(2024, 3, 31));
    }

    #[test]
    fn test_zero_installment_count_rejected() {
        let result = ScheduleGenerator::generate(&input(
            dec!(1000),
            PaymentMethod::Installments,
            Some(0),
            None,
            None,
        ));
        assert!(matches!(
            result,
            Err(AgreementError::InvalidInstallmentCount(0))
        ));
    }

    #[test]
    fn test_negative_final_value_rejected() {
        let result = ScheduleGenerator::generate(&input(
            dec!(-1),
            PaymentMethod::LumpSum,
            None,
            None,
            None,
        ));
        assert!(matches!(result, Err(AgreementError::InvalidAmount(_))));
    }

    #[test]
    fn test_entry_above_final_value_rejected() {
        let result = ScheduleGenerator::generate(&input(
            dec!(1000),
            PaymentMethod::Installments,
            Some(2),
            Some(dec!(1500)),
            None,
        ));
        assert!(matches!(result, Err(AgreementError::InvalidAmount(_))));
    }
}

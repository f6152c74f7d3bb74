//! Agreement value resolver.
//!
//! Computes original value, final (negotiated) value, discount, and discount
//! percentage for a judged case, branching on the case type. Pure functions
//! of the attached detail sub-record; input records are never mutated.

use rust_decimal::Decimal;

use super::error::AgreementError;
use super::types::{AgreementDetail, DebtLine, ResolvedValues};
use crate::case::{CaseType, DecisionOutcome};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Service resolving agreement values per case type.
pub struct ValueResolver;

impl ValueResolver {
    /// Resolves the monetary values for a case.
    ///
    /// - Exceptional transaction: original = sum of debt-line posted amounts,
    ///   final = the proposed total.
    /// - Compensation: original = max(credits, debits), final = min(credits,
    ///   debits) — the compensable amount is bounded by the smaller side.
    /// - Dação: original = debits to extinguish, final = min(offered, debits).
    ///
    /// # Errors
    ///
    /// Returns `DetailNotConfigured` when the detail sub-record is absent and
    /// `DetailMismatch` when it belongs to a different case type.
    pub fn resolve(
        case_type: CaseType,
        detail: Option<&AgreementDetail>,
        debt_lines: &[DebtLine],
    ) -> Result<ResolvedValues, AgreementError> {
        let detail = detail.ok_or(AgreementError::DetailNotConfigured(case_type))?;
        if detail.case_type() != case_type {
            return Err(AgreementError::DetailMismatch {
                expected: case_type,
                found: detail.case_type(),
            });
        }

        let (original_value, final_value) = match detail {
            AgreementDetail::Transaction(t) => {
                let original: Decimal = debt_lines.iter().map(|line| line.posted_amount).sum();
                (original, t.total_proposed)
            }
            AgreementDetail::Compensation(c) => (
                c.total_credits.max(c.total_debits),
                c.total_credits.min(c.total_debits),
            ),
            AgreementDetail::Dacao(d) => {
                (d.total_to_offset, d.total_offered.min(d.total_to_offset))
            }
        };

        Ok(Self::with_discount(original_value, final_value))
    }

    /// Checks that the latest decision outcome allows agreement creation.
    ///
    /// # Errors
    ///
    /// Returns `CaseNotJudged` when there is no decision, `CaseNotEligible`
    /// when the latest outcome is not (partially) granted.
    pub fn ensure_eligible(latest_outcome: Option<DecisionOutcome>) -> Result<(), AgreementError> {
        let outcome = latest_outcome.ok_or(AgreementError::CaseNotJudged)?;
        if outcome.allows_agreement() {
            Ok(())
        } else {
            Err(AgreementError::CaseNotEligible(outcome))
        }
    }

    fn with_discount(original_value: Decimal, final_value: Decimal) -> ResolvedValues {
        let discount_value = original_value - final_value;
        let discount_percent = if original_value > Decimal::ZERO {
            discount_value / original_value * HUNDRED
        } else {
            Decimal::ZERO
        };
        ResolvedValues {
            original_value,
            final_value,
            discount_value,
            discount_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agreement::types::{CompensationDetail, DacaoDetail, PaymentMethod, TransactionDetail};
    use rust_decimal_macros::dec;

    fn transaction_detail(total_proposed: Decimal) -> AgreementDetail {
        AgreementDetail::Transaction(TransactionDetail {
            total_proposed,
            payment_method: PaymentMethod::Installments,
            entry_value: None,
            installment_count: Some(3),
            installment_value: None,
            legal_costs: None,
            fees: None,
        })
    }

    fn debt_lines(amounts: &[Decimal]) -> Vec<DebtLine> {
        amounts
            .iter()
            .map(|&posted_amount| DebtLine { posted_amount })
            .collect()
    }

    #[test]
    fn test_transaction_discount_math() {
        // Debt lines sum to 12,000; proposal of 9,000 is a 25% discount.
        let lines = debt_lines(&[dec!(7000), dec!(5000)]);
        let detail = transaction_detail(dec!(9000));

        let resolved =
            ValueResolver::resolve(CaseType::ExceptionalTransaction, Some(&detail), &lines)
                .unwrap();

        assert_eq!(resolved.original_value, dec!(12000));
        assert_eq!(resolved.final_value, dec!(9000));
        assert_eq!(resolved.discount_value, dec!(3000));
        assert_eq!(resolved.discount_percent, dec!(25));
    }

    #[test]
    fn test_transaction_zero_debt_has_zero_percent() {
        let detail = transaction_detail(Decimal::ZERO);
        let resolved =
            ValueResolver::resolve(CaseType::ExceptionalTransaction, Some(&detail), &[]).unwrap();

        assert_eq!(resolved.original_value, Decimal::ZERO);
        assert_eq!(resolved.discount_percent, Decimal::ZERO);
    }

    #[test]
    fn test_compensation_credits_larger() {
        // Scenario: credits 8,000 against debits 5,000.
        let detail = AgreementDetail::Compensation(CompensationDetail {
            total_credits: dec!(8000),
            total_debits: dec!(5000),
            legal_costs: None,
            fees: None,
        });

        let resolved = ValueResolver::resolve(CaseType::Compensation, Some(&detail), &[]).unwrap();

        assert_eq!(resolved.original_value, dec!(8000));
        assert_eq!(resolved.final_value, dec!(5000));
        assert_eq!(resolved.discount_value, dec!(3000));
        assert_eq!(resolved.discount_percent, dec!(37.5));
    }

    #[test]
    fn test_compensation_debits_larger() {
        let detail = AgreementDetail::Compensation(CompensationDetail {
            total_credits: dec!(2000),
            total_debits: dec!(6000),
            legal_costs: None,
            fees: None,
        });

        let resolved = ValueResolver::resolve(CaseType::Compensation, Some(&detail), &[]).unwrap();

        // min/max hold regardless of which side is larger.
        assert_eq!(resolved.original_value, dec!(6000));
        assert_eq!(resolved.final_value, dec!(2000));
    }

    #[test]
    fn test_dacao_offer_bounded_by_debt() {
        let detail = AgreementDetail::Dacao(DacaoDetail {
            total_offered: dec!(15000),
            total_to_offset: dec!(10000),
            legal_costs: None,
            fees: None,
        });

        let resolved = ValueResolver::resolve(CaseType::Dacao, Some(&detail), &[]).unwrap();

        assert_eq!(resolved.original_value, dec!(10000));
        assert_eq!(resolved.final_value, dec!(10000));
        assert_eq!(resolved.discount_value, Decimal::ZERO);
    }

    #[test]
    fn test_missing_detail_is_not_zero() {
        let result = ValueResolver::resolve(CaseType::Dacao, None, &[]);
        assert!(matches!(
            result,
            Err(AgreementError::DetailNotConfigured(CaseType::Dacao))
        ));
    }

    #[test]
    fn test_detail_mismatch() {
        let detail = transaction_detail(dec!(100));
        let result = ValueResolver::resolve(CaseType::Compensation, Some(&detail), &[]);
        assert!(matches!(
            result,
            Err(AgreementError::DetailMismatch {
                expected: CaseType::Compensation,
                found: CaseType::ExceptionalTransaction,
            })
        ));
    }

    #[test]
    fn test_eligibility_gate() {
        assert!(ValueResolver::ensure_eligible(Some(DecisionOutcome::Granted)).is_ok());
        assert!(
            ValueResolver::ensure_eligible(Some(DecisionOutcome::PartiallyGranted)).is_ok()
        );
        assert!(matches!(
            ValueResolver::ensure_eligible(Some(DecisionOutcome::Denied)),
            Err(AgreementError::CaseNotEligible(DecisionOutcome::Denied))
        ));
        assert!(matches!(
            ValueResolver::ensure_eligible(None),
            Err(AgreementError::CaseNotJudged)
        ));
    }
}

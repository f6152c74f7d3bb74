//! Agreement repository for settlement term database operations.
//!
//! Agreement creation is a single atomic unit: eligibility, uniqueness,
//! value resolution and schedule generation all run inside one database
//! transaction so a failure never leaves a partial schedule behind.

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

use concilia_core::agreement::{
    AgreementDetail, AgreementError as RuleError, AgreementStatus, CompensationDetail,
    DacaoDetail, DebtLine, PaymentMethod, RegistrationPurpose, ResolvedValues, ScheduleGenerator,
    ScheduleInput, TransactionDetail, ValueResolver,
};
use concilia_core::case::CaseType;
use concilia_shared::types::PageRequest;

use crate::entities::{
    agreement_compensation_details, agreement_credits, agreement_dacao_details,
    agreement_registrations, agreement_transaction_details, agreements, cases, decisions,
    installment_payments, installments, registration_debts, sea_orm_active_enums,
};

use super::case::next_sequential_number;

/// Error types for agreement operations.
#[derive(Debug, thiserror::Error)]
pub enum AgreementError {
    /// Case not found.
    #[error("Case not found: {0}")]
    CaseNotFound(Uuid),

    /// Agreement not found.
    #[error("Agreement not found: {0}")]
    AgreementNotFound(Uuid),

    /// Installment not found.
    #[error("Installment not found: {0}")]
    InstallmentNotFound(Uuid),

    /// Case already has an active agreement.
    #[error("Case {0} already has an active agreement")]
    DuplicateActiveAgreement(Uuid),

    /// Agreement is not active.
    #[error("Agreement is not active (status: {0:?})")]
    AgreementNotActive(AgreementStatus),

    /// Unpaid installments remain on the agreement.
    #[error("{0} unpaid installment(s) remain; pass force to override")]
    UnpaidInstallments(u64),

    /// Domain rule violation from the core services.
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an agreement.
#[derive(Debug, Clone)]
pub struct CreateAgreementInput {
    /// Case the agreement settles.
    pub case_id: Uuid,
    /// Signing date; scopes the term number year.
    pub signing_date: NaiveDate,
    /// Due date of the first installment (and the entry, when present).
    pub first_due_date: NaiveDate,
    /// Type-specific detail; must match the case's type.
    pub detail: AgreementDetail,
    /// Debt registrations covered by the agreement.
    pub registrations: Vec<RegistrationInput>,
    /// Credits offered by the taxpayer.
    pub credits: Vec<CreditInput>,
}

/// One debt registration with its posted debt lines.
#[derive(Debug, Clone)]
pub struct RegistrationInput {
    /// Registration code as kept by the revenue office.
    pub registration_code: String,
    /// Role of the registration within the agreement.
    pub purpose: RegistrationPurpose,
    /// Posted debt lines under the registration.
    pub debts: Vec<DebtInput>,
}

/// One posted debt line.
#[derive(Debug, Clone)]
pub struct DebtInput {
    /// Competence period, e.g. `2023-04`.
    pub competence: Option<String>,
    /// Posted amount (valor lançado).
    pub posted_amount: Decimal,
}

/// One credit line offered by the taxpayer.
#[derive(Debug, Clone)]
pub struct CreditInput {
    /// Description of the credit.
    pub description: String,
    /// Credit amount.
    pub amount: Decimal,
}

/// Input for recording a payment against an installment.
#[derive(Debug, Clone)]
pub struct RecordPaymentInput {
    /// Amount paid; partial payments are allowed.
    pub amount: Decimal,
    /// Date the payment was made.
    pub paid_on: NaiveDate,
    /// Payment method description.
    pub method: Option<String>,
    /// Receipt number, when issued.
    pub receipt_number: Option<String>,
    /// Free-form observations.
    pub observations: Option<String>,
}

/// Filter options for listing agreements.
#[derive(Debug, Clone, Default)]
pub struct AgreementFilter {
    /// Filter by case.
    pub case_id: Option<Uuid>,
    /// Filter by status.
    pub status: Option<AgreementStatus>,
}

/// An installment together with its recorded payments.
#[derive(Debug, Clone)]
pub struct InstallmentWithPayments {
    /// Installment row.
    pub installment: installments::Model,
    /// Payments recorded against it, oldest first.
    pub payments: Vec<installment_payments::Model>,
}

/// An agreement with its detail, resolved values and full schedule.
#[derive(Debug, Clone)]
pub struct AgreementWithSchedule {
    /// Agreement row.
    pub agreement: agreements::Model,
    /// Type-specific detail.
    pub detail: AgreementDetail,
    /// Values derived from the detail and debt lines.
    pub resolved: ResolvedValues,
    /// Installment schedule, ordered by due date.
    pub installments: Vec<InstallmentWithPayments>,
}

/// Agreement repository for settlement operations.
#[derive(Debug, Clone)]
pub struct AgreementRepository {
    db: DatabaseConnection,
}

impl AgreementRepository {
    /// Creates a new agreement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an agreement with its detail, registrations, credits and
    /// generated installment schedule, and flips the case into effect.
    ///
    /// # Errors
    ///
    /// Rolls back and returns an error when the case is missing or not
    /// eligible, an active agreement already exists, the detail does not
    /// match the case type, or schedule generation fails.
    pub async fn create_agreement(
        &self,
        input: CreateAgreementInput,
    ) -> Result<AgreementWithSchedule, AgreementError> {
        let txn = self.db.begin().await?;

        let case = cases::Entity::find_by_id(input.case_id)
            .one(&txn)
            .await?
            .ok_or(AgreementError::CaseNotFound(input.case_id))?;

        let latest_decision = decisions::Entity::find()
            .filter(decisions::Column::CaseId.eq(case.id))
            .order_by_desc(decisions::Column::DecidedOn)
            .one(&txn)
            .await?;
        ValueResolver::ensure_eligible(latest_decision.map(|d| d.outcome.into()))?;

        let active_count = agreements::Entity::find()
            .filter(agreements::Column::CaseId.eq(case.id))
            .filter(agreements::Column::Status.eq(sea_orm_active_enums::AgreementStatus::Active))
            .count(&txn)
            .await?;
        if active_count > 0 {
            return Err(AgreementError::DuplicateActiveAgreement(case.id));
        }

        let case_type = CaseType::from(case.case_type.clone());
        let debt_lines: Vec<DebtLine> = input
            .registrations
            .iter()
            .flat_map(|registration| registration.debts.iter())
            .map(|debt| DebtLine {
                posted_amount: debt.posted_amount,
            })
            .collect();
        let resolved = ValueResolver::resolve(case_type, Some(&input.detail), &debt_lines)?;

        let schedule = ScheduleGenerator::generate(&schedule_input(
            &input.detail,
            resolved,
            input.first_due_date,
        ))?;

        let term_number = next_sequential_number::<agreements::Entity>(
            &txn,
            agreements::Column::TermNumber,
            input.signing_date.year(),
        )
        .await?;

        let now = Utc::now().into();
        let agreement = agreements::ActiveModel {
            id: Set(Uuid::new_v4()),
            case_id: Set(case.id),
            term_number: Set(term_number),
            status: Set(sea_orm_active_enums::AgreementStatus::Active),
            signing_date: Set(input.signing_date),
            first_due_date: Set(input.first_due_date),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let agreement = agreement.insert(&txn).await?;

        insert_detail(&txn, agreement.id, &input.detail).await?;

        for registration in &input.registrations {
            let registration_row = agreement_registrations::ActiveModel {
                id: Set(Uuid::new_v4()),
                agreement_id: Set(agreement.id),
                registration_code: Set(registration.registration_code.clone()),
                purpose: Set(registration.purpose.into()),
                created_at: Set(now),
            };
            let registration_row = registration_row.insert(&txn).await?;

            for debt in &registration.debts {
                let debt_row = registration_debts::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    registration_id: Set(registration_row.id),
                    competence: Set(debt.competence.clone()),
                    posted_amount: Set(debt.posted_amount),
                };
                debt_row.insert(&txn).await?;
            }
        }

        for credit in &input.credits {
            let credit_row = agreement_credits::ActiveModel {
                id: Set(Uuid::new_v4()),
                agreement_id: Set(agreement.id),
                description: Set(credit.description.clone()),
                amount: Set(credit.amount),
            };
            credit_row.insert(&txn).await?;
        }

        let mut stored = Vec::with_capacity(schedule.len());
        for parcel in &schedule {
            let row = installments::ActiveModel {
                id: Set(Uuid::new_v4()),
                agreement_id: Set(agreement.id),
                number: Set(i32::try_from(parcel.number).unwrap_or(i32::MAX)),
                installment_type: Set(parcel.installment_type.into()),
                status: Set(parcel.status.into()),
                amount: Set(parcel.amount),
                due_date: Set(parcel.due_date),
                payment_date: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            };
            let row = row.insert(&txn).await?;
            stored.push(InstallmentWithPayments {
                installment: row,
                payments: Vec::new(),
            });
        }

        let mut case_active: cases::ActiveModel = case.into();
        case_active.status = Set(sea_orm_active_enums::CaseStatus::AgreementInEffect);
        case_active.negotiated_value = Set(Some(resolved.final_value));
        case_active.updated_at = Set(now);
        case_active.update(&txn).await?;

        txn.commit().await?;

        Ok(AgreementWithSchedule {
            agreement,
            detail: input.detail,
            resolved,
            installments: stored,
        })
    }

    /// Fetches an agreement with its detail, resolved values and schedule.
    ///
    /// # Errors
    ///
    /// Returns `AgreementNotFound` for unknown ids and a rule error when the
    /// detail row is missing.
    pub async fn get(&self, id: Uuid) -> Result<AgreementWithSchedule, AgreementError> {
        let agreement = agreements::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AgreementError::AgreementNotFound(id))?;

        let case = cases::Entity::find_by_id(agreement.case_id)
            .one(&self.db)
            .await?
            .ok_or(AgreementError::CaseNotFound(agreement.case_id))?;
        let case_type = CaseType::from(case.case_type);

        let detail = load_detail(&self.db, agreement.id)
            .await?
            .ok_or(RuleError::DetailNotConfigured(case_type))?;

        let debt_lines = load_debt_lines(&self.db, agreement.id).await?;
        let resolved = ValueResolver::resolve(case_type, Some(&detail), &debt_lines)?;

        let rows = installments::Entity::find()
            .filter(installments::Column::AgreementId.eq(agreement.id))
            .order_by_asc(installments::Column::DueDate)
            .order_by_asc(installments::Column::Number)
            .all(&self.db)
            .await?;

        let mut schedule = Vec::with_capacity(rows.len());
        for row in rows {
            let payments = installment_payments::Entity::find()
                .filter(installment_payments::Column::InstallmentId.eq(row.id))
                .order_by_asc(installment_payments::Column::PaidOn)
                .all(&self.db)
                .await?;
            schedule.push(InstallmentWithPayments {
                installment: row,
                payments,
            });
        }

        Ok(AgreementWithSchedule {
            agreement,
            detail,
            resolved,
            installments: schedule,
        })
    }

    /// Lists agreements matching the filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list(
        &self,
        filter: &AgreementFilter,
        page: &PageRequest,
    ) -> Result<(Vec<agreements::Model>, u64), AgreementError> {
        let mut query = agreements::Entity::find();
        if let Some(case_id) = filter.case_id {
            query = query.filter(agreements::Column::CaseId.eq(case_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(
                agreements::Column::Status.eq(sea_orm_active_enums::AgreementStatus::from(status)),
            );
        }

        let total = query.clone().count(&self.db).await?;
        let items = query
            .order_by_desc(agreements::Column::SigningDate)
            .order_by_desc(agreements::Column::TermNumber)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((items, total))
    }

    /// Records a payment and recomputes the installment status.
    ///
    /// The installment turns `Paid` once the recorded payments cover its
    /// amount; the payment date is set from the covering payment.
    ///
    /// # Errors
    ///
    /// Returns `InstallmentNotFound` for unknown ids.
    pub async fn record_payment(
        &self,
        installment_id: Uuid,
        input: RecordPaymentInput,
    ) -> Result<(installments::Model, installment_payments::Model), AgreementError> {
        let txn = self.db.begin().await?;

        let installment = installments::Entity::find_by_id(installment_id)
            .one(&txn)
            .await?
            .ok_or(AgreementError::InstallmentNotFound(installment_id))?;

        let now = Utc::now().into();
        let payment = installment_payments::ActiveModel {
            id: Set(Uuid::new_v4()),
            installment_id: Set(installment.id),
            amount: Set(input.amount),
            paid_on: Set(input.paid_on),
            method: Set(input.method),
            receipt_number: Set(input.receipt_number),
            observations: Set(input.observations),
            created_at: Set(now),
        };
        let payment = payment.insert(&txn).await?;

        let paid_total: Decimal = installment_payments::Entity::find()
            .filter(installment_payments::Column::InstallmentId.eq(installment.id))
            .all(&txn)
            .await?
            .iter()
            .map(|p| p.amount)
            .sum();

        let mut active: installments::ActiveModel = installment.clone().into();
        if paid_total >= installment.amount {
            active.status = Set(sea_orm_active_enums::InstallmentStatus::Paid);
            active.payment_date = Set(Some(input.paid_on));
        }
        active.updated_at = Set(now);
        let installment = active.update(&txn).await?;

        txn.commit().await?;

        Ok((installment, payment))
    }

    /// Marks an active agreement as fulfilled.
    ///
    /// Refuses while unpaid non-fee installments remain, unless `force` is
    /// set (manual settlement by the board).
    ///
    /// # Errors
    ///
    /// Returns `AgreementNotActive` when the agreement already left the
    /// active state and `UnpaidInstallments` when the schedule is still open.
    pub async fn mark_fulfilled(
        &self,
        agreement_id: Uuid,
        force: bool,
    ) -> Result<agreements::Model, AgreementError> {
        let txn = self.db.begin().await?;

        let agreement = agreements::Entity::find_by_id(agreement_id)
            .one(&txn)
            .await?
            .ok_or(AgreementError::AgreementNotFound(agreement_id))?;

        let status = AgreementStatus::from(agreement.status.clone());
        if status != AgreementStatus::Active {
            return Err(AgreementError::AgreementNotActive(status));
        }

        let unpaid = installments::Entity::find()
            .filter(installments::Column::AgreementId.eq(agreement.id))
            .filter(
                installments::Column::InstallmentType
                    .ne(sea_orm_active_enums::InstallmentType::FeeInstallment),
            )
            .filter(
                installments::Column::Status
                    .is_in([
                        sea_orm_active_enums::InstallmentStatus::Pending,
                        sea_orm_active_enums::InstallmentStatus::Overdue,
                    ]),
            )
            .count(&txn)
            .await?;
        if unpaid > 0 && !force {
            return Err(AgreementError::UnpaidInstallments(unpaid));
        }

        let mut active: agreements::ActiveModel = agreement.into();
        active.status = Set(sea_orm_active_enums::AgreementStatus::Fulfilled);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        Ok(updated)
    }
}

/// Builds the schedule generator input from the agreement detail.
///
/// Compensation and dação settle as a single lump sum; only exceptional
/// transactions carry a modality. Legal costs and fees are charged together
/// as the separate fee installment.
fn schedule_input(
    detail: &AgreementDetail,
    resolved: ResolvedValues,
    due_date: NaiveDate,
) -> ScheduleInput {
    let (payment_method, installment_count, entry_value) = match detail {
        AgreementDetail::Transaction(t) => (t.payment_method, t.installment_count, t.entry_value),
        AgreementDetail::Compensation(_) | AgreementDetail::Dacao(_) => {
            (PaymentMethod::LumpSum, None, None)
        }
    };

    let fee_total = detail.legal_costs() + detail.fees();
    ScheduleInput {
        final_value: resolved.final_value,
        payment_method,
        installment_count,
        entry_value,
        fee_value: (fee_total > Decimal::ZERO).then_some(fee_total),
        due_date,
    }
}

/// Inserts the detail row matching the agreement's variant.
async fn insert_detail(
    txn: &DatabaseTransaction,
    agreement_id: Uuid,
    detail: &AgreementDetail,
) -> Result<(), DbErr> {
    match detail {
        AgreementDetail::Compensation(d) => {
            agreement_compensation_details::ActiveModel {
                agreement_id: Set(agreement_id),
                total_credits: Set(d.total_credits),
                total_debits: Set(d.total_debits),
                legal_costs: Set(d.legal_costs),
                fees: Set(d.fees),
            }
            .insert(txn)
            .await?;
        }
        AgreementDetail::Dacao(d) => {
            agreement_dacao_details::ActiveModel {
                agreement_id: Set(agreement_id),
                total_offered: Set(d.total_offered),
                total_to_offset: Set(d.total_to_offset),
                legal_costs: Set(d.legal_costs),
                fees: Set(d.fees),
            }
            .insert(txn)
            .await?;
        }
        AgreementDetail::Transaction(d) => {
            agreement_transaction_details::ActiveModel {
                agreement_id: Set(agreement_id),
                total_proposed: Set(d.total_proposed),
                payment_method: Set(d.payment_method.into()),
                entry_value: Set(d.entry_value),
                installment_count: Set(d
                    .installment_count
                    .map(|count| i32::try_from(count).unwrap_or(i32::MAX))),
                installment_value: Set(d.installment_value),
                legal_costs: Set(d.legal_costs),
                fees: Set(d.fees),
            }
            .insert(txn)
            .await?;
        }
    }
    Ok(())
}

/// Loads the type-specific detail for an agreement, if configured.
pub(crate) async fn load_detail(
    conn: &impl ConnectionTrait,
    agreement_id: Uuid,
) -> Result<Option<AgreementDetail>, DbErr> {
    if let Some(d) = agreement_compensation_details::Entity::find_by_id(agreement_id)
        .one(conn)
        .await?
    {
        return Ok(Some(AgreementDetail::Compensation(CompensationDetail {
            total_credits: d.total_credits,
            total_debits: d.total_debits,
            legal_costs: d.legal_costs,
            fees: d.fees,
        })));
    }

    if let Some(d) = agreement_dacao_details::Entity::find_by_id(agreement_id)
        .one(conn)
        .await?
    {
        return Ok(Some(AgreementDetail::Dacao(DacaoDetail {
            total_offered: d.total_offered,
            total_to_offset: d.total_to_offset,
            legal_costs: d.legal_costs,
            fees: d.fees,
        })));
    }

    if let Some(d) = agreement_transaction_details::Entity::find_by_id(agreement_id)
        .one(conn)
        .await?
    {
        return Ok(Some(AgreementDetail::Transaction(TransactionDetail {
            total_proposed: d.total_proposed,
            payment_method: d.payment_method.into(),
            entry_value: d.entry_value,
            installment_count: d
                .installment_count
                .map(|count| u32::try_from(count).unwrap_or(0)),
            installment_value: d.installment_value,
            legal_costs: d.legal_costs,
            fees: d.fees,
        })));
    }

    Ok(None)
}

/// Loads all posted debt lines linked to an agreement.
pub(crate) async fn load_debt_lines(
    conn: &impl ConnectionTrait,
    agreement_id: Uuid,
) -> Result<Vec<DebtLine>, DbErr> {
    let registration_ids: Vec<Uuid> = agreement_registrations::Entity::find()
        .filter(agreement_registrations::Column::AgreementId.eq(agreement_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|r| r.id)
        .collect();

    if registration_ids.is_empty() {
        return Ok(Vec::new());
    }

    let debts = registration_debts::Entity::find()
        .filter(registration_debts::Column::RegistrationId.is_in(registration_ids))
        .all(conn)
        .await?;

    Ok(debts
        .into_iter()
        .map(|d| DebtLine {
            posted_amount: d.posted_amount,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use concilia_core::agreement::{
        AgreementDetail, CompensationDetail, PaymentMethod, ResolvedValues, TransactionDetail,
    };

    use super::schedule_input;

    fn resolved(final_value: rust_decimal::Decimal) -> ResolvedValues {
        ResolvedValues {
            original_value: final_value,
            final_value,
            discount_value: rust_decimal::Decimal::ZERO,
            discount_percent: rust_decimal::Decimal::ZERO,
        }
    }

    #[test]
    fn test_compensation_schedules_as_lump_sum() {
        let detail = AgreementDetail::Compensation(CompensationDetail {
            total_credits: dec!(5000),
            total_debits: dec!(4000),
            legal_costs: None,
            fees: None,
        });

        let input = schedule_input(
            &detail,
            resolved(dec!(4000)),
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
        );

        assert_eq!(input.payment_method, PaymentMethod::LumpSum);
        assert_eq!(input.installment_count, None);
        assert_eq!(input.fee_value, None);
    }

    #[test]
    fn test_transaction_carries_modality_and_combined_fees() {
        let detail = AgreementDetail::Transaction(TransactionDetail {
            total_proposed: dec!(9000),
            payment_method: PaymentMethod::Installments,
            entry_value: Some(dec!(1000)),
            installment_count: Some(8),
            installment_value: None,
            legal_costs: Some(dec!(150)),
            fees: Some(dec!(250)),
        });

        let input = schedule_input(
            &detail,
            resolved(dec!(9000)),
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
        );

        assert_eq!(input.payment_method, PaymentMethod::Installments);
        assert_eq!(input.installment_count, Some(8));
        assert_eq!(input.entry_value, Some(dec!(1000)));
        assert_eq!(input.fee_value, Some(dec!(400)));
    }
}

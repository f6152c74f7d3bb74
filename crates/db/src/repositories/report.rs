//! Report repository feeding the dashboard aggregation engine.
//!
//! Performs the fan-out reads, flattens the rows into plain snapshots and
//! delegates the grouping to `concilia-core`, which branches on the case
//! type in memory.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use concilia_core::reports::{
    AgreementSnapshot, DashboardData, DashboardService, DateRange, DecisionSnapshot, EntityCounts,
    InstallmentSnapshot, PaymentSnapshot, ReportError,
};

use crate::entities::{
    agreements, cases, decisions, dockets, installment_payments, installments, judgment_sessions,
};

use super::agreement::{load_debt_lines, load_detail};

/// Error types for dashboard assembly.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Aggregation rejected the requested window.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Report repository for dashboard reads.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds the dashboard for the given window.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` for an inverted window and a database
    /// error when any of the fan-out reads fail.
    pub async fn dashboard(&self, range: &DateRange) -> Result<DashboardData, DashboardError> {
        // Reject an inverted window before the fan-out reads.
        range.validate()?;

        let counts = EntityCounts {
            cases: cases::Entity::find().count(&self.db).await?,
            dockets: dockets::Entity::find().count(&self.db).await?,
            sessions: judgment_sessions::Entity::find().count(&self.db).await?,
            agreements: agreements::Entity::find().count(&self.db).await?,
        };

        let agreement_snapshots = self.load_agreement_snapshots().await?;
        let decision_snapshots = self.load_decision_snapshots().await?;

        let today = Utc::now().date_naive();
        let data = DashboardService::build(
            range,
            counts,
            &agreement_snapshots,
            &decision_snapshots,
            today,
        )?;

        Ok(data)
    }

    async fn load_agreement_snapshots(&self) -> Result<Vec<AgreementSnapshot>, DbErr> {
        let agreement_rows = agreements::Entity::find().all(&self.db).await?;
        if agreement_rows.is_empty() {
            return Ok(Vec::new());
        }

        let case_types: HashMap<Uuid, cases::Model> = cases::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|case| (case.id, case))
            .collect();

        let agreement_ids: Vec<Uuid> = agreement_rows.iter().map(|a| a.id).collect();

        let installment_rows = installments::Entity::find()
            .filter(installments::Column::AgreementId.is_in(agreement_ids.clone()))
            .all(&self.db)
            .await?;
        let installment_ids: Vec<Uuid> = installment_rows.iter().map(|i| i.id).collect();

        let mut payments_by_installment: HashMap<Uuid, Vec<PaymentSnapshot>> = HashMap::new();
        if !installment_ids.is_empty() {
            for payment in installment_payments::Entity::find()
                .filter(installment_payments::Column::InstallmentId.is_in(installment_ids))
                .all(&self.db)
                .await?
            {
                payments_by_installment
                    .entry(payment.installment_id)
                    .or_default()
                    .push(PaymentSnapshot {
                        amount: payment.amount,
                        paid_at: payment.paid_on,
                    });
            }
        }

        let mut installments_by_agreement: HashMap<Uuid, Vec<InstallmentSnapshot>> =
            HashMap::new();
        for row in installment_rows {
            let payments = payments_by_installment.remove(&row.id).unwrap_or_default();
            installments_by_agreement
                .entry(row.agreement_id)
                .or_default()
                .push(InstallmentSnapshot {
                    installment_type: row.installment_type.into(),
                    status: row.status.into(),
                    amount: row.amount,
                    due_date: row.due_date,
                    payment_date: row.payment_date,
                    payments,
                });
        }

        let mut snapshots = Vec::with_capacity(agreement_rows.len());
        for agreement in agreement_rows {
            let Some(case) = case_types.get(&agreement.case_id) else {
                continue;
            };

            let detail = load_detail(&self.db, agreement.id).await?;
            let debt_lines = load_debt_lines(&self.db, agreement.id).await?;

            snapshots.push(AgreementSnapshot {
                case_type: case.case_type.clone().into(),
                status: agreement.status.into(),
                signing_date: agreement.signing_date,
                detail,
                debt_lines,
                installments: installments_by_agreement
                    .remove(&agreement.id)
                    .unwrap_or_default(),
            });
        }

        Ok(snapshots)
    }

    async fn load_decision_snapshots(&self) -> Result<Vec<DecisionSnapshot>, DbErr> {
        let decision_rows = decisions::Entity::find().all(&self.db).await?;
        if decision_rows.is_empty() {
            return Ok(Vec::new());
        }

        let case_values: HashMap<Uuid, rust_decimal::Decimal> = cases::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|case| (case.id, case.original_value))
            .collect();

        Ok(decision_rows
            .into_iter()
            .filter_map(|decision| {
                case_values.get(&decision.case_id).map(|value| DecisionSnapshot {
                    outcome: decision.outcome.into(),
                    case_value: *value,
                    decided_at: decision.decided_on,
                })
            })
            .collect())
    }
}

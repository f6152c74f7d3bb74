//! Case repository for administrative case database operations.

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use concilia_core::case::{CaseStatus, CaseType};
use concilia_shared::types::PageRequest;

use crate::entities::{agreements, cases, decisions, docket_entries, sea_orm_active_enums};

/// Error types for case operations.
#[derive(Debug, thiserror::Error)]
pub enum CaseError {
    /// Case not found.
    #[error("Case not found: {0}")]
    NotFound(Uuid),

    /// Case has decisions, docket entries or agreements and cannot be deleted.
    #[error("Case {0} has linked history and cannot be deleted")]
    CaseHasHistory(Uuid),

    /// Requested status transition is not allowed.
    #[error("Invalid status transition from {from:?} to {to:?}")]
    InvalidStatusTransition {
        /// Current status.
        from: CaseStatus,
        /// Requested status.
        to: CaseStatus,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a case.
#[derive(Debug, Clone)]
pub struct CreateCaseInput {
    /// Case type; immutable after creation.
    pub case_type: CaseType,
    /// Taxpayer display name.
    pub taxpayer_name: String,
    /// Taxpayer document (CPF/CNPJ).
    pub taxpayer_document: String,
    /// Original posted value under discussion.
    pub original_value: Decimal,
    /// Date the request was filed.
    pub opened_on: NaiveDate,
    /// Free-form annotations.
    pub notes: Option<String>,
}

/// Filter options for listing cases.
#[derive(Debug, Clone, Default)]
pub struct CaseFilter {
    /// Filter by case type.
    pub case_type: Option<CaseType>,
    /// Filter by status.
    pub status: Option<CaseStatus>,
    /// Substring match on case number or taxpayer name.
    pub search: Option<String>,
}

/// Case repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CaseRepository {
    db: DatabaseConnection,
}

impl CaseRepository {
    /// Creates a new case repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new case with a year-scoped sequential number.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create(&self, input: CreateCaseInput) -> Result<cases::Model, CaseError> {
        let txn = self.db.begin().await?;

        let year = input.opened_on.year();
        let case_number = next_sequential_number::<cases::Entity>(
            &txn,
            cases::Column::CaseNumber,
            year,
        )
        .await?;

        let now = Utc::now().into();
        let case = cases::ActiveModel {
            id: Set(Uuid::new_v4()),
            case_number: Set(case_number),
            case_type: Set(input.case_type.into()),
            status: Set(sea_orm_active_enums::CaseStatus::Intake),
            taxpayer_name: Set(input.taxpayer_name),
            taxpayer_document: Set(input.taxpayer_document),
            original_value: Set(input.original_value),
            negotiated_value: Set(None),
            opened_on: Set(input.opened_on),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = case.insert(&txn).await?;
        txn.commit().await?;

        Ok(created)
    }

    /// Fetches a case by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the id does not exist.
    pub async fn get(&self, id: Uuid) -> Result<cases::Model, CaseError> {
        cases::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CaseError::NotFound(id))
    }

    /// Lists cases matching the filter, newest first.
    ///
    /// Returns the page of cases plus the total matching count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list(
        &self,
        filter: &CaseFilter,
        page: &PageRequest,
    ) -> Result<(Vec<cases::Model>, u64), CaseError> {
        let mut condition = Condition::all();
        if let Some(case_type) = filter.case_type {
            condition = condition.add(
                cases::Column::CaseType.eq(sea_orm_active_enums::CaseType::from(case_type)),
            );
        }
        if let Some(status) = filter.status {
            condition =
                condition.add(cases::Column::Status.eq(sea_orm_active_enums::CaseStatus::from(status)));
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{search}%");
            condition = condition.add(
                Condition::any()
                    .add(cases::Column::CaseNumber.like(pattern.clone()))
                    .add(cases::Column::TaxpayerName.like(pattern)),
            );
        }

        let query = cases::Entity::find().filter(condition);
        let total = query.clone().count(&self.db).await?;
        let items = query
            .order_by_desc(cases::Column::OpenedOn)
            .order_by_desc(cases::Column::CaseNumber)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((items, total))
    }

    /// Moves a case to a new status after validating the transition.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown ids and `InvalidStatusTransition` when
    /// the lifecycle does not allow the move.
    pub async fn update_status(
        &self,
        id: Uuid,
        next: CaseStatus,
    ) -> Result<cases::Model, CaseError> {
        let case = self.get(id).await?;
        let current = CaseStatus::from(case.status.clone());

        if !current.can_transition_to(next) {
            return Err(CaseError::InvalidStatusTransition {
                from: current,
                to: next,
            });
        }

        let mut active: cases::ActiveModel = case.into();
        active.status = Set(next.into());
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a case that has no linked history.
    ///
    /// # Errors
    ///
    /// Returns `CaseHasHistory` when decisions, docket entries or agreements
    /// still reference the case.
    pub async fn delete(&self, id: Uuid) -> Result<(), CaseError> {
        let txn = self.db.begin().await?;

        let case = cases::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(CaseError::NotFound(id))?;

        let decision_count = decisions::Entity::find()
            .filter(decisions::Column::CaseId.eq(id))
            .count(&txn)
            .await?;
        let docket_count = docket_entries::Entity::find()
            .filter(docket_entries::Column::CaseId.eq(id))
            .count(&txn)
            .await?;
        let agreement_count = agreements::Entity::find()
            .filter(agreements::Column::CaseId.eq(id))
            .count(&txn)
            .await?;

        if decision_count + docket_count + agreement_count > 0 {
            return Err(CaseError::CaseHasHistory(id));
        }

        cases::Entity::delete_by_id(case.id).exec(&txn).await?;
        txn.commit().await?;

        Ok(())
    }
}

/// Computes the next `NNNN/YYYY` number for the given year by counting
/// existing rows carrying the year suffix. Concurrent creations can count
/// the same total; the UNIQUE constraint on the number column rejects the
/// loser instead of persisting a duplicate.
pub(crate) async fn next_sequential_number<E>(
    conn: &impl ConnectionTrait,
    column: impl ColumnTrait,
    year: i32,
) -> Result<String, DbErr>
where
    E: EntityTrait,
    E::Model: sea_orm::FromQueryResult + Sized + Send + Sync,
{
    let existing = E::find()
        .filter(column.like(format!("%/{year}")))
        .count(conn)
        .await?;

    Ok(format_sequential_number(existing + 1, year))
}

/// Formats a sequence number as `NNNN/YYYY`, zero-padded to four digits.
pub(crate) fn format_sequential_number(sequence: u64, year: i32) -> String {
    format!("{sequence:04}/{year}")
}

#[cfg(test)]
mod tests {
    use super::format_sequential_number;

    #[test]
    fn test_sequential_number_is_zero_padded() {
        assert_eq!(format_sequential_number(1, 2024), "0001/2024");
        assert_eq!(format_sequential_number(42, 2024), "0042/2024");
    }

    #[test]
    fn test_sequential_number_grows_past_padding() {
        assert_eq!(format_sequential_number(12345, 2025), "12345/2025");
    }
}

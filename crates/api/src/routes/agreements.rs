//! Agreement routes: creation with schedule, fulfillment and payments.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use concilia_core::agreement::{
    AgreementDetail, AgreementError as RuleError, AgreementStatus, CompensationDetail,
    DacaoDetail, InstallmentStatus, InstallmentType, PaymentMethod, RegistrationPurpose,
    TransactionDetail,
};
use concilia_db::entities::agreements;
use concilia_db::repositories::{
    AgreementError, AgreementFilter, AgreementRepository, AgreementWithSchedule,
    CreateAgreementInput, CreditInput, DebtInput, InstallmentWithPayments, RecordPaymentInput,
    RegistrationInput,
};
use concilia_shared::types::money;
use concilia_shared::types::{PageRequest, PageResponse};

use crate::AppState;
use crate::routes::format_money;

/// Creates the agreement routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/agreements", post(create_agreement))
        .route("/agreements", get(list_agreements))
        .route("/agreements/{id}", get(get_agreement))
        .route("/agreements/{id}/fulfill", post(fulfill_agreement))
        .route("/installments/{id}/payments", post(record_payment))
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for creating an agreement.
#[derive(Debug, Deserialize)]
pub struct CreateAgreementRequest {
    /// Case being settled.
    pub case_id: Uuid,
    /// Signing date.
    pub signing_date: NaiveDate,
    /// First due date (entry and fee included).
    pub first_due_date: NaiveDate,
    /// Type-specific detail; kind must match the case type.
    pub detail: DetailRequest,
    /// Debt registrations covered by the agreement.
    #[serde(default)]
    pub registrations: Vec<RegistrationRequest>,
    /// Credits offered by the taxpayer.
    #[serde(default)]
    pub credits: Vec<CreditRequest>,
}

/// Type-specific detail payload.
///
/// Money fields accept legacy comma-decimal strings; absent values read as
/// zero downstream.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetailRequest {
    /// Compensation detail.
    Compensation {
        /// Total credits offered.
        total_credits: String,
        /// Total debits to offset.
        total_debits: String,
        /// Legal costs (custas).
        legal_costs: Option<String>,
        /// Fees (honorários).
        fees: Option<String>,
    },
    /// Dação em pagamento detail.
    Dacao {
        /// Appraised value of the offered property.
        total_offered: String,
        /// Debits to offset.
        total_to_offset: String,
        /// Legal costs (custas).
        legal_costs: Option<String>,
        /// Fees (honorários).
        fees: Option<String>,
    },
    /// Exceptional-transaction detail.
    Transaction {
        /// Total value proposed by the taxpayer.
        total_proposed: String,
        /// Payment modality.
        payment_method: PaymentMethod,
        /// Entry payment.
        entry_value: Option<String>,
        /// Number of installments.
        installment_count: Option<u32>,
        /// Per-installment value as proposed.
        installment_value: Option<String>,
        /// Legal costs (custas).
        legal_costs: Option<String>,
        /// Fees (honorários).
        fees: Option<String>,
    },
}

impl DetailRequest {
    fn into_detail(self) -> AgreementDetail {
        match self {
            Self::Compensation {
                total_credits,
                total_debits,
                legal_costs,
                fees,
            } => AgreementDetail::Compensation(CompensationDetail {
                total_credits: money::parse_legacy(&total_credits),
                total_debits: money::parse_legacy(&total_debits),
                legal_costs: parse_optional(legal_costs),
                fees: parse_optional(fees),
            }),
            Self::Dacao {
                total_offered,
                total_to_offset,
                legal_costs,
                fees,
            } => AgreementDetail::Dacao(DacaoDetail {
                total_offered: money::parse_legacy(&total_offered),
                total_to_offset: money::parse_legacy(&total_to_offset),
                legal_costs: parse_optional(legal_costs),
                fees: parse_optional(fees),
            }),
            Self::Transaction {
                total_proposed,
                payment_method,
                entry_value,
                installment_count,
                installment_value,
                legal_costs,
                fees,
            } => AgreementDetail::Transaction(TransactionDetail {
                total_proposed: money::parse_legacy(&total_proposed),
                payment_method,
                entry_value: parse_optional(entry_value),
                installment_count,
                installment_value: parse_optional(installment_value),
                legal_costs: parse_optional(legal_costs),
                fees: parse_optional(fees),
            }),
        }
    }
}

fn parse_optional(raw: Option<String>) -> Option<Decimal> {
    raw.as_deref().map(money::parse_legacy)
}

/// Parses a user-supplied payment amount, rejecting anything that does not
/// normalize to a positive value (typos normalize to zero).
fn positive_amount(raw: &str) -> Option<Decimal> {
    let amount = money::parse_legacy(raw);
    (amount > Decimal::ZERO).then_some(amount)
}

/// One debt registration with its posted debt lines.
#[derive(Debug, Deserialize)]
pub struct RegistrationRequest {
    /// Registration code.
    pub registration_code: String,
    /// Role of the registration within the agreement.
    pub purpose: RegistrationPurpose,
    /// Posted debt lines.
    #[serde(default)]
    pub debts: Vec<DebtRequest>,
}

/// One posted debt line.
#[derive(Debug, Deserialize)]
pub struct DebtRequest {
    /// Competence period, e.g. `2023-04`.
    pub competence: Option<String>,
    /// Posted amount (valor lançado).
    pub posted_amount: String,
}

/// One credit line.
#[derive(Debug, Deserialize)]
pub struct CreditRequest {
    /// Description of the credit.
    pub description: String,
    /// Credit amount.
    pub amount: String,
}

/// Query parameters for listing agreements.
#[derive(Debug, Deserialize)]
pub struct ListAgreementsQuery {
    /// Filter by case.
    pub case_id: Option<Uuid>,
    /// Filter by status.
    pub status: Option<AgreementStatus>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page (capped at 100).
    pub per_page: Option<u32>,
}

/// Request body for fulfilling an agreement.
#[derive(Debug, Default, Deserialize)]
pub struct FulfillRequest {
    /// Settle manually even while unpaid installments remain.
    #[serde(default)]
    pub force: bool,
}

/// Request body for recording a payment.
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    /// Amount paid; partial payments allowed.
    pub amount: String,
    /// Date the payment was made.
    pub paid_on: NaiveDate,
    /// Payment method description.
    pub method: Option<String>,
    /// Receipt number.
    pub receipt_number: Option<String>,
    /// Free-form observations.
    pub observations: Option<String>,
}

// ============================================================================
// Response Types
// ============================================================================

/// Agreement list item.
#[derive(Debug, Serialize)]
pub struct AgreementSummaryResponse {
    /// Agreement ID.
    pub id: Uuid,
    /// Case ID.
    pub case_id: Uuid,
    /// Term number (`NNNN/YYYY`).
    pub term_number: String,
    /// Status.
    pub status: AgreementStatus,
    /// Status display label.
    pub status_label: String,
    /// Signing date.
    pub signing_date: NaiveDate,
    /// First due date.
    pub first_due_date: NaiveDate,
}

impl AgreementSummaryResponse {
    fn from_model(model: agreements::Model) -> Self {
        let status = AgreementStatus::from(model.status);
        Self {
            id: model.id,
            case_id: model.case_id,
            term_number: model.term_number,
            status,
            status_label: status.label().to_string(),
            signing_date: model.signing_date,
            first_due_date: model.first_due_date,
        }
    }
}

/// Resolved monetary values.
#[derive(Debug, Serialize)]
pub struct ResolvedValuesResponse {
    /// Value before the settlement.
    pub original_value: String,
    /// Negotiated/compensable value.
    pub final_value: String,
    /// Discount granted.
    pub discount_value: String,
    /// Discount as a percentage of the original value.
    pub discount_percent: String,
}

/// One installment with its payments.
#[derive(Debug, Serialize)]
pub struct InstallmentResponse {
    /// Installment ID.
    pub id: Uuid,
    /// Sequence number (0 reserved for the entry).
    pub number: i32,
    /// Kind of installment.
    pub installment_type: InstallmentType,
    /// Status.
    pub status: InstallmentStatus,
    /// Status display label.
    pub status_label: String,
    /// Amount due.
    pub amount: String,
    /// Remaining after recorded payments.
    pub remaining: String,
    /// Due date.
    pub due_date: NaiveDate,
    /// Date the covering payment was recorded.
    pub payment_date: Option<NaiveDate>,
    /// Recorded payments, oldest first.
    pub payments: Vec<PaymentResponse>,
}

/// One recorded payment.
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    /// Payment ID.
    pub id: Uuid,
    /// Amount paid.
    pub amount: String,
    /// Payment date.
    pub paid_on: NaiveDate,
    /// Payment method description.
    pub method: Option<String>,
    /// Receipt number.
    pub receipt_number: Option<String>,
    /// Observations.
    pub observations: Option<String>,
}

/// Full agreement representation with schedule.
#[derive(Debug, Serialize)]
pub struct AgreementResponse {
    /// Summary fields.
    #[serde(flatten)]
    pub summary: AgreementSummaryResponse,
    /// Type-specific detail, as stored.
    pub detail: AgreementDetail,
    /// Resolved values.
    pub resolved: ResolvedValuesResponse,
    /// Installment schedule, ordered by due date.
    pub installments: Vec<InstallmentResponse>,
}

impl AgreementResponse {
    fn from_schedule(full: AgreementWithSchedule) -> Self {
        Self {
            summary: AgreementSummaryResponse::from_model(full.agreement),
            detail: full.detail,
            resolved: ResolvedValuesResponse {
                original_value: format_money(full.resolved.original_value),
                final_value: format_money(full.resolved.final_value),
                discount_value: format_money(full.resolved.discount_value),
                discount_percent: format_money(full.resolved.discount_percent),
            },
            installments: full
                .installments
                .into_iter()
                .map(installment_response)
                .collect(),
        }
    }
}

fn installment_response(item: InstallmentWithPayments) -> InstallmentResponse {
    let paid_total: Decimal = item.payments.iter().map(|p| p.amount).sum();
    let remaining = (item.installment.amount - paid_total).max(Decimal::ZERO);
    let status = InstallmentStatus::from(item.installment.status);

    InstallmentResponse {
        id: item.installment.id,
        number: item.installment.number,
        installment_type: item.installment.installment_type.into(),
        status,
        status_label: status.label().to_string(),
        amount: format_money(item.installment.amount),
        remaining: format_money(remaining),
        due_date: item.installment.due_date,
        payment_date: item.installment.payment_date,
        payments: item
            .payments
            .into_iter()
            .map(|p| PaymentResponse {
                id: p.id,
                amount: format_money(p.amount),
                paid_on: p.paid_on,
                method: p.method,
                receipt_number: p.receipt_number,
                observations: p.observations,
            })
            .collect(),
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn agreement_error_response(error: AgreementError) -> axum::response::Response {
    let (status, code) = match &error {
        AgreementError::CaseNotFound(_)
        | AgreementError::AgreementNotFound(_)
        | AgreementError::InstallmentNotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        AgreementError::DuplicateActiveAgreement(_) => {
            (StatusCode::CONFLICT, "duplicate_active_agreement")
        }
        AgreementError::AgreementNotActive(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "agreement_not_active")
        }
        AgreementError::UnpaidInstallments(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "unpaid_installments")
        }
        AgreementError::Rule(rule) => match rule {
            RuleError::CaseNotEligible(_) | RuleError::CaseNotJudged => {
                (StatusCode::UNPROCESSABLE_ENTITY, "case_not_eligible")
            }
            _ => (StatusCode::BAD_REQUEST, "validation_error"),
        },
        AgreementError::Database(e) => {
            error!(error = %e, "Agreement operation failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response();
        }
    };

    (
        status,
        Json(json!({
            "error": code,
            "message": error.to_string()
        })),
    )
        .into_response()
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /agreements
#[axum::debug_handler]
async fn create_agreement(
    State(state): State<AppState>,
    Json(body): Json<CreateAgreementRequest>,
) -> impl IntoResponse {
    let input = CreateAgreementInput {
        case_id: body.case_id,
        signing_date: body.signing_date,
        first_due_date: body.first_due_date,
        detail: body.detail.into_detail(),
        registrations: body
            .registrations
            .into_iter()
            .map(|r| RegistrationInput {
                registration_code: r.registration_code,
                purpose: r.purpose,
                debts: r
                    .debts
                    .into_iter()
                    .map(|d| DebtInput {
                        competence: d.competence,
                        posted_amount: money::parse_legacy(&d.posted_amount),
                    })
                    .collect(),
            })
            .collect(),
        credits: body
            .credits
            .into_iter()
            .map(|c| CreditInput {
                description: c.description,
                amount: money::parse_legacy(&c.amount),
            })
            .collect(),
    };

    let repo = AgreementRepository::new((*state.db).clone());
    match repo.create_agreement(input).await {
        Ok(full) => (
            StatusCode::CREATED,
            Json(AgreementResponse::from_schedule(full)),
        )
            .into_response(),
        Err(e) => agreement_error_response(e),
    }
}

/// GET /agreements
#[axum::debug_handler]
async fn list_agreements(
    State(state): State<AppState>,
    Query(query): Query<ListAgreementsQuery>,
) -> impl IntoResponse {
    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };
    let filter = AgreementFilter {
        case_id: query.case_id,
        status: query.status,
    };

    let repo = AgreementRepository::new((*state.db).clone());
    match repo.list(&filter, &page).await {
        Ok((items, total)) => {
            let data: Vec<AgreementSummaryResponse> = items
                .into_iter()
                .map(AgreementSummaryResponse::from_model)
                .collect();
            Json(PageResponse::new(data, &page, total)).into_response()
        }
        Err(e) => agreement_error_response(e),
    }
}

/// GET /agreements/{id}
#[axum::debug_handler]
async fn get_agreement(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = AgreementRepository::new((*state.db).clone());
    match repo.get(id).await {
        Ok(full) => Json(AgreementResponse::from_schedule(full)).into_response(),
        Err(e) => agreement_error_response(e),
    }
}

/// POST /agreements/{id}/fulfill
#[axum::debug_handler]
async fn fulfill_agreement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<FulfillRequest>>,
) -> impl IntoResponse {
    let force = body.map(|Json(b)| b.force).unwrap_or_default();

    let repo = AgreementRepository::new((*state.db).clone());
    match repo.mark_fulfilled(id, force).await {
        Ok(model) => Json(AgreementSummaryResponse::from_model(model)).into_response(),
        Err(e) => agreement_error_response(e),
    }
}

/// POST /installments/{id}/payments
#[axum::debug_handler]
async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<PaymentRequest>,
) -> impl IntoResponse {
    let Some(amount) = positive_amount(&body.amount) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "Payment amount must be a positive value"
            })),
        )
            .into_response();
    };

    let input = RecordPaymentInput {
        amount,
        paid_on: body.paid_on,
        method: body.method,
        receipt_number: body.receipt_number,
        observations: body.observations,
    };

    let repo = AgreementRepository::new((*state.db).clone());
    match repo.record_payment(id, input).await {
        Ok((installment, payment)) => (
            StatusCode::CREATED,
            Json(json!({
                "installment": installment_response(InstallmentWithPayments {
                    installment,
                    payments: vec![payment],
                }),
            })),
        )
            .into_response(),
        Err(e) => agreement_error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::positive_amount;

    #[test]
    fn test_positive_amount_accepts_legacy_formats() {
        assert_eq!(positive_amount("150,50"), Some(dec!(150.50)));
        assert_eq!(positive_amount("150.50"), Some(dec!(150.50)));
    }

    #[test]
    fn test_positive_amount_rejects_zero_and_garbage() {
        assert_eq!(positive_amount("0"), None);
        assert_eq!(positive_amount("abc"), None);
        assert_eq!(positive_amount("-10,00"), None);
        assert_eq!(positive_amount(""), None);
    }
}

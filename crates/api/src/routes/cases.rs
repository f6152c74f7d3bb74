//! Case routes: intake, listing, status moves and deletion.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use concilia_core::case::{CaseStatus, CaseType};
use concilia_db::entities::cases;
use concilia_db::repositories::{CaseError, CaseFilter, CaseRepository, CreateCaseInput};
use concilia_shared::types::money;
use concilia_shared::types::{PageRequest, PageResponse};

use crate::AppState;
use crate::routes::format_money;

/// Creates the case routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cases", post(create_case))
        .route("/cases", get(list_cases))
        .route("/cases/{id}", get(get_case))
        .route("/cases/{id}/status", patch(update_case_status))
        .route("/cases/{id}", delete(delete_case))
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for creating a case.
#[derive(Debug, Deserialize)]
pub struct CreateCaseRequest {
    /// Case type code, e.g. `COMPENSATION`.
    pub case_type: String,
    /// Taxpayer display name.
    pub taxpayer_name: String,
    /// Taxpayer document (CPF/CNPJ).
    pub taxpayer_document: String,
    /// Original posted value; accepts legacy comma-decimal strings.
    pub original_value: Option<String>,
    /// Date the request was filed.
    pub opened_on: NaiveDate,
    /// Free-form annotations.
    pub notes: Option<String>,
}

/// Query parameters for listing cases.
#[derive(Debug, Deserialize)]
pub struct ListCasesQuery {
    /// Case type code filter.
    pub case_type: Option<String>,
    /// Status filter.
    pub status: Option<CaseStatus>,
    /// Substring match on case number or taxpayer name.
    pub search: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page (capped at 100).
    pub per_page: Option<u32>,
}

impl ListCasesQuery {
    fn page_request(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

/// Request body for moving a case to a new status.
#[derive(Debug, Deserialize)]
pub struct UpdateCaseStatusRequest {
    /// Target status.
    pub status: CaseStatus,
}

// ============================================================================
// Response Types
// ============================================================================

/// Case representation returned by the API.
#[derive(Debug, Serialize)]
pub struct CaseResponse {
    /// Case ID.
    pub id: Uuid,
    /// Human-readable number (`NNNN/YYYY`).
    pub case_number: String,
    /// Case type code.
    pub case_type: String,
    /// Case type display label.
    pub case_type_label: String,
    /// Status.
    pub status: CaseStatus,
    /// Status display label.
    pub status_label: String,
    /// Status display color token.
    pub status_color: String,
    /// Taxpayer name.
    pub taxpayer_name: String,
    /// Taxpayer document.
    pub taxpayer_document: String,
    /// Original value.
    pub original_value: String,
    /// Negotiated value, once an agreement resolves it.
    pub negotiated_value: Option<String>,
    /// Filing date.
    pub opened_on: NaiveDate,
    /// Annotations.
    pub notes: Option<String>,
}

impl CaseResponse {
    fn from_model(model: cases::Model) -> Self {
        let case_type = CaseType::from(model.case_type);
        let status = CaseStatus::from(model.status);
        Self {
            id: model.id,
            case_number: model.case_number,
            case_type: case_type.code().to_string(),
            case_type_label: case_type.label().to_string(),
            status,
            status_label: status.label().to_string(),
            status_color: status.color().to_string(),
            taxpayer_name: model.taxpayer_name,
            taxpayer_document: model.taxpayer_document,
            original_value: format_money(model.original_value),
            negotiated_value: model.negotiated_value.map(format_money),
            opened_on: model.opened_on,
            notes: model.notes,
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn case_error_response(error: CaseError) -> axum::response::Response {
    match error {
        CaseError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": error.to_string()
            })),
        )
            .into_response(),
        CaseError::CaseHasHistory(_) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "case_has_history",
                "message": error.to_string()
            })),
        )
            .into_response(),
        CaseError::InvalidStatusTransition { .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "invalid_status_transition",
                "message": error.to_string()
            })),
        )
            .into_response(),
        CaseError::Database(e) => {
            error!(error = %e, "Case operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response()
        }
    }
}

fn unsupported_case_type(code: &str) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "unsupported_case_type",
            "message": format!("Unsupported case type: {code}")
        })),
    )
        .into_response()
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /cases
#[axum::debug_handler]
async fn create_case(
    State(state): State<AppState>,
    Json(body): Json<CreateCaseRequest>,
) -> impl IntoResponse {
    let Ok(case_type) = body.case_type.parse::<CaseType>() else {
        return unsupported_case_type(&body.case_type);
    };

    let original_value = body
        .original_value
        .as_deref()
        .map_or(rust_decimal::Decimal::ZERO, money::parse_legacy);

    let repo = CaseRepository::new((*state.db).clone());
    match repo
        .create(CreateCaseInput {
            case_type,
            taxpayer_name: body.taxpayer_name,
            taxpayer_document: body.taxpayer_document,
            original_value,
            opened_on: body.opened_on,
            notes: body.notes,
        })
        .await
    {
        Ok(case) => (StatusCode::CREATED, Json(CaseResponse::from_model(case))).into_response(),
        Err(e) => case_error_response(e),
    }
}

/// GET /cases
#[axum::debug_handler]
async fn list_cases(
    State(state): State<AppState>,
    Query(query): Query<ListCasesQuery>,
) -> impl IntoResponse {
    let case_type = match query.case_type.as_deref() {
        Some(code) => match code.parse::<CaseType>() {
            Ok(parsed) => Some(parsed),
            Err(_) => return unsupported_case_type(code),
        },
        None => None,
    };

    let page = query.page_request();
    let filter = CaseFilter {
        case_type,
        status: query.status,
        search: query.search,
    };

    let repo = CaseRepository::new((*state.db).clone());
    match repo.list(&filter, &page).await {
        Ok((items, total)) => {
            let data: Vec<CaseResponse> = items.into_iter().map(CaseResponse::from_model).collect();
            Json(PageResponse::new(data, &page, total)).into_response()
        }
        Err(e) => case_error_response(e),
    }
}

/// GET /cases/{id}
#[axum::debug_handler]
async fn get_case(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = CaseRepository::new((*state.db).clone());
    match repo.get(id).await {
        Ok(case) => Json(CaseResponse::from_model(case)).into_response(),
        Err(e) => case_error_response(e),
    }
}

/// PATCH /cases/{id}/status
#[axum::debug_handler]
async fn update_case_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCaseStatusRequest>,
) -> impl IntoResponse {
    let repo = CaseRepository::new((*state.db).clone());
    match repo.update_status(id, body.status).await {
        Ok(case) => Json(CaseResponse::from_model(case)).into_response(),
        Err(e) => case_error_response(e),
    }
}

/// DELETE /cases/{id}
#[axum::debug_handler]
async fn delete_case(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = CaseRepository::new((*state.db).clone());
    match repo.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => case_error_response(e),
    }
}

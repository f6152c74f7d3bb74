//! Reporting routes: the management dashboard.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use concilia_core::case::{CaseType, DecisionOutcome};
use concilia_core::reports::{DashboardData, DateRange, EntityCounts, InstallmentStatusCounts};
use concilia_db::repositories::{DashboardError, ReportRepository};

use crate::AppState;
use crate::routes::format_money;

/// Creates the reporting routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/reports/dashboard", get(get_dashboard))
}

/// Query parameters for the dashboard.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// Window start (inclusive).
    pub from: Option<NaiveDate>,
    /// Window end (inclusive).
    pub to: Option<NaiveDate>,
}

// ============================================================================
// Response Types
// ============================================================================

/// Per-case-type totals.
#[derive(Debug, Serialize)]
pub struct CaseTypeTotalsResponse {
    /// Case type code.
    pub case_type: String,
    /// Case type display label.
    pub case_type_label: String,
    /// Number of agreements signed in the window.
    pub agreement_count: u64,
    /// Negotiated principal.
    pub principal: String,
    /// Legal costs.
    pub legal_costs: String,
    /// Fees.
    pub fees: String,
}

/// Per-decision-outcome totals.
#[derive(Debug, Serialize)]
pub struct OutcomeTotalsResponse {
    /// Outcome.
    pub outcome: DecisionOutcome,
    /// Number of decisions in the window.
    pub decision_count: u64,
    /// Summed case values.
    pub total_value: String,
}

/// One month of the collected series.
#[derive(Debug, Serialize)]
pub struct MonthlyCollectionResponse {
    /// Year.
    pub year: i32,
    /// Month (1-12).
    pub month: u32,
    /// Collected through compensation agreements.
    pub compensation: String,
    /// Collected through dação agreements.
    pub dacao: String,
    /// Collected through transaction installments.
    pub transaction: String,
    /// Monthly total.
    pub total: String,
}

/// Dashboard response body.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    /// Entity counts.
    pub counts: EntityCounts,
    /// Installment counts by status.
    pub installments: InstallmentStatusCounts,
    /// Totals per case type.
    pub by_case_type: Vec<CaseTypeTotalsResponse>,
    /// Totals per decision outcome.
    pub by_outcome: Vec<OutcomeTotalsResponse>,
    /// Monthly collected series.
    pub monthly_collections: Vec<MonthlyCollectionResponse>,
    /// Active agreements with a past-due unpaid installment.
    pub overdue_agreements: u64,
}

impl DashboardResponse {
    fn from_data(data: DashboardData) -> Self {
        Self {
            counts: data.counts,
            installments: data.installments,
            by_case_type: data
                .by_case_type
                .into_iter()
                .map(|t| {
                    let case_type: CaseType = t.case_type;
                    CaseTypeTotalsResponse {
                        case_type: case_type.code().to_string(),
                        case_type_label: case_type.label().to_string(),
                        agreement_count: t.agreement_count,
                        principal: format_money(t.principal),
                        legal_costs: format_money(t.legal_costs),
                        fees: format_money(t.fees),
                    }
                })
                .collect(),
            by_outcome: data
                .by_outcome
                .into_iter()
                .map(|t| OutcomeTotalsResponse {
                    outcome: t.outcome,
                    decision_count: t.decision_count,
                    total_value: format_money(t.total_value),
                })
                .collect(),
            monthly_collections: data
                .monthly_collections
                .into_iter()
                .map(|m| MonthlyCollectionResponse {
                    year: m.year,
                    month: m.month,
                    compensation: format_money(m.compensation),
                    dacao: format_money(m.dacao),
                    transaction: format_money(m.transaction),
                    total: format_money(m.total),
                })
                .collect(),
            overdue_agreements: data.overdue_agreements,
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /reports/dashboard
#[axum::debug_handler]
async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> impl IntoResponse {
    let range = DateRange {
        from: query.from,
        to: query.to,
    };

    let repo = ReportRepository::new((*state.db).clone());
    match repo.dashboard(&range).await {
        Ok(data) => Json(DashboardResponse::from_data(data)).into_response(),
        Err(DashboardError::Report(e)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_date_range",
                "message": e.to_string()
            })),
        )
            .into_response(),
        Err(DashboardError::Database(e)) => {
            error!(error = %e, "Dashboard assembly failed");
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

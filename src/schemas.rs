use chrono::NaiveDate;
use moka::future::Cache;
use report::{MonthCount, SummaryMetrics, TypeCount, YearCount};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::auth::SessionUser;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Login sessions, keyed by session token
    pub sessions: Cache<String, SessionUser>,
}

/// Query parameters for the dashboard.
///
/// All three are raw strings on purpose: a malformed value must fall back
/// to the unfiltered view instead of rejecting the request, so parsing is
/// done leniently in [`report::ReportFilter::from_params`] rather than by
/// the extractor.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DashboardQuery {
    /// Year to restrict to (e.g. "2024")
    pub year: Option<String>,
    /// Start of a date range (YYYY-MM-DD)
    pub date_from: Option<String>,
    /// End of a date range (YYYY-MM-DD)
    pub date_to: Option<String>,
}

/// The filter that was actually applied, echoed back so the form can be
/// pre-populated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ActiveFilter {
    pub year: Option<i32>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// The full dashboard payload: summary cards plus the three chart series.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardData {
    pub summary: SummaryMetrics,
    /// Bar chart: orders per year, most recent first
    pub orders_by_year: Vec<YearCount>,
    /// Line chart: trailing twelve months, oldest first
    pub orders_by_month: Vec<MonthCount>,
    /// Doughnut chart: top ten order types
    pub orders_by_type: Vec<TypeCount>,
    /// Years present in the order book regardless of filter, for the
    /// dropdown
    pub available_years: Vec<i32>,
    pub filter: ActiveFilter,
}

/// Credentials posted by the login form
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::dashboard::dashboard_data,
    ),
    components(
        schemas(
            ApiResponse<DashboardData>,
            ErrorResponse,
            HealthResponse,
            DashboardQuery,
            DashboardData,
            ActiveFilter,
            SummaryMetrics,
            YearCount,
            MonthCount,
            TypeCount,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "dashboard", description = "Purchase-order reporting endpoints"),
    ),
    info(
        title = "Podash API",
        description = "Purchase Order Dashboard - yearly, monthly and per-type reporting over the order book",
        version = "0.1.0",
    )
)]
pub struct ApiDoc;

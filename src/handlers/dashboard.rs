use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, Json};
use chrono::Utc;
use report::{ReportFilter, build_report, summarize};
use tracing::{error, instrument};

use crate::pages;
use crate::schemas::{
    ActiveFilter, ApiResponse, AppState, DashboardData, DashboardQuery, ErrorResponse,
};

/// Render the admin reporting page.
///
/// Staff gating happens in the router layer; by the time this runs the
/// request carries a staff session.
#[instrument(skip(state))]
pub async fn dashboard_page(
    Query(query): Query<DashboardQuery>,
    State(state): State<AppState>,
) -> Result<Html<String>, StatusCode> {
    let data = load_dashboard(&state, &query).await.map_err(|e| {
        error!("Failed to build dashboard: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Html(pages::render_dashboard(&data)))
}

/// Get the dashboard payload as JSON
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "dashboard",
    params(
        ("year" = Option<String>, Query, description = "Restrict to a single year"),
        ("date_from" = Option<String>, Query, description = "Start of a date range (YYYY-MM-DD)"),
        ("date_to" = Option<String>, Query, description = "End of a date range (YYYY-MM-DD)"),
    ),
    responses(
        (status = 200, description = "Dashboard data retrieved successfully", body = ApiResponse<DashboardData>),
        (status = 303, description = "Not logged in as staff; redirected to the login page"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn dashboard_data(
    Query(query): Query<DashboardQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardData>>, (StatusCode, Json<ErrorResponse>)> {
    let data = load_dashboard(&state, &query).await.map_err(|e| {
        error!("Failed to build dashboard: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to build dashboard data".to_string(),
                code: "ERROR".to_string(),
                success: false,
            }),
        )
    })?;

    let response = ApiResponse {
        data,
        message: "Dashboard data retrieved successfully".to_string(),
        success: true,
    };

    Ok(Json(response))
}

/// Run the aggregations and summary for one request. Malformed filter
/// values have already degraded to the unfiltered view inside
/// `ReportFilter::from_params`, so the only failure mode left here is the
/// database itself.
async fn load_dashboard(
    state: &AppState,
    query: &DashboardQuery,
) -> report::Result<DashboardData> {
    let filter = ReportFilter::from_params(
        query.year.as_deref(),
        query.date_from.as_deref(),
        query.date_to.as_deref(),
    );
    let today = Utc::now().date_naive();

    let aggregates = build_report(&state.db, &filter, today).await?;
    let summary = summarize(
        aggregates.total,
        &aggregates.by_year,
        &aggregates.by_month,
        aggregates.month_buckets,
    );

    // The year dropdown lists every year in the order book, not just the
    // ones surviving the active filter.
    let available_years: Vec<i32> = report::aggregate::orders_by_year(&state.db, &ReportFilter::All)
        .await?
        .into_iter()
        .map(|bucket| bucket.year)
        .collect();

    let (date_from, date_to) = match filter.date_range() {
        Some((from, to)) => (Some(from), Some(to)),
        None => (None, None),
    };

    Ok(DashboardData {
        summary,
        orders_by_year: aggregates.by_year,
        orders_by_month: aggregates.by_month,
        orders_by_type: aggregates.by_type,
        available_years,
        filter: ActiveFilter {
            year: filter.year(),
            date_from,
            date_to,
        },
    })
}

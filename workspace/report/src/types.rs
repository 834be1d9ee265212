//! Transport-layer types for the dashboard payload. These structs mirror
//! what the handlers serialize so the page script and the JSON API share
//! one shape.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Number of orders in one calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct YearCount {
    pub year: i32,
    pub count: i64,
}

/// Number of orders in one calendar month of the trailing-twelve-months
/// window. The label is "YYYY-MM", ready for a chart axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MonthCount {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub count: i64,
}

/// Number of orders for one order type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TypeCount {
    pub label: String,
    pub count: i64,
}

/// Scalar metrics shown in the summary cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SummaryMetrics {
    /// Total dated orders matching the active filter.
    pub total_orders: i64,
    /// Number of distinct years with at least one order.
    pub years_covered: usize,
    /// Orders in the current calendar month.
    pub current_month_count: i64,
    /// Orders in the month before the current one.
    pub previous_month_count: i64,
    /// Month-over-month change in percent. `None` when the previous month
    /// had no orders, which the page renders as "N/A".
    pub growth_percent: Option<f64>,
    /// Total divided by the number of distinct months with orders.
    pub average_per_month: f64,
}

//! Scalar metrics derived from the aggregation results.

use crate::types::{MonthCount, SummaryMetrics, YearCount};

/// Derive the summary-card metrics from the aggregation output.
///
/// `month_buckets` is the number of distinct months with at least one
/// order; it is clamped to a minimum of one so the average never divides
/// by zero. Growth is `None` whenever the previous month had no orders —
/// there is no meaningful percentage to report in that case.
pub fn summarize(
    total: i64,
    by_year: &[YearCount],
    by_month: &[MonthCount],
    month_buckets: usize,
) -> SummaryMetrics {
    let current_month_count = by_month.last().map(|m| m.count).unwrap_or(0);
    let previous_month_count = by_month
        .len()
        .checked_sub(2)
        .and_then(|i| by_month.get(i))
        .map(|m| m.count)
        .unwrap_or(0);

    let growth_percent = if previous_month_count > 0 {
        let current = current_month_count as f64;
        let previous = previous_month_count as f64;
        Some((current - previous) / previous * 100.0)
    } else {
        None
    };

    let average_per_month = if total == 0 {
        0.0
    } else {
        total as f64 / month_buckets.max(1) as f64
    };

    SummaryMetrics {
        total_orders: total,
        years_covered: by_year.len(),
        current_month_count,
        previous_month_count,
        growth_percent,
        average_per_month,
    }
}

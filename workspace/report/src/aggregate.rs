//! The grouped-count queries behind the dashboard.
//!
//! The type breakdown is grouped in the database. Year and month bucketing
//! run in Rust over a single `po_date` projection query: SQLite and
//! Postgres spell date-part extraction differently, and the fetch is one
//! indexed column of an already-filtered table.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate};
use model::entities::purchase_order;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use tracing::instrument;

use crate::error::Result;
use crate::filter::ReportFilter;
use crate::types::{MonthCount, TypeCount, YearCount};

/// The type breakdown is truncated to this many entries.
pub const TOP_TYPES_LIMIT: u64 = 10;

/// Length of the trailing month window shown in the line chart.
pub const TRAILING_MONTHS: usize = 12;

/// Everything the aggregation layer produces for one dashboard request.
#[derive(Debug, Clone)]
pub struct ReportAggregates {
    pub total: i64,
    pub by_year: Vec<YearCount>,
    pub by_month: Vec<MonthCount>,
    pub by_type: Vec<TypeCount>,
    /// Distinct (year, month) buckets with at least one order; the
    /// denominator for the monthly average.
    pub month_buckets: usize,
}

/// Run all four aggregations for the given filter. `today` anchors the
/// trailing-twelve-months window and is injected so tests can pin it.
#[instrument(skip(db))]
pub async fn build_report(
    db: &DatabaseConnection,
    filter: &ReportFilter,
    today: NaiveDate,
) -> Result<ReportAggregates> {
    let total = total_orders(db, filter).await?;
    let dates = order_dates(db, filter).await?;
    let by_type = orders_by_type(db, filter).await?;

    Ok(ReportAggregates {
        total,
        by_year: count_by_year(&dates),
        by_month: trailing_month_series(&dates, today),
        by_type,
        month_buckets: count_month_buckets(&dates),
    })
}

/// Count of dated orders matching the filter.
#[instrument(skip(db))]
pub async fn total_orders(db: &DatabaseConnection, filter: &ReportFilter) -> Result<i64> {
    let count = purchase_order::Entity::find()
        .filter(filter.condition())
        .count(db)
        .await?;
    Ok(count as i64)
}

/// Orders per year, most recent year first.
#[instrument(skip(db))]
pub async fn orders_by_year(
    db: &DatabaseConnection,
    filter: &ReportFilter,
) -> Result<Vec<YearCount>> {
    let dates = order_dates(db, filter).await?;
    Ok(count_by_year(&dates))
}

/// Orders per type, top ten by count, ties broken by label so the chart is
/// stable between requests.
#[instrument(skip(db))]
pub async fn orders_by_type(
    db: &DatabaseConnection,
    filter: &ReportFilter,
) -> Result<Vec<TypeCount>> {
    let rows: Vec<(String, i64)> = purchase_order::Entity::find()
        .select_only()
        .column(purchase_order::Column::OrderType)
        .column_as(purchase_order::Column::Id.count(), "count")
        .filter(filter.condition())
        .group_by(purchase_order::Column::OrderType)
        .order_by_desc(purchase_order::Column::Id.count())
        .order_by_asc(purchase_order::Column::OrderType)
        .limit(TOP_TYPES_LIMIT)
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(label, count)| TypeCount { label, count })
        .collect())
}

/// One projection query for the dates of all matching orders. The filter
/// predicate already excludes null dates.
async fn order_dates(db: &DatabaseConnection, filter: &ReportFilter) -> Result<Vec<NaiveDate>> {
    let dates = purchase_order::Entity::find()
        .select_only()
        .column(purchase_order::Column::PoDate)
        .filter(filter.condition())
        .into_tuple::<Option<NaiveDate>>()
        .all(db)
        .await?;
    Ok(dates.into_iter().flatten().collect())
}

fn count_by_year(dates: &[NaiveDate]) -> Vec<YearCount> {
    let mut buckets: BTreeMap<i32, i64> = BTreeMap::new();
    for date in dates {
        *buckets.entry(date.year()).or_insert(0) += 1;
    }
    buckets
        .into_iter()
        .rev()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// The twelve calendar months ending with `today`'s month, oldest first,
/// zero-filled for months with no orders.
fn trailing_month_series(dates: &[NaiveDate], today: NaiveDate) -> Vec<MonthCount> {
    let mut counts: HashMap<(i32, u32), i64> = HashMap::new();
    for date in dates {
        *counts.entry((date.year(), date.month())).or_insert(0) += 1;
    }

    let mut window = Vec::with_capacity(TRAILING_MONTHS);
    let (mut year, mut month) = (today.year(), today.month());
    for _ in 0..TRAILING_MONTHS {
        window.push((year, month));
        if month == 1 {
            year -= 1;
            month = 12;
        } else {
            month -= 1;
        }
    }
    window.reverse();

    window
        .into_iter()
        .map(|(year, month)| MonthCount {
            year,
            month,
            label: format!("{year:04}-{month:02}"),
            count: counts.get(&(year, month)).copied().unwrap_or(0),
        })
        .collect()
}

fn count_month_buckets(dates: &[NaiveDate]) -> usize {
    dates
        .iter()
        .map(|date| (date.year(), date.month()))
        .collect::<BTreeSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn setup_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
        db
    }

    async fn seed_order(db: &DatabaseConnection, order_type: &str, po_date: Option<NaiveDate>) {
        purchase_order::ActiveModel {
            order_type: Set(order_type.to_string()),
            po_date: Set(po_date),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to seed order");
    }

    #[test]
    fn year_buckets_are_descending() {
        let dates = vec![
            date(2021, 3, 1),
            date(2023, 1, 1),
            date(2021, 7, 9),
            date(2022, 5, 5),
        ];
        let buckets = count_by_year(&dates);
        assert_eq!(
            buckets,
            vec![
                YearCount { year: 2023, count: 1 },
                YearCount { year: 2022, count: 1 },
                YearCount { year: 2021, count: 2 },
            ]
        );
    }

    #[test]
    fn trailing_series_is_always_twelve_months() {
        let series = trailing_month_series(&[], date(2024, 6, 15));
        assert_eq!(series.len(), TRAILING_MONTHS);
        assert_eq!(series.first().unwrap().label, "2023-07");
        assert_eq!(series.last().unwrap().label, "2024-06");
        assert!(series.iter().all(|m| m.count == 0));
    }

    #[test]
    fn trailing_series_is_chronological_and_zero_filled() {
        let dates = vec![date(2024, 1, 10), date(2024, 1, 20), date(2024, 2, 1)];
        let series = trailing_month_series(&dates, date(2024, 2, 28));
        let labels: Vec<&str> = series.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels[0], "2023-03");
        assert_eq!(labels[11], "2024-02");
        assert!(labels.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(series[10].count, 2); // 2024-01
        assert_eq!(series[11].count, 1); // 2024-02
        assert_eq!(series[9].count, 0); // 2023-12
    }

    #[test]
    fn trailing_series_crosses_year_boundary() {
        let series = trailing_month_series(&[date(2023, 2, 1)], date(2024, 1, 1));
        assert_eq!(series.first().unwrap().label, "2023-02");
        assert_eq!(series.first().unwrap().count, 1);
        assert_eq!(series.last().unwrap().label, "2024-01");
    }

    #[test]
    fn month_buckets_are_distinct() {
        let dates = vec![
            date(2024, 1, 1),
            date(2024, 1, 31),
            date(2024, 2, 1),
            date(2023, 1, 1),
        ];
        assert_eq!(count_month_buckets(&dates), 3);
        assert_eq!(count_month_buckets(&[]), 0);
    }

    #[tokio::test]
    async fn total_excludes_undated_orders() {
        let db = setup_db().await;
        seed_order(&db, "Carton", Some(date(2024, 1, 1))).await;
        seed_order(&db, "Carton", None).await;

        let total = total_orders(&db, &ReportFilter::All).await.unwrap();
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn total_matches_sum_of_year_buckets() {
        let db = setup_db().await;
        seed_order(&db, "Carton", Some(date(2022, 4, 1))).await;
        seed_order(&db, "Label", Some(date(2023, 4, 1))).await;
        seed_order(&db, "Label", Some(date(2023, 9, 9))).await;
        seed_order(&db, "Pouch", None).await;

        for filter in [
            ReportFilter::All,
            ReportFilter::Year(2023),
            ReportFilter::DateRange {
                from: date(2022, 1, 1),
                to: date(2023, 6, 30),
            },
        ] {
            let total = total_orders(&db, &filter).await.unwrap();
            let by_year = orders_by_year(&db, &filter).await.unwrap();
            let sum: i64 = by_year.iter().map(|y| y.count).sum();
            assert_eq!(total, sum, "filter {filter:?}");
        }
    }

    #[tokio::test]
    async fn year_filter_keeps_only_that_year() {
        let db = setup_db().await;
        seed_order(&db, "Carton", Some(date(2021, 6, 1))).await;
        seed_order(&db, "Carton", Some(date(2022, 6, 1))).await;
        seed_order(&db, "Carton", Some(date(2022, 8, 1))).await;

        let by_year = orders_by_year(&db, &ReportFilter::Year(2022)).await.unwrap();
        assert_eq!(by_year, vec![YearCount { year: 2022, count: 2 }]);
    }

    #[tokio::test]
    async fn type_breakdown_is_truncated_and_tie_broken() {
        let db = setup_db().await;
        // Eleven types: "type-00" gets 12 orders, "type-01" 11, and so on
        // down to "type-10" with 2. The last one must fall off the chart.
        for i in 0..11 {
            for _ in 0..(12 - i) {
                seed_order(&db, &format!("type-{i:02}"), Some(date(2024, 1, 1))).await;
            }
        }
        // Two extra types tied at one order each, labels decide the order.
        seed_order(&db, "zeta", Some(date(2024, 1, 2))).await;
        seed_order(&db, "alpha", Some(date(2024, 1, 2))).await;

        let by_type = orders_by_type(&db, &ReportFilter::All).await.unwrap();
        assert_eq!(by_type.len(), TOP_TYPES_LIMIT as usize);
        assert_eq!(by_type[0].label, "type-00");
        assert_eq!(by_type[0].count, 12);
        assert!(by_type.windows(2).all(|w| w[0].count >= w[1].count));
        assert!(!by_type.iter().any(|t| t.label == "type-10"));

        // With the big types filtered out, the tie-break is observable.
        let tied = orders_by_type(
            &db,
            &ReportFilter::DateRange {
                from: date(2024, 1, 2),
                to: date(2024, 1, 2),
            },
        )
        .await
        .unwrap();
        assert_eq!(tied[0].label, "alpha");
        assert_eq!(tied[1].label, "zeta");
    }

    #[tokio::test]
    async fn build_report_on_empty_store() {
        let db = setup_db().await;
        let report = build_report(&db, &ReportFilter::All, date(2024, 6, 1))
            .await
            .unwrap();
        assert_eq!(report.total, 0);
        assert!(report.by_year.is_empty());
        assert_eq!(report.by_month.len(), TRAILING_MONTHS);
        assert!(report.by_month.iter().all(|m| m.count == 0));
        assert!(report.by_type.is_empty());
        assert_eq!(report.month_buckets, 0);
    }
}

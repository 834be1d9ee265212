use chrono::NaiveDate;
use model::entities::purchase_order;
use sea_orm::{ColumnTrait, Condition};
use tracing::debug;

/// Which slice of the order book a report covers.
///
/// The variants are mutually exclusive: the filter form clears the date
/// range when a year is picked and vice versa, but nothing stops a client
/// from sending both, so [`ReportFilter::from_params`] resolves the
/// ambiguity deterministically in favor of the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFilter {
    /// All time, no predicate beyond "has a date".
    All,
    /// A single calendar year.
    Year(i32),
    /// An inclusive date range.
    DateRange { from: NaiveDate, to: NaiveDate },
}

impl ReportFilter {
    /// Build a filter from raw query-string values.
    ///
    /// Parsing is deliberately lenient: a non-numeric year or an
    /// unparseable date is dropped rather than failing the request, and an
    /// inverted range (`from` after `to`) falls back to the unfiltered
    /// view. A valid year always wins over a date range.
    pub fn from_params(
        year: Option<&str>,
        date_from: Option<&str>,
        date_to: Option<&str>,
    ) -> Self {
        if let Some(raw) = year.map(str::trim).filter(|s| !s.is_empty()) {
            match raw.parse::<i32>() {
                Ok(y) if (1..=9999).contains(&y) => return ReportFilter::Year(y),
                _ => {
                    debug!(year = raw, "ignoring unusable year filter");
                }
            }
        }

        match (parse_date(date_from), parse_date(date_to)) {
            (Some(from), Some(to)) if from <= to => ReportFilter::DateRange { from, to },
            (Some(from), Some(to)) => {
                debug!(%from, %to, "ignoring inverted date range filter");
                ReportFilter::All
            }
            // A half-open range is not supported; both bounds are required.
            _ => ReportFilter::All,
        }
    }

    /// The SeaORM predicate for this filter over the `po_date` column.
    ///
    /// Undated orders are excluded in every mode so that the total always
    /// equals the sum of the year buckets.
    pub fn condition(&self) -> Condition {
        let dated = Condition::all().add(purchase_order::Column::PoDate.is_not_null());
        match self {
            ReportFilter::All => dated,
            ReportFilter::Year(year) => {
                match (
                    NaiveDate::from_ymd_opt(*year, 1, 1),
                    NaiveDate::from_ymd_opt(*year, 12, 31),
                ) {
                    (Some(from), Some(to)) => {
                        dated.add(purchase_order::Column::PoDate.between(from, to))
                    }
                    _ => dated,
                }
            }
            ReportFilter::DateRange { from, to } => {
                dated.add(purchase_order::Column::PoDate.between(*from, *to))
            }
        }
    }

    /// The year this filter restricts to, if any. Used to pre-select the
    /// dropdown in the filter form.
    pub fn year(&self) -> Option<i32> {
        match self {
            ReportFilter::Year(year) => Some(*year),
            _ => None,
        }
    }

    /// The date range this filter restricts to, if any.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            ReportFilter::DateRange { from, to } => Some((*from, *to)),
            _ => None,
        }
    }
}

fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            debug!(date = raw, "ignoring unparseable date filter");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn no_params_is_unfiltered() {
        assert_eq!(ReportFilter::from_params(None, None, None), ReportFilter::All);
        assert_eq!(
            ReportFilter::from_params(Some(""), Some(" "), None),
            ReportFilter::All
        );
    }

    #[test]
    fn year_parses() {
        assert_eq!(
            ReportFilter::from_params(Some("2022"), None, None),
            ReportFilter::Year(2022)
        );
        assert_eq!(
            ReportFilter::from_params(Some(" 2022 "), None, None),
            ReportFilter::Year(2022)
        );
    }

    #[test]
    fn year_takes_precedence_over_range() {
        let filter =
            ReportFilter::from_params(Some("2023"), Some("2021-01-01"), Some("2021-12-31"));
        assert_eq!(filter, ReportFilter::Year(2023));
    }

    #[test]
    fn bad_year_falls_through_to_range() {
        let filter =
            ReportFilter::from_params(Some("twenty22"), Some("2021-01-01"), Some("2021-06-30"));
        assert_eq!(
            filter,
            ReportFilter::DateRange {
                from: date(2021, 1, 1),
                to: date(2021, 6, 30),
            }
        );
    }

    #[test]
    fn bad_year_without_range_is_unfiltered() {
        assert_eq!(
            ReportFilter::from_params(Some("later"), None, None),
            ReportFilter::All
        );
        // Out-of-range years are unusable as date bounds
        assert_eq!(
            ReportFilter::from_params(Some("999999"), None, None),
            ReportFilter::All
        );
    }

    #[test]
    fn inverted_range_is_unfiltered() {
        assert_eq!(
            ReportFilter::from_params(None, Some("2023-06-01"), Some("2023-01-01")),
            ReportFilter::All
        );
    }

    #[test]
    fn half_open_range_is_unfiltered() {
        assert_eq!(
            ReportFilter::from_params(None, Some("2023-01-01"), None),
            ReportFilter::All
        );
        assert_eq!(
            ReportFilter::from_params(None, None, Some("2023-01-01")),
            ReportFilter::All
        );
    }

    #[test]
    fn unparseable_dates_are_unfiltered() {
        assert_eq!(
            ReportFilter::from_params(None, Some("01/02/2023"), Some("2023-12-31")),
            ReportFilter::All
        );
    }

    #[test]
    fn single_day_range_is_valid() {
        assert_eq!(
            ReportFilter::from_params(None, Some("2023-05-05"), Some("2023-05-05")),
            ReportFilter::DateRange {
                from: date(2023, 5, 5),
                to: date(2023, 5, 5),
            }
        );
    }
}

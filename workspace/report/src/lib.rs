//! Aggregation and summary logic for the purchase-order dashboard.
//!
//! This crate owns everything between the order table and the page: the
//! filter model, the grouped-count queries, and the derived summary
//! metrics. The web layer only wires query strings in and serializes the
//! results out.

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod summary;
pub mod types;

pub use aggregate::{ReportAggregates, build_report};
pub use error::{ReportError, Result};
pub use filter::ReportFilter;
pub use summary::summarize;
pub use types::{MonthCount, SummaryMetrics, TypeCount, YearCount};

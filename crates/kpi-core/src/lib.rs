#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/kpi/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and the metrics engine for client KPI dashboards.
//!
//! The engine is a set of pure, synchronous functions over in-memory series:
//!
//! - [`normalize`] - Coerce raw rows into [`PeriodRecord`]s
//! - [`window`] - Select trailing periods or days
//! - [`aggregate`](aggregate::aggregate) - Sum flows, recompute ratios
//! - [`project`](projection::project) - Extrapolate a partial month
//! - [`compare`](compare::compare) - Percent change with polarity
//! - [`compose_table`](table::compose_table) - Ordered table rows
//! - [`summarize`](summary::summarize) - KPI tiles with MoM/YoY
//!
//! Around it sit two async seams: [`RecordSource`](source::RecordSource) for
//! fetching data and [`PreferenceStore`](prefs::PreferenceStore) for
//! per-client preferences.

/// Window aggregation.
pub mod aggregate;
/// Period-over-period comparison.
pub mod compare;
/// Error types for KPI operations.
pub mod error;
/// Metric catalogue with kinds and polarities.
pub mod metric;
/// Record normalization.
pub mod normalize;
/// Calendar periods and window selectors.
pub mod period;
/// Dashboard preferences and their store trait.
pub mod prefs;
/// Month-end projection.
pub mod projection;
/// Record source trait.
pub mod source;
/// KPI tile summaries.
pub mod summary;
/// Table view composition.
pub mod table;
/// Core data types.
pub mod types;
/// Time window selection.
pub mod window;

// Re-export commonly used items at crate root
pub use aggregate::{
    AdMetrics, AggregatedMetrics, TrendView, aggregate, aggregate_daily, trend,
};
pub use compare::{ComparisonResult, PercentChange, compare, compare_metric};
pub use error::{KpiError, Result};
pub use metric::{Metric, MetricKind, Polarity};
pub use normalize::{normalize_record, normalize_series};
pub use period::{AdWindow, Period, TrailingWindow};
pub use prefs::{DashboardPreferences, PreferenceStore};
pub use projection::{ProjectedPeriod, project, project_record};
pub use source::RecordSource;
pub use summary::{DEFAULT_TILES, KpiSummary, TileSummary, summarize};
pub use table::{
    NoteField, SortDirection, SortKey, SortSpec, TableRequest, TableRow, compose_table,
};
pub use types::{
    ClientId, DailyEntry, DerivedRatios, MetricValues, PeriodNotes, PeriodRecord, RawRecord,
};
pub use window::{InProgress, select_trailing_days, select_trailing_periods};

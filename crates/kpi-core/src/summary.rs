//! KPI tile summaries.
//!
//! Each tile shows the latest period's value for one metric with a
//! month-over-month and a year-over-year comparison. A partial latest period
//! is compared using its projection. Reference periods are found by calendar
//! period, so gaps in a series yield "not applicable" rather than comparing
//! against the wrong month.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::compare::{ComparisonResult, compare_metric};
use crate::metric::Metric;
use crate::period::Period;
use crate::projection::project_record;
use crate::types::{MetricValues, PeriodRecord};

/// Tiles shown when preferences do not say otherwise.
pub const DEFAULT_TILES: [Metric; 9] = [
    Metric::Revenue,
    Metric::Profit,
    Metric::Orders,
    Metric::Sessions,
    Metric::Roas,
    Metric::AverageOrderValue,
    Metric::ConversionRate,
    Metric::CancelRate,
    Metric::ProfitMargin,
];

/// One KPI tile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileSummary {
    /// The metric shown.
    pub metric: Metric,
    /// Value for the latest period.
    pub current: f64,
    /// Change against the previous month.
    pub month_over_month: ComparisonResult,
    /// Change against the same month last year.
    pub year_over_year: ComparisonResult,
}

/// KPI tiles for a client's latest period.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    /// The latest period, or `None` for an empty series.
    pub period: Option<Period>,
    /// True if current values are a month-end projection.
    pub is_projected: bool,
    /// Tiles in the requested order.
    pub tiles: Vec<TileSummary>,
}

/// Builds KPI tiles for the latest period in `records`.
#[must_use]
pub fn summarize(records: &[PeriodRecord], tiles: &[Metric]) -> KpiSummary {
    let by_period: BTreeMap<Period, &MetricValues> = records
        .iter()
        .map(|record| (record.period, &record.metrics))
        .collect();

    let Some(latest) = records.iter().max_by_key(|record| record.period) else {
        return KpiSummary {
            tiles: tiles
                .iter()
                .map(|&metric| TileSummary {
                    metric,
                    current: 0.0,
                    month_over_month: ComparisonResult::NOT_APPLICABLE,
                    year_over_year: ComparisonResult::NOT_APPLICABLE,
                })
                .collect(),
            ..Default::default()
        };
    };

    let projection = project_record(latest);
    let is_projected = projection.is_some();
    let current = projection.map_or(latest.metrics, |p| p.projected.metrics);
    // Offsets saturate at the earliest period, which has no predecessor.
    let earlier = |period: Period| {
        (period < latest.period)
            .then(|| by_period.get(&period).copied())
            .flatten()
    };
    let previous = earlier(latest.period.previous());
    let year_ago = earlier(latest.period.year_ago());

    debug!(
        period = %latest.period,
        is_projected,
        has_previous = previous.is_some(),
        has_year_ago = year_ago.is_some(),
        "Summarizing KPI tiles"
    );

    let tiles = tiles
        .iter()
        .map(|&metric| {
            let value = metric.value(&current);
            TileSummary {
                metric,
                current: value,
                month_over_month: compare_metric(metric, value, previous.map(|m| metric.value(m))),
                year_over_year: compare_metric(metric, value, year_ago.map(|m| metric.value(m))),
            }
        })
        .collect();

    KpiSummary {
        period: Some(latest.period),
        is_projected,
        tiles,
    }
}

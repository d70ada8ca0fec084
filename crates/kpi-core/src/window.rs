//! Time window selection.
//!
//! Monthly series are sorted by calendar period before windowing because
//! sources do not guarantee storage order. Daily series are assumed to be
//! sorted already and are sliced as-is.

use tracing::debug;

use crate::period::Period;
use crate::types::PeriodRecord;

/// Policy for the period that is still in progress.
///
/// The excluded period is whatever the caller names, usually the wall-clock
/// month from [`InProgress::current`], not the latest period present in the
/// data. When a source lags behind the calendar the latest data period is
/// therefore kept.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InProgress {
    /// Keep every period.
    #[default]
    Include,
    /// Drop records for this period.
    Exclude(Period),
}

impl InProgress {
    /// Excludes the current wall-clock month.
    #[must_use]
    pub fn current() -> Self {
        Self::Exclude(Period::current())
    }

    /// Returns true if `period` is dropped by this policy.
    #[must_use]
    pub fn excludes(&self, period: Period) -> bool {
        matches!(self, Self::Exclude(excluded) if *excluded == period)
    }
}

/// Returns a chronologically sorted copy of `records`.
#[must_use]
pub fn sort_chronological(records: &[PeriodRecord]) -> Vec<PeriodRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by_key(|record| record.period);
    sorted
}

/// Selects the most recent `count` periods, in chronological order.
///
/// Records for the in-progress period are dropped first when the policy says
/// so. Fewer than `count` records are returned as-is; nothing is padded.
#[must_use]
pub fn select_trailing_periods(
    records: &[PeriodRecord],
    count: usize,
    in_progress: InProgress,
) -> Vec<PeriodRecord> {
    let mut recent: Vec<&PeriodRecord> = records
        .iter()
        .filter(|record| !in_progress.excludes(record.period))
        .collect();
    recent.sort_by(|a, b| b.period.cmp(&a.period));
    recent.truncate(count);
    recent.reverse();

    debug!(
        available = records.len(),
        requested = count,
        selected = recent.len(),
        "Selected trailing periods"
    );
    recent.into_iter().cloned().collect()
}

/// Returns the last `days` entries of an already time-sorted daily series.
#[must_use]
pub fn select_trailing_days<T>(series: &[T], days: usize) -> &[T] {
    &series[series.len().saturating_sub(days)..]
}

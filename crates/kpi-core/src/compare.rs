//! Period-over-period comparison.

use serde::{Deserialize, Serialize};

use crate::metric::{Metric, Polarity};

/// Percent change between a current value and its reference.
///
/// Serializes as a number, or `null` when not applicable.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum PercentChange {
    /// Change in percent.
    Value(f64),
    /// The reference is absent or zero.
    NotApplicable,
}

impl PercentChange {
    /// Returns the change, if applicable.
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::NotApplicable => None,
        }
    }

    /// Returns true for [`PercentChange::NotApplicable`].
    #[must_use]
    pub const fn is_not_applicable(&self) -> bool {
        matches!(self, Self::NotApplicable)
    }
}

impl From<Option<f64>> for PercentChange {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::NotApplicable, Self::Value)
    }
}

impl From<PercentChange> for Option<f64> {
    fn from(change: PercentChange) -> Self {
        change.value()
    }
}

/// Result of comparing a value against a reference.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Percent change from the reference.
    pub percent_change: PercentChange,
    /// Whether the change is good news for this metric. Not-applicable
    /// comparisons are treated as favorable (neutral).
    pub is_favorable: bool,
}

impl ComparisonResult {
    /// A neutral, not-applicable result.
    pub const NOT_APPLICABLE: Self = Self {
        percent_change: PercentChange::NotApplicable,
        is_favorable: true,
    };
}

/// Compares `current` against `reference`.
///
/// The result is not applicable when the reference is absent or exactly zero.
#[must_use]
pub fn compare(current: f64, reference: Option<f64>, polarity: Polarity) -> ComparisonResult {
    let reference = match reference {
        Some(r) if r != 0.0 => r,
        _ => return ComparisonResult::NOT_APPLICABLE,
    };
    let change = (current - reference) / reference * 100.0;
    let lower_is_better = polarity == Polarity::LowerIsBetter;
    ComparisonResult {
        percent_change: PercentChange::Value(change),
        is_favorable: (change >= 0.0) != lower_is_better,
    }
}

/// Compares using the polarity declared for `metric`.
#[must_use]
pub fn compare_metric(metric: Metric, current: f64, reference: Option<f64>) -> ComparisonResult {
    compare(current, reference, metric.polarity())
}

//! Table view composition.
//!
//! A table shows the trailing window of periods, sorted on request. When the
//! latest period is partial and projection is enabled, that period is replaced
//! by two synthetic rows, actuals then projected, pinned above the sorted rows
//! and counted within the window.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::KpiError;
use crate::metric::Metric;
use crate::period::Period;
use crate::projection::project_record;
use crate::types::{MetricValues, PeriodNotes, PeriodRecord};
use crate::window::sort_chronological;

/// A free-text annotation column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoteField {
    /// Pricing change notes.
    PricingChange,
    /// Shipping change notes.
    ShippingChange,
    /// Strategy notes.
    Strategy,
}

impl NoteField {
    const fn key(&self) -> &'static str {
        match self {
            Self::PricingChange => "pricing_change",
            Self::ShippingChange => "shipping_change",
            Self::Strategy => "strategy",
        }
    }

    fn read<'a>(&self, notes: &'a PeriodNotes) -> Option<&'a str> {
        match self {
            Self::PricingChange => notes.pricing_change.as_deref(),
            Self::ShippingChange => notes.shipping_change.as_deref(),
            Self::Strategy => notes.strategy.as_deref(),
        }
    }
}

/// A column a table can be sorted by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SortKey {
    /// Chronological by period.
    Period,
    /// Numeric by metric value.
    Metric(Metric),
    /// Lexical by annotation text.
    Note(NoteField),
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Period => f.write_str("period"),
            Self::Metric(metric) => f.write_str(metric.key()),
            Self::Note(field) => f.write_str(field.key()),
        }
    }
}

impl FromStr for SortKey {
    type Err = KpiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "period" | "month" | "date" => Ok(Self::Period),
            "pricing_change" => Ok(Self::Note(NoteField::PricingChange)),
            "shipping_change" => Ok(Self::Note(NoteField::ShippingChange)),
            "strategy" => Ok(Self::Note(NoteField::Strategy)),
            other => other.parse().map(Self::Metric),
        }
    }
}

impl TryFrom<String> for SortKey {
    type Error = KpiError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<SortKey> for String {
    fn from(key: SortKey) -> Self {
        key.to_string()
    }
}

/// Sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest, earliest or alphabetically first at the top.
    Ascending,
    /// Largest, latest or alphabetically last at the top.
    #[default]
    Descending,
}

/// A sort key and direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    /// Column to sort by.
    pub key: SortKey,
    /// Direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    /// Newest period first.
    pub const NEWEST_FIRST: Self = Self {
        key: SortKey::Period,
        direction: SortDirection::Descending,
    };

    /// Creates a sort specification.
    #[must_use]
    pub const fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }
}

/// A row of a composed table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Calendar period.
    pub period: Period,
    /// Period label.
    pub label: String,
    /// Metric values.
    pub metrics: MetricValues,
    /// Annotations.
    pub notes: PeriodNotes,
    /// Full-period estimate of a partial period.
    pub is_projection: bool,
    /// As-reported values of a partial period.
    pub is_actuals: bool,
}

impl TableRow {
    fn from_record(record: PeriodRecord, is_projection: bool, is_actuals: bool) -> Self {
        Self {
            period: record.period,
            label: record.label,
            metrics: record.metrics,
            notes: record.notes,
            is_projection,
            is_actuals,
        }
    }

    /// Returns true for the pinned actuals and projection rows.
    #[must_use]
    pub const fn is_pinned(&self) -> bool {
        self.is_projection || self.is_actuals
    }
}

/// Parameters for [`compose_table`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableRequest {
    /// Maximum number of rows, pinned rows included.
    pub window: usize,
    /// Replace a partial latest period with actuals and projected rows.
    pub project: bool,
    /// Sort order for unpinned rows; newest first when absent.
    pub sort: Option<SortSpec>,
}

impl TableRequest {
    /// Creates a request for `window` rows with projection enabled.
    #[must_use]
    pub const fn new(window: usize) -> Self {
        Self {
            window,
            project: true,
            sort: None,
        }
    }

    /// Sets the sort order.
    #[must_use]
    pub const fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Enables or disables projection.
    #[must_use]
    pub const fn with_projection(mut self, project: bool) -> Self {
        self.project = project;
        self
    }
}

#[derive(Debug, PartialEq)]
enum SortValue<'a> {
    Period(Period),
    Number(f64),
    Text(&'a str),
}

impl SortValue<'_> {
    fn order(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Period(a), Self::Period(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

fn sort_value(row: &TableRow, key: SortKey) -> Option<SortValue<'_>> {
    match key {
        SortKey::Period => Some(SortValue::Period(row.period)),
        SortKey::Metric(metric) => {
            let value = metric.value(&row.metrics);
            value.is_finite().then_some(SortValue::Number(value))
        }
        SortKey::Note(field) => field.read(&row.notes).map(SortValue::Text),
    }
}

/// Orders two rows; rows without a value for the key sort last in either direction.
fn compare_rows(a: &TableRow, b: &TableRow, spec: SortSpec) -> Ordering {
    match (sort_value(a, spec.key), sort_value(b, spec.key)) {
        (Some(x), Some(y)) => match spec.direction {
            SortDirection::Ascending => x.order(&y),
            SortDirection::Descending => y.order(&x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Composes the ordered row set for a table view.
#[must_use]
pub fn compose_table(records: &[PeriodRecord], request: TableRequest) -> Vec<TableRow> {
    let mut chronological = sort_chronological(records);

    let projection = if request.project {
        chronological.last().and_then(project_record)
    } else {
        None
    };

    let mut pinned = Vec::new();
    if let Some(projection) = projection {
        chronological.pop();
        pinned.push(TableRow::from_record(projection.actuals, false, true));
        pinned.push(TableRow::from_record(projection.projected, true, false));
    }

    let keep = request.window.saturating_sub(pinned.len());
    let oldest_kept = chronological.len().saturating_sub(keep);
    let mut rows: Vec<TableRow> = chronological
        .into_iter()
        .skip(oldest_kept)
        .map(|record| TableRow::from_record(record, false, false))
        .collect();

    let spec = request.sort.unwrap_or(SortSpec::NEWEST_FIRST);
    rows.sort_by(|a, b| compare_rows(a, b, spec));

    debug!(
        pinned = pinned.len(),
        rows = rows.len(),
        window = request.window,
        sort = %spec.key,
        "Composed table"
    );

    pinned.extend(rows);
    pinned.truncate(request.window);
    pinned
}

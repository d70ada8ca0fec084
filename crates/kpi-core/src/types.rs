//! Core data types for client performance data.
//!
//! This module defines the fundamental data structures:
//!
//! - [`ClientId`] - Identifier of an agency client
//! - [`RawRecord`] - One spreadsheet row as delivered by a record source
//! - [`MetricValues`] - Canonical numeric metrics of one period
//! - [`DerivedRatios`] - Ratio metrics recomputed from flow metrics
//! - [`PeriodNotes`] - Free-text annotations attached to a period
//! - [`PeriodRecord`] - A normalized monthly record
//! - [`DailyEntry`] - One day of ad-platform data

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::normalize::safe_div;
use crate::period::Period;

/// Identifier of an agency client.
///
/// Surrounding whitespace is trimmed on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClientId(String);

impl ClientId {
    /// Creates a new client identifier.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        let s = s.into();
        Self(s.trim().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ClientId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for ClientId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ClientId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// One row of periodic data exactly as a record source delivers it.
///
/// Column values may be numbers, numeric strings (`"$1,204.50"`, `"3.1%"`),
/// free text, null, or absent entirely. See [`crate::normalize`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Period label (`"January 2024"`, `"2024-01"`, `"2024-01-31"`).
    #[serde(alias = "Month", alias = "month", alias = "Date", alias = "date")]
    pub period: String,
    /// Every other column, keyed by its header.
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl RawRecord {
    /// Creates an empty row for a period label.
    #[must_use]
    pub fn new(period: impl Into<String>) -> Self {
        Self {
            period: period.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Sets a column value.
    #[must_use]
    pub fn with_field(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(column.into(), value.into());
        self
    }
}

/// Canonical numeric metrics of one period.
///
/// Flow metrics accumulate over the period and may be summed or scaled.
/// `average_order_value`, `conversion_rate` and `roas` are the values the
/// source reported; they are recomputed whenever flows change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricValues {
    /// Gross revenue.
    pub revenue: f64,
    /// Profit.
    pub profit: f64,
    /// Orders placed.
    pub orders: f64,
    /// Orders canceled.
    pub canceled_orders: f64,
    /// Store sessions.
    pub sessions: f64,
    /// Advertising spend.
    pub ad_spend: f64,
    /// Ad-attributed conversions.
    pub conversions: f64,
    /// Ad clicks.
    pub clicks: f64,
    /// Average order value.
    pub average_order_value: f64,
    /// Conversion rate, in percent.
    pub conversion_rate: f64,
    /// Return on ad spend.
    pub roas: f64,
    /// Average days from order to fulfillment.
    pub avg_fulfillment_days: f64,
}

impl MetricValues {
    /// Ratio metrics derived from this record's flow metrics.
    #[must_use]
    pub fn ratios(&self) -> DerivedRatios {
        DerivedRatios::from_flows(
            self.revenue,
            self.profit,
            self.orders,
            self.canceled_orders,
            self.sessions,
            self.ad_spend,
            self.clicks,
        )
    }

    /// Returns a copy with every flow metric multiplied by `factor` and the
    /// reported ratios recomputed from the scaled flows.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            revenue: self.revenue * factor,
            profit: self.profit * factor,
            orders: self.orders * factor,
            canceled_orders: self.canceled_orders * factor,
            sessions: self.sessions * factor,
            ad_spend: self.ad_spend * factor,
            conversions: self.conversions * factor,
            clicks: self.clicks * factor,
            ..*self
        }
        .with_recomputed_ratios()
    }

    /// Replaces the reported ratio fields with values derived from the flows.
    #[must_use]
    pub fn with_recomputed_ratios(mut self) -> Self {
        let ratios = self.ratios();
        self.average_order_value = ratios.average_order_value;
        self.conversion_rate = ratios.conversion_rate;
        self.roas = ratios.roas;
        self
    }
}

/// Ratio metrics computed from flow metrics.
///
/// Every quotient with a zero denominator is zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedRatios {
    /// Revenue per order.
    pub average_order_value: f64,
    /// Canceled orders per order, in percent.
    pub cancel_rate: f64,
    /// Revenue per unit of ad spend.
    pub roas: f64,
    /// Orders per session, in percent.
    pub conversion_rate: f64,
    /// Profit per unit of revenue, in percent.
    pub profit_margin: f64,
    /// Profit per order.
    pub profit_per_order: f64,
    /// Ad spend per click.
    pub cost_per_click: f64,
}

impl DerivedRatios {
    /// Computes the ratios from (possibly summed or scaled) flow totals.
    #[must_use]
    pub fn from_flows(
        revenue: f64,
        profit: f64,
        orders: f64,
        canceled_orders: f64,
        sessions: f64,
        ad_spend: f64,
        clicks: f64,
    ) -> Self {
        Self {
            average_order_value: safe_div(revenue, orders),
            cancel_rate: safe_div(canceled_orders, orders) * 100.0,
            roas: safe_div(revenue, ad_spend),
            conversion_rate: safe_div(orders, sessions) * 100.0,
            profit_margin: safe_div(profit, revenue) * 100.0,
            profit_per_order: safe_div(profit, orders),
            cost_per_click: safe_div(ad_spend, clicks),
        }
    }
}

/// Free-text annotations attached to a period.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodNotes {
    /// Pricing changes made during the period.
    pub pricing_change: Option<String>,
    /// Shipping policy changes made during the period.
    pub shipping_change: Option<String>,
    /// Strategy notes from the account team.
    pub strategy: Option<String>,
}

/// A normalized record of one client's performance in one period.
///
/// Records are read-only snapshots; derived views build new records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// The calendar period covered.
    pub period: Period,
    /// The label the source used for this period.
    pub label: String,
    /// Numeric metrics.
    pub metrics: MetricValues,
    /// Free-text annotations.
    pub notes: PeriodNotes,
    /// Days of data collected so far, for a period still in progress.
    pub days_of_data: Option<u32>,
}

impl PeriodRecord {
    /// Creates a record with the period's display name as its label.
    #[must_use]
    pub fn new(period: Period, metrics: MetricValues) -> Self {
        Self {
            period,
            label: period.to_string(),
            metrics,
            notes: PeriodNotes::default(),
            days_of_data: None,
        }
    }

    /// Sets the number of days of data collected so far.
    #[must_use]
    pub fn with_days_of_data(mut self, days: u32) -> Self {
        self.days_of_data = Some(days);
        self
    }

    /// Sets the annotations.
    #[must_use]
    pub fn with_notes(mut self, notes: PeriodNotes) -> Self {
        self.notes = notes;
        self
    }

    /// Returns true if fewer days of data exist than the period has.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.days_of_data
            .is_some_and(|days| days > 0 && days < self.period.days_in_period())
    }
}

/// One day of ad-platform data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    /// Calendar day.
    pub date: NaiveDate,
    /// Ad spend.
    #[serde(default)]
    pub spend: f64,
    /// Clicks.
    #[serde(default)]
    pub clicks: f64,
    /// Impressions.
    #[serde(default)]
    pub impressions: f64,
    /// Conversions.
    #[serde(default)]
    pub conversions: f64,
    /// Revenue attributed to conversions.
    #[serde(default)]
    pub conversion_value: f64,
}

impl DailyEntry {
    /// Creates an entry with all metrics zero.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self {
            date,
            spend: 0.0,
            clicks: 0.0,
            impressions: 0.0,
            conversions: 0.0,
            conversion_value: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id_trims() {
        assert_eq!(ClientId::new("  acme-outdoor ").as_str(), "acme-outdoor");
    }

    #[test]
    fn test_raw_record_deserializes_flattened_columns() {
        let json = r#"{"Month": "January 2024", "Revenue": "$1,200", "Orders": 12}"#;
        let raw: RawRecord = serde_json::from_str(json).unwrap();
        assert_eq!(raw.period, "January 2024");
        assert_eq!(raw.fields.len(), 2);
        assert_eq!(raw.fields["Orders"], Value::from(12));
    }

    #[test]
    fn test_ratios_zero_on_empty_denominators() {
        let ratios = MetricValues::default().ratios();
        assert_eq!(ratios, DerivedRatios::default());
    }

    #[test]
    fn test_scaled_recomputes_reported_ratios() {
        let values = MetricValues {
            revenue: 1000.0,
            orders: 10.0,
            sessions: 500.0,
            ad_spend: 250.0,
            // Stale reported values that must not survive scaling.
            average_order_value: 1.0,
            conversion_rate: 1.0,
            roas: 1.0,
            avg_fulfillment_days: 2.5,
            ..Default::default()
        };
        let scaled = values.scaled(2.0);
        assert_eq!(scaled.revenue, 2000.0);
        assert_eq!(scaled.average_order_value, 100.0);
        assert_eq!(scaled.roas, 4.0);
        assert_eq!(scaled.conversion_rate, 2.0);
        assert_eq!(scaled.avg_fulfillment_days, 2.5);
        // Input untouched.
        assert_eq!(values.revenue, 1000.0);
    }

    #[test]
    fn test_scaled_covers_every_flow_metric() {
        use crate::metric::{Metric, MetricKind};

        let values = MetricValues {
            revenue: 1.0,
            profit: 2.0,
            orders: 3.0,
            canceled_orders: 4.0,
            sessions: 5.0,
            ad_spend: 6.0,
            conversions: 7.0,
            clicks: 8.0,
            avg_fulfillment_days: 9.0,
            ..Default::default()
        };
        let scaled = values.scaled(3.0);
        for metric in Metric::ALL {
            let (before, after) = (metric.value(&values), metric.value(&scaled));
            match metric.kind() {
                MetricKind::Flow => assert_eq!(after, before * 3.0, "{metric} not scaled"),
                MetricKind::Level => assert_eq!(after, before, "{metric} scaled"),
                MetricKind::Ratio => {}
            }
        }
    }

    #[test]
    fn test_is_partial() {
        let period = Period::new(2024, 6).unwrap();
        let record = PeriodRecord::new(period, MetricValues::default());
        assert!(!record.is_partial());
        assert!(record.clone().with_days_of_data(12).is_partial());
        assert!(!record.clone().with_days_of_data(30).is_partial());
        assert!(!record.with_days_of_data(0).is_partial());
    }
}

//! Record normalization.
//!
//! Raw rows arrive with heterogeneous columns: numbers, currency or percent
//! strings, blanks, nulls, or nothing at all. Normalization coerces every
//! declared metric to a finite number, substituting `0.0` for anything missing
//! or unusable. Column headers are matched ignoring case, spacing and
//! punctuation, so `"Ad Spend"`, `"ad_spend"` and `"AdSpend"` are the same
//! column.

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::error::Result;
use crate::period::Period;
use crate::types::{MetricValues, PeriodNotes, PeriodRecord, RawRecord};

const REVENUE: &[&str] = &["revenue", "totalrevenue", "sales", "totalsales", "grosssales"];
const PROFIT: &[&str] = &["profit", "netprofit", "grossprofit"];
const ORDERS: &[&str] = &["orders", "totalorders", "ordercount"];
const CANCELED_ORDERS: &[&str] = &[
    "canceledorders",
    "cancelledorders",
    "cancellations",
    "cancelations",
];
const SESSIONS: &[&str] = &["sessions", "visits", "totalsessions"];
const AD_SPEND: &[&str] = &["adspend", "spend", "adcost", "cost"];
const CONVERSIONS: &[&str] = &["conversions", "adconversions"];
const CLICKS: &[&str] = &["clicks", "adclicks"];
const AVERAGE_ORDER_VALUE: &[&str] = &["aov", "averageordervalue", "avgordervalue"];
const CONVERSION_RATE: &[&str] = &["conversionrate", "convrate", "cvr"];
const ROAS: &[&str] = &["roas", "returnonadspend"];
const FULFILLMENT_DAYS: &[&str] = &[
    "avgfulfillmentdays",
    "averagefulfillmentdays",
    "fulfillmentdays",
];
const DAYS_OF_DATA: &[&str] = &["daysofdata", "daysofdatasofar", "daysofdatacollected"];
const PRICING_CHANGE: &[&str] = &["pricingchange", "pricingchanges", "pricingnotes"];
const SHIPPING_CHANGE: &[&str] = &["shippingchange", "shippingchanges", "shippingnotes"];
const STRATEGY: &[&str] = &["strategy", "strategynotes", "notes"];

/// Divides, returning `0.0` when the denominator is zero or the result is not finite.
#[must_use]
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    finite_or_zero(numerator / denominator)
}

/// Returns `value`, or `0.0` for NaN and infinities.
#[must_use]
pub const fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Coerces a raw cell to a finite number.
///
/// Strings have currency symbols, thousands separators and percent signs
/// stripped before parsing. Anything unparseable is `0.0`.
#[must_use]
pub fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().map_or(0.0, finite_or_zero),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !matches!(c, '$' | '€' | '£' | ',' | '%') && !c.is_whitespace())
                .collect();
            cleaned.parse::<f64>().map_or(0.0, finite_or_zero)
        }
        _ => 0.0,
    }
}

fn canonical_column(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Column lookup keyed by canonical header.
struct Columns<'a>(BTreeMap<String, &'a Value>);

impl<'a> Columns<'a> {
    fn new(fields: &'a BTreeMap<String, Value>) -> Self {
        Self(
            fields
                .iter()
                .map(|(name, value)| (canonical_column(name), value))
                .collect(),
        )
    }

    fn find(&self, aliases: &[&str]) -> Option<&'a Value> {
        aliases.iter().find_map(|alias| self.0.get(*alias).copied())
    }

    fn number(&self, aliases: &[&str]) -> f64 {
        self.find(aliases).map_or(0.0, coerce_number)
    }

    fn text(&self, aliases: &[&str]) -> Option<String> {
        match self.find(aliases)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }
}

/// Coerces the metric columns of a row. Never fails.
#[must_use]
pub fn normalize_metrics(fields: &BTreeMap<String, Value>) -> MetricValues {
    let columns = Columns::new(fields);
    MetricValues {
        revenue: columns.number(REVENUE),
        profit: columns.number(PROFIT),
        orders: columns.number(ORDERS),
        canceled_orders: columns.number(CANCELED_ORDERS),
        sessions: columns.number(SESSIONS),
        ad_spend: columns.number(AD_SPEND),
        conversions: columns.number(CONVERSIONS),
        clicks: columns.number(CLICKS),
        average_order_value: columns.number(AVERAGE_ORDER_VALUE),
        conversion_rate: columns.number(CONVERSION_RATE),
        roas: columns.number(ROAS),
        avg_fulfillment_days: columns.number(FULFILLMENT_DAYS),
    }
}

/// Normalizes one row.
///
/// # Errors
///
/// Returns [`KpiError::Parse`](crate::KpiError::Parse) if the period label is
/// not recognized. Metric columns never cause an error.
pub fn normalize_record(raw: &RawRecord) -> Result<PeriodRecord> {
    let period: Period = raw.period.parse()?;
    let columns = Columns::new(&raw.fields);

    let days_of_data = columns
        .find(DAYS_OF_DATA)
        .map(coerce_number)
        .filter(|days| *days >= 1.0)
        .map(|days| days.round() as u32);

    Ok(PeriodRecord {
        period,
        label: raw.period.trim().to_string(),
        metrics: normalize_metrics(&raw.fields),
        notes: PeriodNotes {
            pricing_change: columns.text(PRICING_CHANGE),
            shipping_change: columns.text(SHIPPING_CHANGE),
            strategy: columns.text(STRATEGY),
        },
        days_of_data,
    })
}

/// Normalizes a batch of rows, skipping rows whose period label is unparseable.
#[must_use]
pub fn normalize_series(raws: &[RawRecord]) -> Vec<PeriodRecord> {
    let records: Vec<PeriodRecord> = raws
        .iter()
        .filter_map(|raw| match normalize_record(raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(label = %raw.period, error = %e, "Skipping row with unparseable period");
                None
            }
        })
        .collect();
    debug!(
        input = raws.len(),
        normalized = records.len(),
        "Normalized period rows"
    );
    records
}

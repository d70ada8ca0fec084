//! Metric catalogue.
//!
//! Every metric declares its [`MetricKind`] (how it may be combined across
//! periods) and its [`Polarity`] (which direction of change is good). Polarity
//! is declared here and never inferred from data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::KpiError;
use crate::types::MetricValues;

/// How a metric combines across periods.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    /// Accumulates over time; summed across windows and scaled by projection.
    Flow,
    /// Quotient of two flows; recomputed from summed components.
    Ratio,
    /// A per-order average carried through unchanged by projection.
    Level,
}

/// Which direction of change is favorable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    /// Increases are good.
    #[default]
    HigherIsBetter,
    /// Decreases are good.
    LowerIsBetter,
}

/// A dashboard metric.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Gross revenue.
    Revenue,
    /// Profit.
    Profit,
    /// Orders placed.
    Orders,
    /// Orders canceled.
    CanceledOrders,
    /// Store sessions.
    Sessions,
    /// Advertising spend.
    AdSpend,
    /// Ad conversions.
    Conversions,
    /// Ad clicks.
    Clicks,
    /// Average order value.
    AverageOrderValue,
    /// Conversion rate (%).
    ConversionRate,
    /// Cancellation rate (%).
    CancelRate,
    /// Return on ad spend.
    Roas,
    /// Profit margin (%).
    ProfitMargin,
    /// Profit per order.
    ProfitPerOrder,
    /// Cost per click.
    CostPerClick,
    /// Average days to fulfillment.
    AvgFulfillmentDays,
}

impl Metric {
    /// Every metric, in display order.
    pub const ALL: [Self; 16] = [
        Self::Revenue,
        Self::Profit,
        Self::Orders,
        Self::CanceledOrders,
        Self::Sessions,
        Self::AdSpend,
        Self::Conversions,
        Self::Clicks,
        Self::AverageOrderValue,
        Self::ConversionRate,
        Self::CancelRate,
        Self::Roas,
        Self::ProfitMargin,
        Self::ProfitPerOrder,
        Self::CostPerClick,
        Self::AvgFulfillmentDays,
    ];

    /// Stable key used in preferences and sort specifications.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::Profit => "profit",
            Self::Orders => "orders",
            Self::CanceledOrders => "canceled_orders",
            Self::Sessions => "sessions",
            Self::AdSpend => "ad_spend",
            Self::Conversions => "conversions",
            Self::Clicks => "clicks",
            Self::AverageOrderValue => "average_order_value",
            Self::ConversionRate => "conversion_rate",
            Self::CancelRate => "cancel_rate",
            Self::Roas => "roas",
            Self::ProfitMargin => "profit_margin",
            Self::ProfitPerOrder => "profit_per_order",
            Self::CostPerClick => "cost_per_click",
            Self::AvgFulfillmentDays => "avg_fulfillment_days",
        }
    }

    /// How this metric combines across periods.
    #[must_use]
    pub const fn kind(&self) -> MetricKind {
        match self {
            Self::Revenue
            | Self::Profit
            | Self::Orders
            | Self::CanceledOrders
            | Self::Sessions
            | Self::AdSpend
            | Self::Conversions
            | Self::Clicks => MetricKind::Flow,
            Self::AvgFulfillmentDays => MetricKind::Level,
            _ => MetricKind::Ratio,
        }
    }

    /// Which direction of change is favorable.
    #[must_use]
    pub const fn polarity(&self) -> Polarity {
        match self {
            Self::CanceledOrders
            | Self::CancelRate
            | Self::CostPerClick
            | Self::AvgFulfillmentDays => Polarity::LowerIsBetter,
            _ => Polarity::HigherIsBetter,
        }
    }

    /// Reads this metric from a record's values.
    ///
    /// Reported ratios (AOV, conversion rate, ROAS) are read as stored; the
    /// remaining ratios are derived from the flows.
    #[must_use]
    pub fn value(&self, values: &MetricValues) -> f64 {
        match self {
            Self::Revenue => values.revenue,
            Self::Profit => values.profit,
            Self::Orders => values.orders,
            Self::CanceledOrders => values.canceled_orders,
            Self::Sessions => values.sessions,
            Self::AdSpend => values.ad_spend,
            Self::Conversions => values.conversions,
            Self::Clicks => values.clicks,
            Self::AverageOrderValue => values.average_order_value,
            Self::ConversionRate => values.conversion_rate,
            Self::Roas => values.roas,
            Self::AvgFulfillmentDays => values.avg_fulfillment_days,
            Self::CancelRate => values.ratios().cancel_rate,
            Self::ProfitMargin => values.ratios().profit_margin,
            Self::ProfitPerOrder => values.ratios().profit_per_order,
            Self::CostPerClick => values.ratios().cost_per_click,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Metric {
    type Err = KpiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|metric| metric.key() == s)
            .ok_or_else(|| KpiError::Parse(format!("unknown metric '{s}'")))
    }
}

//! Window aggregation.
//!
//! Flow metrics are summed. Ratio metrics are recomputed from the summed
//! numerator and denominator; per-period ratios are never averaged, since that
//! would overweight periods with small denominators.

use serde::{Deserialize, Serialize};

use crate::metric::Metric;
use crate::normalize::safe_div;
use crate::types::{DailyEntry, DerivedRatios, PeriodRecord};
use crate::window::{InProgress, select_trailing_periods};

/// Totals and ratios over a window of periods.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedMetrics {
    /// Number of periods aggregated.
    pub periods: usize,
    /// Total revenue.
    pub revenue: f64,
    /// Total profit.
    pub profit: f64,
    /// Total orders.
    pub orders: f64,
    /// Total canceled orders.
    pub canceled_orders: f64,
    /// Total sessions.
    pub sessions: f64,
    /// Total ad spend.
    pub ad_spend: f64,
    /// Total conversions.
    pub conversions: f64,
    /// Total clicks.
    pub clicks: f64,
    /// Ratios recomputed from the totals.
    pub ratios: DerivedRatios,
    /// Order-weighted mean fulfillment days.
    pub avg_fulfillment_days: f64,
}

impl AggregatedMetrics {
    /// Returns true if the window contained no periods.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.periods == 0
    }

    /// Reads a metric from the aggregate.
    #[must_use]
    pub const fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Revenue => self.revenue,
            Metric::Profit => self.profit,
            Metric::Orders => self.orders,
            Metric::CanceledOrders => self.canceled_orders,
            Metric::Sessions => self.sessions,
            Metric::AdSpend => self.ad_spend,
            Metric::Conversions => self.conversions,
            Metric::Clicks => self.clicks,
            Metric::AverageOrderValue => self.ratios.average_order_value,
            Metric::ConversionRate => self.ratios.conversion_rate,
            Metric::CancelRate => self.ratios.cancel_rate,
            Metric::Roas => self.ratios.roas,
            Metric::ProfitMargin => self.ratios.profit_margin,
            Metric::ProfitPerOrder => self.ratios.profit_per_order,
            Metric::CostPerClick => self.ratios.cost_per_click,
            Metric::AvgFulfillmentDays => self.avg_fulfillment_days,
        }
    }
}

/// Aggregates a window of periods. An empty window yields all zeros.
#[must_use]
pub fn aggregate(periods: &[PeriodRecord]) -> AggregatedMetrics {
    let mut totals = AggregatedMetrics {
        periods: periods.len(),
        ..Default::default()
    };
    let mut fulfillment_weighted = 0.0;

    for record in periods {
        let m = &record.metrics;
        totals.revenue += m.revenue;
        totals.profit += m.profit;
        totals.orders += m.orders;
        totals.canceled_orders += m.canceled_orders;
        totals.sessions += m.sessions;
        totals.ad_spend += m.ad_spend;
        totals.conversions += m.conversions;
        totals.clicks += m.clicks;
        fulfillment_weighted += m.avg_fulfillment_days * m.orders;
    }

    totals.ratios = DerivedRatios::from_flows(
        totals.revenue,
        totals.profit,
        totals.orders,
        totals.canceled_orders,
        totals.sessions,
        totals.ad_spend,
        totals.clicks,
    );
    totals.avg_fulfillment_days = safe_div(fulfillment_weighted, totals.orders);
    totals
}

/// A trailing window of periods with its totals, for trend charts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendView {
    /// Periods in chronological order.
    pub periods: Vec<PeriodRecord>,
    /// Totals over `periods`.
    pub totals: AggregatedMetrics,
}

/// Selects the trailing `count` periods and aggregates them.
#[must_use]
pub fn trend(records: &[PeriodRecord], count: usize, in_progress: InProgress) -> TrendView {
    let periods = select_trailing_periods(records, count, in_progress);
    let totals = aggregate(&periods);
    TrendView { periods, totals }
}

/// Totals and ratios over a window of daily ad-platform data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AdMetrics {
    /// Number of days aggregated.
    pub days: usize,
    /// Total spend.
    pub spend: f64,
    /// Total clicks.
    pub clicks: f64,
    /// Total impressions.
    pub impressions: f64,
    /// Total conversions.
    pub conversions: f64,
    /// Total conversion value.
    pub conversion_value: f64,
    /// Conversion value per unit of spend.
    pub roas: f64,
    /// Spend per click.
    pub cost_per_click: f64,
    /// Clicks per impression, in percent.
    pub click_through_rate: f64,
    /// Spend per conversion.
    pub cost_per_conversion: f64,
}

/// Aggregates daily ad-platform entries with the same sum-then-ratio rule.
#[must_use]
pub fn aggregate_daily(entries: &[DailyEntry]) -> AdMetrics {
    let mut totals = entries.iter().fold(
        AdMetrics {
            days: entries.len(),
            ..Default::default()
        },
        |mut acc, entry| {
            acc.spend += entry.spend;
            acc.clicks += entry.clicks;
            acc.impressions += entry.impressions;
            acc.conversions += entry.conversions;
            acc.conversion_value += entry.conversion_value;
            acc
        },
    );
    totals.roas = safe_div(totals.conversion_value, totals.spend);
    totals.cost_per_click = safe_div(totals.spend, totals.clicks);
    totals.click_through_rate = safe_div(totals.clicks, totals.impressions) * 100.0;
    totals.cost_per_conversion = safe_div(totals.spend, totals.conversions);
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::Period;
    use crate::types::MetricValues;
    use chrono::NaiveDate;

    const EPSILON: f64 = 1e-9;

    fn record(month: u32, metrics: MetricValues) -> PeriodRecord {
        PeriodRecord::new(Period::new(2024, month).unwrap(), metrics)
    }

    /// Two periods with very different spend: ratio-of-sums and
    /// mean-of-ratios disagree.
    fn skewed_window() -> Vec<PeriodRecord> {
        vec![
            record(
                1,
                MetricValues {
                    revenue: 100.0,
                    ad_spend: 10.0,
                    clicks: 100.0,
                    orders: 1.0,
                    sessions: 10.0,
                    roas: 10.0,
                    ..Default::default()
                },
            ),
            record(
                2,
                MetricValues {
                    revenue: 1000.0,
                    ad_spend: 1000.0,
                    clicks: 100.0,
                    orders: 9.0,
                    sessions: 990.0,
                    roas: 1.0,
                    ..Default::default()
                },
            ),
        ]
    }

    #[test]
    fn test_ratios_are_ratio_of_sums() {
        let totals = aggregate(&skewed_window());
        assert_eq!(totals.periods, 2);
        assert!((totals.revenue - 1100.0).abs() < EPSILON);
        assert!((totals.ad_spend - 1010.0).abs() < EPSILON);

        let roas_of_sums = 1100.0 / 1010.0;
        let mean_of_roas = (10.0 + 1.0) / 2.0;
        assert!((totals.ratios.roas - roas_of_sums).abs() < EPSILON);
        assert!((totals.ratios.roas - mean_of_roas).abs() > 1.0);

        assert!((totals.ratios.cost_per_click - 1010.0 / 200.0).abs() < EPSILON);
        assert!((totals.ratios.conversion_rate - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_value_sums_every_flow_metric() {
        use crate::metric::MetricKind;

        let window = skewed_window();
        let totals = aggregate(&window);
        for metric in Metric::ALL {
            let summed: f64 = window.iter().map(|r| metric.value(&r.metrics)).sum();
            match metric.kind() {
                MetricKind::Flow => {
                    assert!((totals.value(metric) - summed).abs() < EPSILON, "{metric}");
                }
                MetricKind::Ratio | MetricKind::Level => {}
            }
        }
        assert!((totals.value(Metric::Roas) - totals.ratios.roas).abs() < EPSILON);
        assert!((totals.value(Metric::CostPerClick) - 1010.0 / 200.0).abs() < EPSILON);
    }

    #[test]
    fn test_empty_window_is_zero() {
        let totals = aggregate(&[]);
        assert!(totals.is_empty());
        assert_eq!(totals, AggregatedMetrics::default());
    }

    #[test]
    fn test_zero_denominators() {
        let window = vec![record(
            3,
            MetricValues {
                revenue: 500.0,
                ..Default::default()
            },
        )];
        let totals = aggregate(&window);
        assert_eq!(totals.ratios.roas, 0.0);
        assert_eq!(totals.ratios.average_order_value, 0.0);
        assert_eq!(totals.ratios.cost_per_click, 0.0);
    }

    #[test]
    fn test_fulfillment_days_weighted_by_orders() {
        let window = vec![
            record(
                1,
                MetricValues {
                    orders: 1.0,
                    avg_fulfillment_days: 10.0,
                    ..Default::default()
                },
            ),
            record(
                2,
                MetricValues {
                    orders: 3.0,
                    avg_fulfillment_days: 2.0,
                    ..Default::default()
                },
            ),
        ];
        assert!((aggregate(&window).avg_fulfillment_days - 4.0).abs() < EPSILON);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let window = skewed_window();
        let first = aggregate(&window);
        let second = aggregate(&window);
        assert_eq!(first.ratios.roas.to_bits(), second.ratios.roas.to_bits());
        assert_eq!(first, second);
    }

    #[test]
    fn test_trend_sums_only_complete_periods() {
        let mut window = skewed_window();
        window.push(record(
            3,
            MetricValues {
                revenue: 5.0,
                ..Default::default()
            },
        ));
        let current = Period::new(2024, 3).unwrap();
        let view = trend(&window, 12, InProgress::Exclude(current));
        assert_eq!(view.periods.len(), 2);
        assert_eq!(view.totals.periods, 2);
        assert!((view.totals.revenue - 1100.0).abs() < EPSILON);
    }

    #[test]
    fn test_aggregate_daily() {
        let day = |d: u32, spend: f64, clicks: f64, value: f64| DailyEntry {
            spend,
            clicks,
            impressions: clicks * 50.0,
            conversions: 1.0,
            conversion_value: value,
            ..DailyEntry::new(NaiveDate::from_ymd_opt(2024, 5, d).unwrap())
        };
        let totals = aggregate_daily(&[day(1, 10.0, 20.0, 50.0), day(2, 30.0, 20.0, 30.0)]);
        assert_eq!(totals.days, 2);
        assert!((totals.roas - 2.0).abs() < EPSILON);
        assert!((totals.cost_per_click - 1.0).abs() < EPSILON);
        assert!((totals.click_through_rate - 2.0).abs() < EPSILON);
        assert!((totals.cost_per_conversion - 20.0).abs() < EPSILON);
        assert_eq!(aggregate_daily(&[]), AdMetrics::default());
    }
}

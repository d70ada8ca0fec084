//! Month-end projection.
//!
//! A partial month is extrapolated linearly to a full month: flow metrics are
//! multiplied by `days_in_period / days_of_data`, then every ratio is
//! recomputed from the scaled flows. Ratios are never scaled directly.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::PeriodRecord;

/// A partial period alongside its full-period estimate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPeriod {
    /// The record as reported, unscaled.
    pub actuals: PeriodRecord,
    /// The full-period estimate.
    pub projected: PeriodRecord,
    /// Multiplier applied to flow metrics.
    pub factor: f64,
}

/// Projects a partial-period record to the full period.
///
/// Returns `None` when no projection is needed: `days_of_data` is already at
/// least `days_in_period`, or `days_of_data` is not a positive number. The
/// input record is left untouched.
#[must_use]
pub fn project(
    record: &PeriodRecord,
    days_of_data: f64,
    days_in_period: f64,
) -> Option<ProjectedPeriod> {
    if !days_of_data.is_finite() || days_of_data <= 0.0 || days_of_data >= days_in_period {
        return None;
    }

    let factor = days_in_period / days_of_data;
    let projected = PeriodRecord {
        metrics: record.metrics.scaled(factor),
        ..record.clone()
    };

    debug!(
        period = %record.period,
        days_of_data,
        days_in_period,
        factor,
        "Projected partial period"
    );

    Some(ProjectedPeriod {
        actuals: record.clone(),
        projected,
        factor,
    })
}

/// Projects a record using its own `days_of_data` and its calendar length.
///
/// Only [partial](PeriodRecord::is_partial) records are projected.
#[must_use]
pub fn project_record(record: &PeriodRecord) -> Option<ProjectedPeriod> {
    if !record.is_partial() {
        return None;
    }
    let days_of_data = record.days_of_data?;
    project(
        record,
        f64::from(days_of_data),
        f64::from(record.period.days_in_period()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::Period;
    use crate::types::MetricValues;

    const EPSILON: f64 = 1e-9;

    fn half_month() -> PeriodRecord {
        PeriodRecord::new(
            Period::new(2024, 6).unwrap(),
            MetricValues {
                revenue: 1000.0,
                profit: 200.0,
                orders: 20.0,
                canceled_orders: 2.0,
                sessions: 800.0,
                ad_spend: 250.0,
                // Reported ratios deliberately inconsistent with the flows.
                average_order_value: 55.0,
                roas: 3.0,
                conversion_rate: 9.0,
                avg_fulfillment_days: 1.5,
                ..Default::default()
            },
        )
        .with_days_of_data(15)
    }

    #[test]
    fn test_no_projection_for_complete_period() {
        let record = half_month();
        assert!(project(&record, 30.0, 30.0).is_none());
        assert!(project(&record, 31.0, 30.0).is_none());
    }

    #[test]
    fn test_no_projection_for_non_positive_days() {
        let record = half_month();
        assert!(project(&record, 0.0, 30.0).is_none());
        assert!(project(&record, -3.0, 30.0).is_none());
        assert!(project(&record, f64::NAN, 30.0).is_none());
    }

    #[test]
    fn test_projection_scales_flows_and_recomputes_ratios() {
        let record = half_month();
        let result = project(&record, 15.0, 30.0).unwrap();
        let p = &result.projected.metrics;

        assert!((result.factor - 2.0).abs() < EPSILON);
        assert!((p.revenue - 2000.0).abs() < EPSILON);
        assert!((p.orders - 40.0).abs() < EPSILON);
        assert!((p.sessions - 1600.0).abs() < EPSILON);

        // Recomputed from scaled flows, not the reported ratios scaled.
        assert!((p.average_order_value - 50.0).abs() < EPSILON);
        assert!((p.roas - 4.0).abs() < EPSILON);
        assert!((p.conversion_rate - 2.5).abs() < EPSILON);

        let ratios = p.ratios();
        assert!((ratios.cancel_rate - 10.0).abs() < EPSILON);
        assert!((ratios.profit_margin - 20.0).abs() < EPSILON);
        assert!((ratios.profit_per_order - 10.0).abs() < EPSILON);

        assert!((p.avg_fulfillment_days - 1.5).abs() < EPSILON);
    }

    #[test]
    fn test_actuals_preserved_and_input_untouched() {
        let record = half_month();
        let result = project(&record, 15.0, 30.0).unwrap();
        assert_eq!(result.actuals, record);
        assert_eq!(result.projected.period, record.period);
        assert!((record.metrics.revenue - 1000.0).abs() < EPSILON);
    }

    #[test]
    fn test_zero_denominators_after_scaling() {
        let record = PeriodRecord::new(
            Period::new(2024, 6).unwrap(),
            MetricValues {
                revenue: 10.0,
                ..Default::default()
            },
        );
        let result = project(&record, 10.0, 30.0).unwrap();
        assert_eq!(result.projected.metrics.roas, 0.0);
        assert_eq!(result.projected.metrics.average_order_value, 0.0);
    }

    #[test]
    fn test_project_record_uses_calendar_length() {
        // June has 30 days.
        let result = project_record(&half_month()).unwrap();
        assert!((result.factor - 2.0).abs() < EPSILON);

        let complete = half_month().with_days_of_data(30);
        assert!(!complete.is_partial());
        assert!(project_record(&complete).is_none());

        let empty = half_month().with_days_of_data(0);
        assert!(project_record(&empty).is_none());

        let mut unknown = half_month();
        unknown.days_of_data = None;
        assert!(project_record(&unknown).is_none());
    }

    #[test]
    fn test_projection_is_idempotent() {
        let record = half_month();
        assert_eq!(project(&record, 15.0, 30.0), project(&record, 15.0, 30.0));
    }
}

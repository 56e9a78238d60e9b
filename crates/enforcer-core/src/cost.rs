//! Cost projection.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Average hours in a month (365 * 24 / 12, rounded).
pub const HOURS_PER_MONTH: f64 = 730.0;

/// A point-in-time hourly cost for one workload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSample {
    pub hourly_cost: f64,
}

impl CostSample {
    pub fn hourly(hourly_cost: f64) -> Self {
        Self { hourly_cost }
    }
}

/// Projected monthly savings of removing a workload costing `hourly_cost`.
///
/// Not rounded; currency formatting is left to the presentation layer.
pub fn monthly_savings(hourly_cost: f64) -> f64 {
    hourly_cost * HOURS_PER_MONTH
}

/// Compact duration for reason text: whole days as `"2d"`, otherwise
/// whole hours, falling back to minutes and seconds for short spans.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.num_seconds().max(0);

    if secs >= 86_400 && secs % 86_400 == 0 {
        format!("{}d", secs / 86_400)
    } else if secs >= 3_600 {
        format!("{}h", secs / 3_600)
    } else if secs >= 60 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_savings() {
        assert_eq!(monthly_savings(1.0), 730.0);
        assert_eq!(monthly_savings(2.5), 1825.0);
        assert_eq!(monthly_savings(0.0), 0.0);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::hours(48)), "2d");
        assert_eq!(format_duration(Duration::hours(24)), "1d");
        assert_eq!(format_duration(Duration::hours(36)), "36h");
        assert_eq!(format_duration(Duration::minutes(90)), "1h");
        assert_eq!(format_duration(Duration::minutes(45)), "45m");
        assert_eq!(format_duration(Duration::seconds(30)), "30s");
        assert_eq!(format_duration(Duration::seconds(-5)), "0s");
    }
}

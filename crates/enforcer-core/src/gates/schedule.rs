//! Timezone-aware active-hours evaluation.
//!
//! Hour ranges are inclusive at both ends with one-hour resolution. A range
//! whose start is after its end (e.g. `[22, 6]`) never matches.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use tracing::warn;

use crate::policy::{ActiveHours, ScheduleSpec};
use crate::types::GateKind;

use super::{Gate, GateContext, GateOutcome};

/// A schedule that cannot be interpreted must not disable enforcement forever.
pub const ACTIVE_WHEN_TIMEZONE_UNKNOWN: bool = true;

/// A schedule with no windows has no active time.
pub const ACTIVE_WHEN_NO_WINDOWS: bool = false;

/// Whether `now` falls inside any of the schedule's windows.
pub fn is_within_schedule(schedule: &ScheduleSpec, now: DateTime<Utc>) -> bool {
    let tz: Tz = match schedule.timezone.parse() {
        Ok(tz) => tz,
        Err(_) => {
            warn!(timezone = %schedule.timezone, "unknown schedule timezone; treating schedule as active");
            return ACTIVE_WHEN_TIMEZONE_UNKNOWN;
        }
    };

    if schedule.active_hours.is_empty() {
        return ACTIVE_WHEN_NO_WINDOWS;
    }

    let local = now.with_timezone(&tz);
    let day = weekday_abbrev(local.weekday());
    let hour = i64::from(local.hour());

    schedule
        .active_hours
        .iter()
        .any(|window| window_matches(window, day, hour))
}

fn window_matches(window: &ActiveHours, day: &str, hour: i64) -> bool {
    if !window.days.iter().any(|d| d == day) {
        return false;
    }

    match window.hours.as_slice() {
        [start, end] => *start <= hour && hour <= *end,
        _ => false,
    }
}

fn weekday_abbrev(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Schedule gate; skipped without a schedule.
pub struct ScheduleGate;

impl Gate for ScheduleGate {
    fn kind(&self) -> GateKind {
        GateKind::Schedule
    }

    fn check(&self, ctx: &GateContext<'_>) -> GateOutcome {
        match &ctx.policy.spec.schedule {
            Some(schedule) => GateOutcome::from_check(is_within_schedule(schedule, ctx.now)),
            None => GateOutcome::Skipped,
        }
    }
}

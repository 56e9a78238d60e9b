//! Idle detection from the last-activity timestamp.
//!
//! Only the timestamp is consulted. Traffic and utilization thresholds in the
//! policy are for telemetry collaborators that pre-filter candidates; see
//! [`crate::policy::TrafficThreshold::qualifies_as_idle`].

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use crate::state::{Timestamp, WorkloadState};
use crate::types::GateKind;

use super::{Gate, GateContext, GateOutcome};

/// No recorded activity means no observed activity.
pub const IDLE_WHEN_ACTIVITY_MISSING: bool = true;

/// A corrupt activity record must not pin a workload forever.
pub const IDLE_WHEN_ACTIVITY_INVALID: bool = true;

/// Whether the workload has been inactive for at least `idle_window`.
pub fn is_idle_long_enough(state: &WorkloadState, idle_window: Duration, now: DateTime<Utc>) -> bool {
    match &state.last_activity {
        Timestamp::Missing => IDLE_WHEN_ACTIVITY_MISSING,
        Timestamp::Invalid(raw) => {
            warn!(value = %raw, "unparsable last-activity timestamp; treating workload as idle");
            IDLE_WHEN_ACTIVITY_INVALID
        }
        Timestamp::At(last_activity) => now - *last_activity >= idle_window,
    }
}

/// Idle window gate.
pub struct IdleGate;

impl Gate for IdleGate {
    fn kind(&self) -> GateKind {
        GateKind::IdleWindow
    }

    fn check(&self, ctx: &GateContext<'_>) -> GateOutcome {
        GateOutcome::from_check(is_idle_long_enough(
            ctx.state,
            ctx.policy.spec.conditions.idle_window.as_duration(),
            ctx.now,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn state(last_activity: Timestamp) -> WorkloadState {
        WorkloadState {
            paused: false,
            paused_at: Timestamp::Missing,
            excluded: false,
            last_activity,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_missing_activity_is_idle() {
        assert!(is_idle_long_enough(&state(Timestamp::Missing), Duration::hours(24), now()));
    }

    #[test]
    fn test_invalid_activity_is_idle() {
        let s = state(Timestamp::Invalid("yesterday-ish".to_string()));
        assert!(is_idle_long_enough(&s, Duration::hours(24), now()));
    }

    #[test]
    fn test_idle_window_boundary() {
        let window = Duration::hours(24);

        let exactly = state(Timestamp::At(now() - window));
        assert!(is_idle_long_enough(&exactly, window, now()));

        let just_short = state(Timestamp::At(now() - window + Duration::seconds(1)));
        assert!(!is_idle_long_enough(&just_short, window, now()));

        let long_ago = state(Timestamp::At(now() - Duration::hours(48)));
        assert!(is_idle_long_enough(&long_ago, window, now()));
    }

    #[test]
    fn test_future_activity_is_not_idle() {
        let s = state(Timestamp::At(now() + Duration::hours(1)));
        assert!(!is_idle_long_enough(&s, Duration::zero(), now()));
    }
}

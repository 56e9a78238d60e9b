//! Cooldown between successive actions on the same workload.

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use crate::state::{Timestamp, WorkloadState};
use crate::types::GateKind;

use super::{Gate, GateContext, GateOutcome};

/// A workload that was never paused has no cooldown to wait out.
pub const COOLDOWN_EXPIRED_WHEN_NEVER_ACTED: bool = true;

/// A corrupt paused-at record must not block re-evaluation.
pub const COOLDOWN_EXPIRED_WHEN_INVALID: bool = true;

/// Whether at least `cooldown_window` has elapsed since the last action.
///
/// A zero or negative window always counts as expired.
pub fn is_cooldown_expired(
    state: &WorkloadState,
    cooldown_window: Duration,
    now: DateTime<Utc>,
) -> bool {
    if cooldown_window <= Duration::zero() {
        return true;
    }

    match &state.paused_at {
        Timestamp::Missing => COOLDOWN_EXPIRED_WHEN_NEVER_ACTED,
        Timestamp::Invalid(raw) => {
            warn!(value = %raw, "unparsable paused-at timestamp; treating cooldown as expired");
            COOLDOWN_EXPIRED_WHEN_INVALID
        }
        Timestamp::At(paused_at) => now - *paused_at >= cooldown_window,
    }
}

/// Cooldown gate; skipped when the policy sets no cooldown window.
pub struct CooldownGate;

impl Gate for CooldownGate {
    fn kind(&self) -> GateKind {
        GateKind::Cooldown
    }

    fn check(&self, ctx: &GateContext<'_>) -> GateOutcome {
        let window = ctx.policy.spec.enforcement.cooldown_window;
        if window.is_zero() {
            return GateOutcome::Skipped;
        }

        GateOutcome::from_check(is_cooldown_expired(ctx.state, window.as_duration(), ctx.now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn state(paused_at: Timestamp) -> WorkloadState {
        WorkloadState {
            paused: false,
            paused_at,
            excluded: false,
            last_activity: Timestamp::Missing,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_never_acted_is_expired() {
        assert!(is_cooldown_expired(&state(Timestamp::Missing), Duration::hours(6), now()));
    }

    #[test]
    fn test_invalid_timestamp_is_expired() {
        let s = state(Timestamp::Invalid("not-a-time".to_string()));
        assert!(is_cooldown_expired(&s, Duration::hours(6), now()));
    }

    #[test]
    fn test_zero_window_always_expired() {
        let s = state(Timestamp::At(now()));
        assert!(is_cooldown_expired(&s, Duration::zero(), now()));
    }

    #[test]
    fn test_window_boundary() {
        let window = Duration::hours(6);

        let recent = state(Timestamp::At(now() - Duration::hours(1)));
        assert!(!is_cooldown_expired(&recent, window, now()));

        let exactly = state(Timestamp::At(now() - window));
        assert!(is_cooldown_expired(&exactly, window, now()));

        let older = state(Timestamp::At(now() - Duration::hours(7)));
        assert!(is_cooldown_expired(&older, window, now()));
    }
}

//! The evaluation gates.
//!
//! Each gate answers one yes/no question about a workload. The engine runs
//! them in [`PIPELINE`] order and stops at the first failure, so a gate may
//! assume every earlier gate passed.
//!
//! Gates that depend on optional policy sections return
//! [`GateOutcome::Skipped`] when that section is absent.

mod cooldown;
mod cost;
mod idle;
mod markers;
pub mod pattern;
mod schedule;
mod scope;

use chrono::{DateTime, Utc};

use crate::cost::CostSample;
use crate::policy::Policy;
use crate::state::WorkloadState;
use crate::types::{GateKind, Workload};

pub use cooldown::{
    is_cooldown_expired, CooldownGate, COOLDOWN_EXPIRED_WHEN_INVALID,
    COOLDOWN_EXPIRED_WHEN_NEVER_ACTED,
};
pub use cost::CostGate;
pub use idle::{
    is_idle_long_enough, IdleGate, IDLE_WHEN_ACTIVITY_INVALID, IDLE_WHEN_ACTIVITY_MISSING,
};
pub use markers::{ExclusionGate, PausedGate};
pub use schedule::{
    is_within_schedule, ScheduleGate, ACTIVE_WHEN_NO_WINDOWS, ACTIVE_WHEN_TIMEZONE_UNKNOWN,
};
pub use scope::{in_scope, matches_labels, matches_namespace, LabelGate, NamespaceGate};

/// Everything a gate may look at during one evaluation.
pub struct GateContext<'a> {
    pub policy: &'a Policy,
    pub workload: &'a Workload,
    pub state: &'a WorkloadState,
    pub cost: &'a CostSample,
    /// Read once per evaluation and shared by every gate
    pub now: DateTime<Utc>,
}

/// Outcome of one gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Pass,
    Fail,
    /// The policy does not configure this gate
    Skipped,
}

impl GateOutcome {
    pub fn from_check(passed: bool) -> Self {
        if passed {
            GateOutcome::Pass
        } else {
            GateOutcome::Fail
        }
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, GateOutcome::Fail)
    }
}

/// Trait implemented by every gate.
pub trait Gate: Send + Sync {
    /// Which gate this is.
    fn kind(&self) -> GateKind;

    /// Check the workload.
    fn check(&self, ctx: &GateContext<'_>) -> GateOutcome;
}

/// Gates in evaluation order.
pub const PIPELINE: [&dyn Gate; 8] = [
    &PausedGate,
    &ExclusionGate,
    &NamespaceGate,
    &LabelGate,
    &CostGate,
    &IdleGate,
    &ScheduleGate,
    &CooldownGate,
];

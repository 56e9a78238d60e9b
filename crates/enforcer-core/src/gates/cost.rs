//! Minimum hourly cost threshold.

use crate::types::GateKind;

use super::{Gate, GateContext, GateOutcome};

/// Passes when the workload costs at least the policy's minimum.
pub struct CostGate;

impl Gate for CostGate {
    fn kind(&self) -> GateKind {
        GateKind::CostThreshold
    }

    fn check(&self, ctx: &GateContext<'_>) -> GateOutcome {
        GateOutcome::from_check(
            ctx.cost.hourly_cost >= ctx.policy.spec.conditions.min_hourly_cost,
        )
    }
}

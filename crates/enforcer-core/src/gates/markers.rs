//! Pause and exclusion markers.

use crate::types::GateKind;

use super::{Gate, GateContext, GateOutcome};

/// Fails for workloads that are already scaled to zero.
pub struct PausedGate;

impl Gate for PausedGate {
    fn kind(&self) -> GateKind {
        GateKind::AlreadyPaused
    }

    fn check(&self, ctx: &GateContext<'_>) -> GateOutcome {
        GateOutcome::from_check(!ctx.state.paused)
    }
}

/// Fails for workloads their owners opted out.
pub struct ExclusionGate;

impl Gate for ExclusionGate {
    fn kind(&self) -> GateKind {
        GateKind::ExcludedByAnnotation
    }

    fn check(&self, ctx: &GateContext<'_>) -> GateOutcome {
        GateOutcome::from_check(!ctx.state.excluded)
    }
}

//! Reporting seam for evaluation outcomes.
//!
//! The engine hands every result to an [`EvaluationReporter`] after it is
//! built. Metrics exporters implement the trait; the engine never owns
//! counters itself.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use tracing::info;

use crate::types::{EvaluationResult, GateKind};

/// Receives every evaluation result the engine produces.
pub trait EvaluationReporter: Send + Sync {
    fn record_evaluation(&self, result: &EvaluationResult);
}

/// Discards results.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl EvaluationReporter for NoopReporter {
    fn record_evaluation(&self, _result: &EvaluationResult) {}
}

/// Emits one structured log event per result.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl EvaluationReporter for TracingReporter {
    fn record_evaluation(&self, result: &EvaluationResult) {
        info!(
            policy = %result.policy,
            workload = %result.workload,
            matched = result.matched,
            reason = %result.reason,
            gate = result.blocked_by.map(|g| g.name()).unwrap_or("none"),
            hourly_cost = result.cost.hourly_cost,
            dry_run = ?result.action.as_ref().map(|a| a.dry_run),
            "policy evaluated"
        );
    }
}

/// Counter snapshot from an [`InMemoryReporter`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportCounters {
    pub evaluations: u64,
    pub matches_by_policy: BTreeMap<String, u64>,
    pub blocked_by_gate: BTreeMap<GateKind, u64>,
    pub actions: u64,
    pub dry_run_actions: u64,
    pub estimated_monthly_savings: f64,
}

impl ReportCounters {
    pub fn matches(&self) -> u64 {
        self.matches_by_policy.values().sum()
    }
}

/// Aggregates results in memory.
#[derive(Debug, Default)]
pub struct InMemoryReporter {
    counters: RwLock<ReportCounters>,
}

impl InMemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ReportCounters {
        self.counters.read().clone()
    }

    pub fn reset(&self) {
        *self.counters.write() = ReportCounters::default();
    }
}

impl EvaluationReporter for InMemoryReporter {
    fn record_evaluation(&self, result: &EvaluationResult) {
        let mut counters = self.counters.write();
        counters.evaluations += 1;

        if let Some(gate) = result.blocked_by {
            *counters.blocked_by_gate.entry(gate).or_insert(0) += 1;
        }

        if result.matched {
            *counters
                .matches_by_policy
                .entry(result.policy.clone())
                .or_insert(0) += 1;
        }

        if let Some(action) = &result.action {
            counters.actions += 1;
            if action.dry_run {
                counters.dry_run_actions += 1;
            }
            counters.estimated_monthly_savings += action.estimated_monthly_savings;
        }
    }
}

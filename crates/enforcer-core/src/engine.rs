//! Engine: runs the gate pipeline and builds enforcement actions.
//!
//! Evaluation rules:
//! 1. Gates run in a fixed order; the first failing gate fixes the reason
//! 2. Skipped gates (unconfigured policy sections) count as passing
//! 3. Only when every gate passes is an action built
//!
//! The wall clock is read at most once per evaluation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::cost::{format_duration, monthly_savings, CostSample};
use crate::gates::{GateContext, PIPELINE};
use crate::policy::Policy;
use crate::reporter::{EvaluationReporter, NoopReporter};
use crate::state::{Timestamp, WorkloadState};
use crate::types::{EnforcementAction, EvaluationResult, Workload};

/// Evaluates workloads against policies.
///
/// Holds no per-evaluation state; one engine can serve any number of
/// concurrent evaluations.
#[derive(Clone)]
pub struct Engine {
    reporter: Arc<dyn EvaluationReporter>,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            reporter: Arc::new(NoopReporter),
        }
    }

    /// Use `reporter` to receive every result.
    pub fn with_reporter(reporter: Arc<dyn EvaluationReporter>) -> Self {
        Self { reporter }
    }

    /// Evaluate against the current time.
    pub fn evaluate(
        &self,
        policy: &Policy,
        workload: &Workload,
        cost: &CostSample,
    ) -> EvaluationResult {
        self.evaluate_at(policy, workload, cost, Utc::now())
    }

    /// Evaluate as of `now`.
    pub fn evaluate_at(
        &self,
        policy: &Policy,
        workload: &Workload,
        cost: &CostSample,
        now: DateTime<Utc>,
    ) -> EvaluationResult {
        let state = workload.state();
        let result = run_pipeline(policy, workload, &state, cost, now);
        self.reporter.record_evaluation(&result);
        result
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

fn run_pipeline(
    policy: &Policy,
    workload: &Workload,
    state: &WorkloadState,
    cost: &CostSample,
    now: DateTime<Utc>,
) -> EvaluationResult {
    let mut result = EvaluationResult {
        policy: policy.name().to_string(),
        workload: workload.reference(),
        cost: *cost,
        matched: false,
        reason: String::new(),
        blocked_by: None,
        action: None,
        evaluated_at: now,
    };

    let ctx = GateContext {
        policy,
        workload,
        state,
        cost,
        now,
    };

    for gate in PIPELINE {
        if gate.check(&ctx).is_fail() {
            let kind = gate.kind();
            debug!(
                policy = %result.policy,
                namespace = %workload.namespace,
                workload = %workload.name,
                gate = %kind,
                "gate failed"
            );
            result.reason = kind.reason().to_string();
            result.blocked_by = Some(kind);
            return result;
        }
    }

    let reason = build_match_reason(policy, state, cost, now);
    let action = EnforcementAction {
        action_type: policy.spec.actions.action_type,
        target: workload.reference(),
        original_replicas: workload.replicas,
        reason: reason.clone(),
        estimated_monthly_savings: monthly_savings(cost.hourly_cost),
        policy: policy.name().to_string(),
        dry_run: policy.spec.enforcement.dry_run,
        notify: policy.spec.actions.notify,
        reactivation_allowed: policy.spec.actions.reactivation_allowed,
    };

    info!(
        policy = %result.policy,
        workload = %result.workload,
        dry_run = action.dry_run,
        estimated_monthly_savings = action.estimated_monthly_savings,
        "policy matched"
    );

    result.matched = true;
    result.reason = reason;
    result.action = Some(action);
    result
}

/// Human-readable justification for a match.
fn build_match_reason(
    policy: &Policy,
    state: &WorkloadState,
    cost: &CostSample,
    now: DateTime<Utc>,
) -> String {
    let window = format_duration(policy.spec.conditions.idle_window.as_duration());
    let idle = match &state.last_activity {
        Timestamp::At(last_activity) => format!(
            "Idle for {} (idle window {})",
            format_duration(now - *last_activity),
            window
        ),
        _ => format!("No recorded activity (idle window {})", window),
    };

    format!("{}, hourly cost: ${:.2}", idle, cost.hourly_cost)
}

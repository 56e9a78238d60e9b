//! Batch planning over many workloads for one policy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cost::CostSample;
use crate::engine::Engine;
use crate::policy::Policy;
use crate::types::{EnforcementAction, EvaluationResult, Workload, WorkloadRef};

/// A workload offered for evaluation together with its current cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub workload: Workload,
    pub hourly_cost: f64,
}

impl Candidate {
    pub fn new(workload: Workload, hourly_cost: f64) -> Self {
        Self {
            workload,
            hourly_cost,
        }
    }

    pub fn cost(&self) -> CostSample {
        CostSample::hourly(self.hourly_cost)
    }
}

/// Outcome of planning one run of a policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnforcementPlan {
    pub policy: String,
    pub evaluated_at: DateTime<Utc>,

    /// One result per candidate, in input order
    pub results: Vec<EvaluationResult>,

    /// Actions admitted under `maxActionsPerRun`
    pub actions: Vec<EnforcementAction>,

    /// Matched workloads left for a later run
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deferred: Vec<WorkloadRef>,
}

impl EnforcementPlan {
    pub fn matched_count(&self) -> usize {
        self.results.iter().filter(|r| r.matched).count()
    }

    pub fn deferred_count(&self) -> usize {
        self.deferred.len()
    }

    /// Projected savings of the admitted actions only.
    pub fn estimated_monthly_savings(&self) -> f64 {
        self.actions
            .iter()
            .map(|a| a.estimated_monthly_savings)
            .sum()
    }
}

/// Evaluate every candidate at `now` and admit actions in input order.
pub fn plan(
    engine: &Engine,
    policy: &Policy,
    candidates: &[Candidate],
    now: DateTime<Utc>,
) -> EnforcementPlan {
    let limit = match policy.spec.enforcement.max_actions_per_run {
        0 => usize::MAX,
        n => n as usize,
    };

    let mut plan = EnforcementPlan {
        policy: policy.name().to_string(),
        evaluated_at: now,
        results: Vec::with_capacity(candidates.len()),
        actions: Vec::new(),
        deferred: Vec::new(),
    };

    for candidate in candidates {
        let result = engine.evaluate_at(policy, &candidate.workload, &candidate.cost(), now);

        if let Some(action) = &result.action {
            if plan.actions.len() < limit {
                plan.actions.push(action.clone());
            } else {
                debug!(
                    policy = %plan.policy,
                    workload = %result.workload,
                    limit,
                    "action deferred by maxActionsPerRun"
                );
                plan.deferred.push(result.workload.clone());
            }
        }

        plan.results.push(result);
    }

    info!(
        policy = %plan.policy,
        candidates = candidates.len(),
        matched = plan.matched_count(),
        actions = plan.actions.len(),
        deferred = plan.deferred.len(),
        "enforcement plan built"
    );

    plan
}

//! # enforcer-core
//!
//! Deterministic cost-enforcement policy evaluation.
//!
//! Given a policy, a workload snapshot and its hourly cost, the engine
//! answers:
//! - Should this workload be scaled to zero now?
//! - If not, which check stopped it?
//! - If so, what is the action and what does it save?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same inputs and instant always produce the same result
//! 2. **Pure**: No I/O on the evaluation path; applying actions is external
//! 3. **Traceable**: Every non-match names the gate that stopped it
//! 4. **Parallel-safe**: Evaluations share nothing but read-only inputs
//!
//! ## Example
//!
//! ```rust,ignore
//! use enforcer_core::{evaluate, CostSample, Policy, Workload};
//!
//! let policy = Policy::from_yaml_file("policy.yaml")?;
//! let workload = Workload::new("dev-payments", "api").with_replicas(3);
//! let result = evaluate(&policy, &workload, &CostSample::hourly(2.0));
//!
//! match result.action {
//!     Some(action) => println!("SCALE: {} saves ${:.2}/mo", action.target, action.estimated_monthly_savings),
//!     None => println!("SKIP: {}", result.reason),
//! }
//! ```

pub mod cost;
pub mod engine;
pub mod gates;
pub mod plan;
pub mod policy;
pub mod reporter;
pub mod state;
pub mod types;

// Re-export main types at crate root
pub use cost::{format_duration, monthly_savings, CostSample, HOURS_PER_MONTH};
pub use engine::Engine;
pub use gates::{Gate, GateContext, GateOutcome, PIPELINE};
pub use plan::{plan, Candidate, EnforcementPlan};
pub use policy::{
    ActionType, ActionsSpec, ActiveHours, ConditionsSpec, DurationSpec, EnforcementSpec,
    LabelFilter, NamespaceFilter, NotifyMode, Policy, PolicyError, PolicyMetadata, PolicySpec,
    ScheduleSpec, ScopeSpec, TrafficThreshold, UtilizationThreshold,
};
pub use reporter::{
    EvaluationReporter, InMemoryReporter, NoopReporter, ReportCounters, TracingReporter,
};
pub use state::{Timestamp, WorkloadState};
pub use types::{EnforcementAction, EvaluationResult, GateKind, Workload, WorkloadRef};

use chrono::{DateTime, Utc};

/// Evaluate a workload against a policy at the current time.
///
/// This is the main entry point for one-off evaluation. Use an [`Engine`]
/// with a reporter to collect results.
pub fn evaluate(policy: &Policy, workload: &Workload, cost: &CostSample) -> EvaluationResult {
    Engine::new().evaluate(policy, workload, cost)
}

/// Evaluate as of `now`.
///
/// # Arguments
///
/// * `policy` - The enforcement policy
/// * `workload` - Workload snapshot including its annotations
/// * `cost` - Current hourly cost of the workload
/// * `now` - The instant every gate observes
pub fn evaluate_at(
    policy: &Policy,
    workload: &Workload,
    cost: &CostSample,
    now: DateTime<Utc>,
) -> EvaluationResult {
    Engine::new().evaluate_at(policy, workload, cost, now)
}

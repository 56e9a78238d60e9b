//! Output formatting utilities

use std::fmt::Write;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use enforcer_core::{format_duration, EnforcementPlan, EvaluationResult, Policy};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text (default)
    #[default]
    Text,
    /// JSON format
    Json,
}

/// Render `value` as pretty JSON.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Format currency
pub fn format_currency(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Summary printed by `enforcer validate`.
pub fn policy_summary(policy: &Policy) -> String {
    let spec = &policy.spec;
    let mut out = String::new();

    let _ = writeln!(out, "Policy:           {} (valid)", policy.name());
    let _ = writeln!(
        out,
        "Namespaces:       include [{}]",
        spec.scope.namespaces.include.join(", ")
    );
    if !spec.scope.namespaces.exclude.is_empty() {
        let _ = writeln!(
            out,
            "                  exclude [{}]",
            spec.scope.namespaces.exclude.join(", ")
        );
    }
    if let Some(labels) = &spec.scope.labels {
        let _ = writeln!(
            out,
            "Labels:           match {} / exclude {}",
            labels.match_labels.len(),
            labels.exclude.len()
        );
    }
    let _ = writeln!(
        out,
        "Idle window:      {}",
        format_duration(spec.conditions.idle_window.as_duration())
    );
    let _ = writeln!(
        out,
        "Min hourly cost:  {}",
        format_currency(spec.conditions.min_hourly_cost)
    );
    let _ = writeln!(
        out,
        "Action:           {} (notify: {:?})",
        spec.actions.action_type, spec.actions.notify
    );
    let _ = writeln!(out, "Dry run:          {}", spec.enforcement.dry_run);

    let max_actions = match spec.enforcement.max_actions_per_run {
        0 => "unlimited".to_string(),
        n => n.to_string(),
    };
    let _ = writeln!(out, "Max actions/run:  {}", max_actions);

    if !spec.enforcement.cooldown_window.is_zero() {
        let _ = writeln!(out, "Cooldown:         {}", spec.enforcement.cooldown_window);
    }
    if let Some(schedule) = &spec.schedule {
        let _ = writeln!(
            out,
            "Schedule:         {} ({} window(s))",
            schedule.timezone,
            schedule.active_hours.len()
        );
    }

    out
}

/// One evaluation as text.
pub fn result_text(result: &EvaluationResult) -> String {
    let mut out = String::new();

    match &result.action {
        Some(action) => {
            let mode = if action.dry_run { "DRY-RUN" } else { "SCALE" };
            let _ = writeln!(out, "{}: {} ({})", mode, result.workload, result.policy);
            let _ = writeln!(out, "  reason:   {}", action.reason);
            let _ = writeln!(
                out,
                "  replicas: {} -> 0",
                action.original_replicas
            );
            let _ = writeln!(
                out,
                "  savings:  {}/month",
                format_currency(action.estimated_monthly_savings)
            );
        }
        None => {
            let _ = writeln!(out, "SKIP: {} ({})", result.workload, result.policy);
            let _ = writeln!(out, "  reason:   {}", result.reason);
        }
    }

    out
}

/// A batch plan as text.
pub fn plan_text(plan: &EnforcementPlan) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Policy {} at {}", plan.policy, plan.evaluated_at.to_rfc3339());
    let _ = writeln!(out, "{}", "=".repeat(50));

    for result in &plan.results {
        let verdict = if plan.deferred.contains(&result.workload) {
            "DEFER"
        } else if result.matched {
            "MATCH"
        } else {
            "SKIP "
        };
        let _ = writeln!(out, "{}  {:<40} {}", verdict, result.workload.to_string(), result.reason);
    }

    let _ = writeln!(out, "{}", "-".repeat(50));
    let _ = writeln!(out, "Evaluated:  {}", plan.results.len());
    let _ = writeln!(out, "Matched:    {}", plan.matched_count());
    let _ = writeln!(out, "Actions:    {}", plan.actions.len());
    let _ = writeln!(out, "Deferred:   {}", plan.deferred_count());
    let _ = writeln!(
        out,
        "Savings:    {}/month",
        format_currency(plan.estimated_monthly_savings())
    );

    out
}

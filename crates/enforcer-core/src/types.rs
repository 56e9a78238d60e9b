//! Core types for enforcement evaluation.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cost::CostSample;
use crate::policy::{ActionType, NotifyMode};
use crate::state::{pause_annotations, WorkloadState};

/// Namespace + name of a workload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkloadRef {
    pub namespace: String,
    pub name: String,
}

impl WorkloadRef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for WorkloadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Snapshot of a scalable workload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workload {
    pub namespace: String,
    pub name: String,

    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    /// Enforcement bookkeeping lives here (see [`crate::state`])
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,

    #[serde(default = "default_replicas")]
    pub replicas: i32,
}

fn default_replicas() -> i32 {
    1
}

impl Workload {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            labels: BTreeMap::new(),
            annotations: BTreeMap::new(),
            replicas: default_replicas(),
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    pub fn with_replicas(mut self, replicas: i32) -> Self {
        self.replicas = replicas;
        self
    }

    pub fn reference(&self) -> WorkloadRef {
        WorkloadRef {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
        }
    }

    /// Typed view of the enforcement annotations.
    pub fn state(&self) -> WorkloadState {
        WorkloadState::from_annotations(&self.annotations)
    }
}

/// The gates of the evaluation pipeline, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateKind {
    AlreadyPaused,
    ExcludedByAnnotation,
    NamespaceScope,
    LabelScope,
    CostThreshold,
    IdleWindow,
    Schedule,
    Cooldown,
}

impl GateKind {
    /// Reason recorded when this gate stops evaluation.
    pub fn reason(&self) -> &'static str {
        match self {
            GateKind::AlreadyPaused => "already paused",
            GateKind::ExcludedByAnnotation => "excluded by annotation",
            GateKind::NamespaceScope => "namespace not in scope",
            GateKind::LabelScope => "labels do not match",
            GateKind::CostThreshold => "cost below threshold",
            GateKind::IdleWindow => "not idle long enough",
            GateKind::Schedule => "outside scheduled hours",
            GateKind::Cooldown => "cooldown not expired",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GateKind::AlreadyPaused => "already_paused",
            GateKind::ExcludedByAnnotation => "excluded_by_annotation",
            GateKind::NamespaceScope => "namespace_scope",
            GateKind::LabelScope => "label_scope",
            GateKind::CostThreshold => "cost_threshold",
            GateKind::IdleWindow => "idle_window",
            GateKind::Schedule => "schedule",
            GateKind::Cooldown => "cooldown",
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An action to be taken against a workload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnforcementAction {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub target: WorkloadRef,
    /// Replica count to restore on reactivation
    pub original_replicas: i32,
    pub reason: String,
    pub estimated_monthly_savings: f64,
    pub policy: String,
    pub dry_run: bool,
    pub notify: NotifyMode,
    pub reactivation_allowed: bool,
}

impl EnforcementAction {
    /// Annotations the applier writes back once the action is carried out.
    pub fn pause_annotations(&self, applied_at: DateTime<Utc>) -> BTreeMap<String, String> {
        pause_annotations(applied_at, self.original_replicas, &self.policy)
    }
}

/// The result of evaluating one workload against one policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub policy: String,
    pub workload: WorkloadRef,
    pub cost: CostSample,
    pub matched: bool,
    pub reason: String,

    /// Gate that stopped evaluation, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_by: Option<GateKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<EnforcementAction>,

    /// The single instant every gate observed
    pub evaluated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workload_builder_and_ref() {
        let workload = Workload::new("dev-a", "api")
            .with_label("app", "api")
            .with_annotation("finops.io/paused", "true")
            .with_replicas(3);

        assert_eq!(workload.reference().to_string(), "dev-a/api");
        assert_eq!(workload.replicas, 3);
        assert!(workload.state().paused);
    }

    #[test]
    fn test_workload_replicas_default_to_one() {
        let workload: Workload =
            serde_json::from_str(r#"{ "namespace": "dev", "name": "web" }"#).unwrap();
        assert_eq!(workload.replicas, 1);
        assert!(workload.labels.is_empty());
    }

    #[test]
    fn test_gate_reasons_are_distinct() {
        let all = [
            GateKind::AlreadyPaused,
            GateKind::ExcludedByAnnotation,
            GateKind::NamespaceScope,
            GateKind::LabelScope,
            GateKind::CostThreshold,
            GateKind::IdleWindow,
            GateKind::Schedule,
            GateKind::Cooldown,
        ];
        let reasons: std::collections::HashSet<_> = all.iter().map(|g| g.reason()).collect();
        assert_eq!(reasons.len(), all.len());
    }
}

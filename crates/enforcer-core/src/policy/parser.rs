//! Policy parsing from YAML/JSON.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::duration::DurationSpec;
use super::schema::validate_policy_schema;

/// Errors that can occur when loading policies.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Failed to read policy file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Policy does not match schema: {}", .0.join("; "))]
    SchemaViolation(Vec<String>),

    #[error("Policy validation failed: {0}")]
    ValidationError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid duration: {0:?}")]
    InvalidDuration(String),
}

/// Object metadata of a policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PolicyMetadata {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Namespace inclusion/exclusion patterns (glob syntax).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NamespaceFilter {
    #[serde(default)]
    pub include: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

/// Label-based filtering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LabelFilter {
    /// Labels that must all be present with these values
    #[serde(rename = "match", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub match_labels: BTreeMap<String, String>,

    /// Any one of these pairs excludes the workload
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub exclude: BTreeMap<String, String>,
}

/// Which workloads a policy applies to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ScopeSpec {
    pub namespaces: NamespaceFilter,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<LabelFilter>,
}

/// Maximum request rate at which a workload still counts as idle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrafficThreshold {
    pub requests_per_minute: u32,
}

impl TrafficThreshold {
    /// Whether an observed request rate is at or below the threshold.
    pub fn qualifies_as_idle(&self, observed_requests_per_minute: f64) -> bool {
        observed_requests_per_minute <= f64::from(self.requests_per_minute)
    }
}

/// Maximum utilization (percent) at which a workload still counts as idle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UtilizationThreshold {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
}

impl UtilizationThreshold {
    pub fn cpu_percent(&self) -> Option<f64> {
        self.cpu.as_deref().and_then(parse_percentage)
    }

    pub fn memory_percent(&self) -> Option<f64> {
        self.memory.as_deref().and_then(parse_percentage)
    }

    /// Whether observed utilization is at or below every configured limit.
    ///
    /// A configured limit with no observation does not qualify.
    pub fn qualifies_as_idle(&self, observed_cpu: Option<f64>, observed_memory: Option<f64>) -> bool {
        let within = |limit: Option<f64>, observed: Option<f64>| match (limit, observed) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(limit), Some(observed)) => observed <= limit,
        };

        within(self.cpu_percent(), observed_cpu) && within(self.memory_percent(), observed_memory)
    }
}

fn parse_percentage(text: &str) -> Option<f64> {
    let value: f64 = text.trim().trim_end_matches('%').parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// What qualifies a workload as idle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConditionsSpec {
    /// How long a workload must be inactive before it is eligible
    pub idle_window: DurationSpec,

    /// Minimum hourly cost for enforcement to be worthwhile
    pub min_hourly_cost: f64,

    /// Declared for telemetry collaborators; not consulted by the idle gate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_threshold: Option<TrafficThreshold>,

    /// Declared for telemetry collaborators; not consulted by the idle gate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utilization_threshold: Option<UtilizationThreshold>,
}

/// Enforcement action kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum ActionType {
    #[default]
    #[serde(rename = "scaleToZero")]
    ScaleToZero,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionType::ScaleToZero => f.write_str("scaleToZero"),
        }
    }
}

/// How a match is announced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum NotifyMode {
    #[serde(rename = "slack")]
    Slack,

    #[default]
    #[serde(rename = "none")]
    Disabled,
}

/// What to do when every condition holds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ActionsSpec {
    #[serde(rename = "type", default)]
    pub action_type: ActionType,

    #[serde(default)]
    pub notify: NotifyMode,

    /// Owners may bring the workload back themselves
    #[serde(default)]
    pub reactivation_allowed: bool,
}

/// Enforcement constraints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EnforcementSpec {
    #[serde(default)]
    pub dry_run: bool,

    /// Cap on actions admitted per run (0 = unlimited)
    #[serde(default)]
    pub max_actions_per_run: u32,

    /// Minimum time between actions on the same workload (0 = disabled)
    #[serde(default)]
    pub cooldown_window: DurationSpec,
}

/// A window of active hours on some days of the week.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ActiveHours {
    /// Three-letter day abbreviations (`Mon` .. `Sun`)
    #[serde(default)]
    pub days: Vec<String>,

    /// `[start, end]`, both inclusive, 24-hour clock
    #[serde(default)]
    pub hours: Vec<i64>,
}

/// When a policy is active.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSpec {
    /// IANA timezone name (e.g. "America/Los_Angeles")
    pub timezone: String,

    #[serde(default)]
    pub active_hours: Vec<ActiveHours>,
}

/// The policy body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicySpec {
    pub scope: ScopeSpec,

    pub conditions: ConditionsSpec,

    #[serde(default)]
    pub actions: ActionsSpec,

    #[serde(default)]
    pub enforcement: EnforcementSpec,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<ScheduleSpec>,
}

/// An enforcement policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_kind")]
    pub kind: String,

    pub metadata: PolicyMetadata,

    pub spec: PolicySpec,
}

fn default_api_version() -> String {
    "finops.io/v1alpha1".to_string()
}

fn default_kind() -> String {
    "EnforcementPolicy".to_string()
}

impl Policy {
    /// Build a policy in code. The result is validated like a parsed one.
    pub fn new(name: impl Into<String>, spec: PolicySpec) -> Result<Self, PolicyError> {
        let policy = Policy {
            api_version: default_api_version(),
            kind: default_kind(),
            metadata: PolicyMetadata {
                name: name.into(),
                namespace: None,
            },
            spec,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Parse a policy from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, PolicyError> {
        let document: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        let value = serde_json::to_value(document)?;
        Self::from_value(value)
    }

    /// Parse a policy from JSON string.
    pub fn from_json(json: &str) -> Result<Self, PolicyError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse a policy from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse a policy from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    fn from_value(value: serde_json::Value) -> Result<Self, PolicyError> {
        validate_policy_schema(&value).map_err(PolicyError::SchemaViolation)?;
        let policy: Policy = serde_json::from_value(value)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Validate the policy structure.
    fn validate(&self) -> Result<(), PolicyError> {
        if self.metadata.name.is_empty() {
            return Err(PolicyError::MissingField("metadata.name".to_string()));
        }

        let min_cost = self.spec.conditions.min_hourly_cost;
        if !min_cost.is_finite() || min_cost < 0.0 {
            return Err(PolicyError::ValidationError(format!(
                "conditions.minHourlyCost must be a non-negative number, got {}",
                min_cost
            )));
        }

        if self.spec.conditions.idle_window.as_duration() < chrono::Duration::zero()
            || self.spec.enforcement.cooldown_window.as_duration() < chrono::Duration::zero()
        {
            return Err(PolicyError::ValidationError(
                "durations must not be negative".to_string(),
            ));
        }

        // Legal but inert; usually an authoring mistake.
        if self.spec.scope.namespaces.include.is_empty() {
            warn!(
                policy = %self.metadata.name,
                "scope.namespaces.include is empty; policy matches no namespace"
            );
        }

        // Left to the schedule gate, which fails open on unknown zones.
        if let Some(schedule) = &self.spec.schedule {
            if schedule.timezone.parse::<chrono_tz::Tz>().is_err() {
                warn!(
                    policy = %self.metadata.name,
                    timezone = %schedule.timezone,
                    "unknown schedule timezone; schedule will not restrict enforcement"
                );
            }
        }

        Ok(())
    }
}

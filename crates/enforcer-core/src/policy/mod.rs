//! Policy model, parsing and validation.
//!
//! Enforcement policies are structured data validated against JSON Schema.
//! This module handles parsing YAML/JSON policies and validating them.

mod duration;
mod parser;
mod schema;

pub use duration::DurationSpec;
pub use parser::{
    ActionType, ActionsSpec, ActiveHours, ConditionsSpec, EnforcementSpec, LabelFilter,
    NamespaceFilter, NotifyMode, Policy, PolicyError, PolicyMetadata, PolicySpec, ScheduleSpec,
    ScopeSpec, TrafficThreshold, UtilizationThreshold,
};
pub use schema::{validate_policy_schema, SchemaError};

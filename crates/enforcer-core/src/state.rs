//! Typed workload state.
//!
//! Pause, exclusion and activity bookkeeping live on the workload as plain
//! string annotations. They are translated here, once, into a typed record
//! so the gates never look at raw annotation strings.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Set to `"true"` once a workload has been scaled to zero.
pub const PAUSED_ANNOTATION: &str = "finops.io/paused";

/// RFC 3339 instant of the last enforcement action.
pub const PAUSED_AT_ANNOTATION: &str = "finops.io/paused-at";

/// Set to `"true"` by owners to opt a workload out of enforcement.
pub const EXCLUDE_ANNOTATION: &str = "finops.io/exclude";

/// RFC 3339 instant of the last observed activity.
pub const LAST_ACTIVITY_ANNOTATION: &str = "finops.io/last-activity";

/// Replica count to restore on reactivation.
pub const ORIGINAL_REPLICAS_ANNOTATION: &str = "finops.io/original-replicas";

/// Name of the policy that paused the workload.
pub const PAUSED_BY_POLICY_ANNOTATION: &str = "finops.io/paused-by-policy";

const FLAG_SET: &str = "true";

/// A timestamp read from workload state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Timestamp {
    /// No value recorded
    Missing,
    /// A value is recorded but is not RFC 3339
    Invalid(String),
    /// A valid instant
    At(DateTime<Utc>),
}

impl Timestamp {
    /// Parse an optional RFC 3339 string.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None => Timestamp::Missing,
            Some(text) if text.trim().is_empty() => Timestamp::Missing,
            Some(text) => match DateTime::parse_from_rfc3339(text.trim()) {
                Ok(instant) => Timestamp::At(instant.with_timezone(&Utc)),
                Err(_) => Timestamp::Invalid(text.to_string()),
            },
        }
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::At(instant) => Some(*instant),
            _ => None,
        }
    }
}

/// Enforcement bookkeeping for one workload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadState {
    pub paused: bool,
    pub paused_at: Timestamp,
    pub excluded: bool,
    pub last_activity: Timestamp,
}

impl WorkloadState {
    pub fn from_annotations(annotations: &BTreeMap<String, String>) -> Self {
        let flag = |key: &str| annotations.get(key).map(String::as_str) == Some(FLAG_SET);
        let stamp = |key: &str| Timestamp::parse(annotations.get(key).map(String::as_str));

        Self {
            paused: flag(PAUSED_ANNOTATION),
            paused_at: stamp(PAUSED_AT_ANNOTATION),
            excluded: flag(EXCLUDE_ANNOTATION),
            last_activity: stamp(LAST_ACTIVITY_ANNOTATION),
        }
    }
}

/// Annotations an applier writes back after scaling a workload to zero.
pub fn pause_annotations(
    paused_at: DateTime<Utc>,
    original_replicas: i32,
    policy: &str,
) -> BTreeMap<String, String> {
    BTreeMap::from([
        (PAUSED_ANNOTATION.to_string(), FLAG_SET.to_string()),
        (
            PAUSED_AT_ANNOTATION.to_string(),
            paused_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        ),
        (
            ORIGINAL_REPLICAS_ANNOTATION.to_string(),
            original_replicas.to_string(),
        ),
        (PAUSED_BY_POLICY_ANNOTATION.to_string(), policy.to_string()),
    ])
}

//! JSON Schema validation for enforcement policies.
//!
//! Policies are validated against spec/policy.schema.json before they are
//! deserialized into typed structs, so authoring mistakes are reported with
//! their JSON pointer rather than as a serde error.

use std::sync::OnceLock;
use thiserror::Error;

/// Embedded policy schema (loaded at compile time).
const POLICY_SCHEMA_JSON: &str = include_str!("../../../../spec/policy.schema.json");

/// Compiled JSON Schema validator (initialized once, reused).
static COMPILED_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

/// Errors from schema validation.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to load schema: {0}")]
    LoadError(String),
}

fn get_validator() -> Result<&'static jsonschema::Validator, SchemaError> {
    let result = COMPILED_SCHEMA.get_or_init(|| {
        let schema_value: serde_json::Value = match serde_json::from_str(POLICY_SCHEMA_JSON) {
            Ok(v) => v,
            Err(e) => return Err(format!("Invalid schema JSON: {}", e)),
        };

        match jsonschema::options().build(&schema_value) {
            Ok(v) => Ok(v),
            Err(e) => Err(format!("Failed to compile schema: {}", e)),
        }
    });

    match result {
        Ok(v) => Ok(v),
        Err(e) => Err(SchemaError::LoadError(e.clone())),
    }
}

/// Validate a policy JSON value against the schema.
///
/// Returns every violation, each suffixed with the instance path it
/// was found at.
pub fn validate_policy_schema(policy_json: &serde_json::Value) -> Result<(), Vec<String>> {
    let validator = get_validator().map_err(|e| vec![e.to_string()])?;

    let errors: Vec<String> = validator
        .iter_errors(policy_json)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> serde_json::Value {
        json!({
            "apiVersion": "finops.io/v1alpha1",
            "kind": "EnforcementPolicy",
            "metadata": { "name": "dev-idle" },
            "spec": {
                "scope": { "namespaces": { "include": ["dev-*"] } },
                "conditions": { "idleWindow": "24h", "minHourlyCost": 0.5 }
            }
        })
    }

    #[test]
    fn test_minimal_policy_passes() {
        assert!(validate_policy_schema(&minimal()).is_ok());
    }

    #[test]
    fn test_full_policy_passes() {
        let value = json!({
            "apiVersion": "finops.io/v1alpha1",
            "kind": "EnforcementPolicy",
            "metadata": { "name": "dev-idle", "namespace": "finops-system" },
            "spec": {
                "scope": {
                    "namespaces": { "include": ["dev-*", "preview-*"], "exclude": ["dev-shared"] },
                    "labels": {
                        "match": { "tier": "ephemeral" },
                        "exclude": { "finops.io/protected": "true" }
                    }
                },
                "conditions": {
                    "idleWindow": "72h",
                    "minHourlyCost": 1.25,
                    "trafficThreshold": { "requestsPerMinute": 5 },
                    "utilizationThreshold": { "cpu": "5%", "memory": "10" }
                },
                "actions": { "type": "scaleToZero", "notify": "slack", "reactivationAllowed": true },
                "enforcement": { "dryRun": true, "maxActionsPerRun": 10, "cooldownWindow": "6h" },
                "schedule": {
                    "timezone": "America/Los_Angeles",
                    "activeHours": [ { "days": ["Mon", "Tue"], "hours": [9, 17] } ]
                }
            }
        });
        assert!(validate_policy_schema(&value).is_ok());
    }

    #[test]
    fn test_missing_conditions_fails() {
        let mut value = minimal();
        value["spec"].as_object_mut().unwrap().remove("conditions");
        let errors = validate_policy_schema(&value).unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_bad_duration_fails() {
        let mut value = minimal();
        value["spec"]["conditions"]["idleWindow"] = json!("2 days");
        assert!(validate_policy_schema(&value).is_err());
    }

    #[test]
    fn test_negative_cost_fails() {
        let mut value = minimal();
        value["spec"]["conditions"]["minHourlyCost"] = json!(-1.0);
        assert!(validate_policy_schema(&value).is_err());
    }

    #[test]
    fn test_unknown_action_type_fails() {
        let mut value = minimal();
        value["spec"]["actions"] = json!({ "type": "delete" });
        assert!(validate_policy_schema(&value).is_err());
    }

    #[test]
    fn test_hour_range_must_have_two_bounds() {
        let mut value = minimal();
        value["spec"]["schedule"] = json!({
            "timezone": "UTC",
            "activeHours": [ { "days": ["Mon"], "hours": [9] } ]
        });
        assert!(validate_policy_schema(&value).is_err());
    }

    #[test]
    fn test_additional_properties_fail() {
        let mut value = minimal();
        value["spec"]["unknownField"] = json!("should fail");
        let errors = validate_policy_schema(&value).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("/spec")));
    }
}

//! Scope resolution: namespace patterns and label selectors.
//!
//! Exclusion is checked before inclusion at both layers, so an explicit
//! exclude always wins.

use std::collections::BTreeMap;

use crate::policy::{LabelFilter, NamespaceFilter, ScopeSpec};
use crate::types::{GateKind, Workload};

use super::pattern;
use super::{Gate, GateContext, GateOutcome};

/// Whether a namespace is selected by the filter.
///
/// An empty include list selects nothing.
pub fn matches_namespace(namespace: &str, filter: &NamespaceFilter) -> bool {
    if filter
        .exclude
        .iter()
        .any(|p| pattern::matches(p, namespace))
    {
        return false;
    }

    filter
        .include
        .iter()
        .any(|p| pattern::matches(p, namespace))
}

/// Whether a label set is selected by the filter.
pub fn matches_labels(labels: &BTreeMap<String, String>, filter: &LabelFilter) -> bool {
    let has = |key: &String, value: &String| labels.get(key) == Some(value);

    if filter.exclude.iter().any(|(k, v)| has(k, v)) {
        return false;
    }

    filter.match_labels.iter().all(|(k, v)| has(k, v))
}

/// Combined namespace and label scope decision.
pub fn in_scope(workload: &Workload, scope: &ScopeSpec) -> bool {
    matches_namespace(&workload.namespace, &scope.namespaces)
        && scope
            .labels
            .as_ref()
            .map_or(true, |filter| matches_labels(&workload.labels, filter))
}

/// Namespace scope gate.
pub struct NamespaceGate;

impl Gate for NamespaceGate {
    fn kind(&self) -> GateKind {
        GateKind::NamespaceScope
    }

    fn check(&self, ctx: &GateContext<'_>) -> GateOutcome {
        GateOutcome::from_check(matches_namespace(
            &ctx.workload.namespace,
            &ctx.policy.spec.scope.namespaces,
        ))
    }
}

/// Label scope gate; skipped without a label filter.
pub struct LabelGate;

impl Gate for LabelGate {
    fn kind(&self) -> GateKind {
        GateKind::LabelScope
    }

    fn check(&self, ctx: &GateContext<'_>) -> GateOutcome {
        match &ctx.policy.spec.scope.labels {
            Some(filter) => GateOutcome::from_check(matches_labels(&ctx.workload.labels, filter)),
            None => GateOutcome::Skipped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ns_filter(include: &[&str], exclude: &[&str]) -> NamespaceFilter {
        NamespaceFilter {
            include: include.iter().map(|s| s.to_string()).collect(),
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_matches_namespace_scope() {
        let cases = [
            ("exact match", "dev-test", ns_filter(&["dev-test"], &[]), true),
            ("wildcard match", "dev-feature-xyz", ns_filter(&["dev-*"], &[]), true),
            ("excluded namespace", "prod", ns_filter(&["*"], &["prod"]), false),
            ("no match", "staging", ns_filter(&["dev-*"], &[]), false),
            ("empty include", "dev-a", ns_filter(&[], &[]), false),
            ("any include wins", "qa-1", ns_filter(&["dev-*", "qa-*"], &[]), true),
            ("wildcard exclude", "dev-shared", ns_filter(&["dev-*"], &["*-shared"]), false),
        ];

        for (name, namespace, filter, want) in cases {
            assert_eq!(matches_namespace(namespace, &filter), want, "{}", name);
        }
    }

    #[test]
    fn test_label_exclude_wins() {
        let filter = LabelFilter {
            match_labels: map(&[("tier", "ephemeral")]),
            exclude: map(&[("finops.io/protected", "true")]),
        };

        let labels = map(&[("tier", "ephemeral"), ("finops.io/protected", "true")]);
        assert!(!matches_labels(&labels, &filter));

        let labels = map(&[("tier", "ephemeral"), ("finops.io/protected", "false")]);
        assert!(matches_labels(&labels, &filter));
    }

    #[test]
    fn test_label_match_requires_all_pairs() {
        let filter = LabelFilter {
            match_labels: map(&[("tier", "ephemeral"), ("team", "web")]),
            exclude: BTreeMap::new(),
        };

        assert!(matches_labels(&map(&[("tier", "ephemeral"), ("team", "web"), ("x", "y")]), &filter));
        assert!(!matches_labels(&map(&[("tier", "ephemeral")]), &filter));
        assert!(!matches_labels(&map(&[("tier", "ephemeral"), ("team", "api")]), &filter));
    }

    #[test]
    fn test_empty_label_filter_passes() {
        assert!(matches_labels(&BTreeMap::new(), &LabelFilter::default()));
        assert!(matches_labels(&map(&[("a", "b")]), &LabelFilter::default()));
    }

    #[test]
    fn test_in_scope_combines_layers() {
        let scope = ScopeSpec {
            namespaces: ns_filter(&["dev-*"], &[]),
            labels: Some(LabelFilter {
                match_labels: map(&[("tier", "ephemeral")]),
                exclude: BTreeMap::new(),
            }),
        };

        let labelled = Workload::new("dev-a", "api").with_label("tier", "ephemeral");
        let unlabelled = Workload::new("dev-a", "api");
        let wrong_ns = Workload::new("prod", "api").with_label("tier", "ephemeral");

        assert!(in_scope(&labelled, &scope));
        assert!(!in_scope(&unlabelled, &scope));
        assert!(!in_scope(&wrong_ns, &scope));

        let no_labels = ScopeSpec {
            labels: None,
            ..scope
        };
        assert!(in_scope(&unlabelled, &no_labels));
    }

    proptest! {
        #[test]
        fn prop_namespace_exclude_always_wins(
            namespace in "[a-z][a-z0-9-]{0,20}",
            include in prop::collection::vec("[a-z*-]{1,8}", 0..4),
        ) {
            let mut include = include;
            include.push("*".to_string());
            let filter = NamespaceFilter { include, exclude: vec![namespace.clone()] };
            prop_assert!(!matches_namespace(&namespace, &filter));
        }

        #[test]
        fn prop_label_exclude_always_wins(
            key in "[a-z]{1,8}",
            value in "[a-z0-9]{1,8}",
            extra in prop::collection::btree_map("[a-z]{1,8}", "[a-z]{1,8}", 0..4),
        ) {
            let mut labels = extra;
            labels.insert(key.clone(), value.clone());
            let filter = LabelFilter {
                match_labels: labels.clone(),
                exclude: BTreeMap::from([(key, value)]),
            };
            prop_assert!(!matches_labels(&labels, &filter));
        }
    }
}

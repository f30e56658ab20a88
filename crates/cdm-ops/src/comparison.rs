//! Comparison policies
//!
//! Which fields decide whether a resource already matches its desired state.
//! A field present in the desired state but missing from the current state
//! is always a mismatch. Sentinel values such as `UNPROTECTED` are compared
//! like any other string.

use crate::state::{CurrentState, DesiredState};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Policy deciding which fields must be equal for a resource to match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// Desired and current field maps are identical
    Exact,
    /// Every desired field equals the current value; extra current fields
    /// (server-generated ids, timestamps) are ignored
    DesiredFields,
    /// Only the listed fields are compared
    Fields(BTreeSet<String>),
    /// Identical after removing the listed fields from both sides
    ExactIgnoring(BTreeSet<String>),
}

impl Comparison {
    /// Compare only `fields`
    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Comparison::Fields(fields.into_iter().map(Into::into).collect())
    }

    /// Compare everything except `fields`
    pub fn ignoring<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Comparison::ExactIgnoring(fields.into_iter().map(Into::into).collect())
    }

    /// Whether `current` satisfies `desired` under this policy
    pub fn matches(&self, desired: &DesiredState, current: &CurrentState) -> bool {
        self.differences(desired, current).is_empty()
    }

    /// Names of the fields that differ under this policy, sorted
    pub fn differences(&self, desired: &DesiredState, current: &CurrentState) -> Vec<String> {
        let (desired, current) = (desired.fields(), current.fields());
        let keys: BTreeSet<&String> = match self {
            Comparison::Exact => desired.keys().chain(current.keys()).collect(),
            Comparison::DesiredFields => desired.keys().collect(),
            Comparison::Fields(fields) => fields.iter().collect(),
            Comparison::ExactIgnoring(ignored) => desired
                .keys()
                .chain(current.keys())
                .filter(|k| !ignored.contains(*k))
                .collect(),
        };
        keys.into_iter()
            .filter(|key| !field_matches(desired, current, key))
            .cloned()
            .collect()
    }
}

fn field_matches(desired: &Map<String, Value>, current: &Map<String, Value>, key: &str) -> bool {
    match (desired.get(key), current.get(key)) {
        (Some(want), Some(have)) => want == have,
        (None, None) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn desired() -> DesiredState {
        DesiredState::new()
            .with("accessKey", "AKIA1")
            .with("bucket", "archive")
            .with("name", "aws")
    }

    #[test]
    fn test_exact_requires_identical_maps() {
        let current = CurrentState::new()
            .with("accessKey", "AKIA1")
            .with("bucket", "archive")
            .with("name", "aws");
        assert!(Comparison::Exact.matches(&desired(), &current));
        assert!(!Comparison::Exact.matches(&desired(), &current.with("id", "loc-1")));
    }

    #[test]
    fn test_desired_fields_ignores_server_fields() {
        let current = CurrentState::new()
            .with("id", "loc-1")
            .with("accessKey", "AKIA1")
            .with("bucket", "archive")
            .with("name", "aws");
        assert!(Comparison::DesiredFields.matches(&desired(), &current));
    }

    #[test]
    fn test_missing_current_field_is_a_mismatch() {
        let current = CurrentState::new().with("bucket", "archive").with("name", "aws");
        assert_eq!(
            Comparison::DesiredFields.differences(&desired(), &current),
            vec!["accessKey".to_string()]
        );
    }

    #[test]
    fn test_narrow_fields_policy() {
        let current = CurrentState::new()
            .with("accessKey", "AKIA1")
            .with("bucket", "archive")
            .with("name", "renamed");
        let policy = Comparison::fields(["accessKey", "bucket"]);
        assert!(policy.matches(&desired(), &current));
        assert!(!Comparison::DesiredFields.matches(&desired(), &current));
    }

    #[test]
    fn test_exact_ignoring() {
        let current = CurrentState::new()
            .with("id", "loc-1")
            .with("accessKey", "AKIA1")
            .with("bucket", "archive")
            .with("name", "aws");
        assert!(Comparison::ignoring(["id"]).matches(&desired(), &current));
    }

    #[test]
    fn test_sentinels_compare_as_values() {
        let desired = DesiredState::new().with("configuredSlaDomainId", "UNPROTECTED");
        let inherit = CurrentState::new().with("configuredSlaDomainId", "INHERIT");
        let unprotected = CurrentState::new().with("configuredSlaDomainId", json!("UNPROTECTED"));
        assert!(!Comparison::Exact.matches(&desired, &inherit));
        assert!(Comparison::Exact.matches(&desired, &unprotected));
    }
}

//! Bids: complete issue-to-value assignments.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Value;

/// A complete assignment of one value to every issue of a domain.
///
/// Bids are immutable value objects. Equality is structural, so two bids
/// that choose the same value for every issue are interchangeable. On the
/// wire a bid is a plain `{"issue": "value"}` object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bid {
    values: BTreeMap<String, Value>,
}

impl Bid {
    /// Creates a bid from an issue-value mapping.
    #[must_use]
    pub fn new(values: BTreeMap<String, Value>) -> Self {
        Self { values }
    }

    /// Creates a bid from `(issue, value)` pairs.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(issue, value)| (issue.into(), value.into()))
                .collect(),
        }
    }

    /// Returns the value chosen for `issue`.
    #[must_use]
    pub fn value(&self, issue: &str) -> Option<&Value> {
        self.values.get(issue)
    }

    /// Iterates over the issues this bid assigns.
    pub fn issues(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Iterates over `(issue, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(issue, value)| (issue.as_str(), value))
    }

    /// Returns the number of assigned issues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no issue is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the underlying issue-value mapping.
    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<String, Value> {
        &self.values
    }
}

impl fmt::Display for Bid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (issue, value)) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{issue}={value}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bids_with_same_assignment_are_equal() {
        let a = Bid::from_pairs([("food", "pizza"), ("drink", "soda")]);
        let b = Bid::from_pairs([("drink", "soda"), ("food", "pizza")]);
        assert_eq!(a, b);
    }

    #[test]
    fn bid_value_lookup() {
        let bid = Bid::from_pairs([("food", "pizza")]);
        assert_eq!(bid.value("food"), Some(&Value::new("pizza")));
        assert_eq!(bid.value("drink"), None);
    }

    #[test]
    fn bid_serializes_as_issue_value_object() {
        let bid = Bid::from_pairs([("food", "pizza"), ("drink", "soda")]);
        let json = serde_json::to_string(&bid).unwrap();
        assert_eq!(json, r#"{"drink":"soda","food":"pizza"}"#);

        let parsed: Bid = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, bid);
    }

    #[test]
    fn bid_display_lists_pairs_in_issue_order() {
        let bid = Bid::from_pairs([("b", "2"), ("a", "1")]);
        assert_eq!(bid.to_string(), "{a=1, b=2}");
    }
}

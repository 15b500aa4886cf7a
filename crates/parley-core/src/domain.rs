//! Negotiation domains.
//!
//! A [`Domain`] is a fixed set of issues, each with a discrete, ordered set
//! of [`Value`]s. Domains are immutable once built and are shared read-only
//! between every component of a session.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Bid, CoreError};

/// A discrete setting of an issue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Value(String);

impl Value {
    /// Creates a new value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the value as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The issues under negotiation and their possible values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    name: String,
    issues: BTreeMap<String, Vec<Value>>,
}

impl Domain {
    /// Creates a validated domain.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDomain`] if there are no issues, an issue
    /// has no values, or an issue lists the same value twice.
    pub fn new(
        name: impl Into<String>,
        issues: BTreeMap<String, Vec<Value>>,
    ) -> Result<Self, CoreError> {
        let name = name.into();
        if issues.is_empty() {
            return Err(CoreError::InvalidDomain(format!(
                "domain '{name}' has no issues"
            )));
        }
        for (issue, values) in &issues {
            if values.is_empty() {
                return Err(CoreError::InvalidDomain(format!(
                    "issue '{issue}' has no values"
                )));
            }
            let distinct: BTreeSet<&Value> = values.iter().collect();
            if distinct.len() != values.len() {
                return Err(CoreError::InvalidDomain(format!(
                    "issue '{issue}' lists a value more than once"
                )));
            }
        }
        Ok(Self { name, issues })
    }

    /// Starts building a domain.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> DomainBuilder {
        DomainBuilder {
            name: name.into(),
            issues: BTreeMap::new(),
        }
    }

    /// Returns the domain name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Iterates over the issue names in a stable order.
    pub fn issues(&self) -> impl Iterator<Item = &str> {
        self.issues.keys().map(String::as_str)
    }

    /// Returns the number of issues.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    /// Returns the values of an issue, if the issue exists.
    #[must_use]
    pub fn values(&self, issue: &str) -> Option<&[Value]> {
        self.issues.get(issue).map(Vec::as_slice)
    }

    /// Returns true if `value` is a legal setting of `issue`.
    #[must_use]
    pub fn contains(&self, issue: &str, value: &Value) -> bool {
        self.values(issue).is_some_and(|values| values.contains(value))
    }

    /// Returns the size of the bid space, or `None` if it overflows `u64`.
    #[must_use]
    pub fn bid_count(&self) -> Option<u64> {
        self.issues
            .values()
            .try_fold(1u64, |acc, values| acc.checked_mul(values.len() as u64))
    }

    /// Returns the bid at position `index` of the bid space.
    ///
    /// Positions are a mixed-radix encoding over the issues in name order,
    /// so every index below [`bid_count`](Self::bid_count) maps to exactly one bid.
    #[must_use]
    pub fn bid_at(&self, index: u64) -> Option<Bid> {
        if index >= self.bid_count()? {
            return None;
        }
        let mut rest = index;
        let mut values = BTreeMap::new();
        for (issue, options) in self.issues.iter().rev() {
            let radix = options.len() as u64;
            let chosen = options.get((rest % radix) as usize)?;
            values.insert(issue.clone(), chosen.clone());
            rest /= radix;
        }
        Some(Bid::new(values))
    }

    /// Iterates over every bid of the domain.
    ///
    /// Yields nothing if the bid space does not fit in `u64`.
    pub fn all_bids(&self) -> impl Iterator<Item = Bid> + '_ {
        (0..self.bid_count().unwrap_or(0)).filter_map(|index| self.bid_at(index))
    }

    /// Checks that `bid` assigns a legal value to every issue and nothing else.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::IncompleteBid`], [`CoreError::UnknownValue`] or
    /// [`CoreError::UnknownIssue`] describing the first violation found.
    pub fn validate_bid(&self, bid: &Bid) -> Result<(), CoreError> {
        for issue in self.issues() {
            let value = bid.value(issue).ok_or_else(|| CoreError::IncompleteBid {
                issue: issue.to_string(),
            })?;
            if !self.contains(issue, value) {
                return Err(CoreError::UnknownValue {
                    issue: issue.to_string(),
                    value: value.to_string(),
                });
            }
        }
        if let Some(extra) = bid.issues().find(|issue| !self.issues.contains_key(*issue)) {
            return Err(CoreError::UnknownIssue(extra.to_string()));
        }
        Ok(())
    }
}

/// Incremental construction of a [`Domain`].
#[derive(Debug, Clone)]
pub struct DomainBuilder {
    name: String,
    issues: BTreeMap<String, Vec<Value>>,
}

impl DomainBuilder {
    /// Adds an issue with its values, replacing any earlier definition.
    #[must_use]
    pub fn issue<I, V>(mut self, issue: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.issues
            .insert(issue.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Validates and builds the domain.
    ///
    /// # Errors
    ///
    /// See [`Domain::new`].
    pub fn build(self) -> Result<Domain, CoreError> {
        Domain::new(self.name, self.issues)
    }
}

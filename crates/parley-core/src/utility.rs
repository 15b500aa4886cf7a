//! Additive utility spaces.
//!
//! A [`LinearAdditive`] space scores a bid as the weighted sum of per-issue
//! value utilities. Issue weights sum to one and every value utility lies in
//! `[0, 1]`, so every bid scores in `[0, 1]`.

use std::collections::BTreeMap;

use crate::{Bid, CoreError, Domain, Value};

/// Tolerance when checking that issue weights sum to one.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// A private preference ordering over the bids of a domain.
pub trait UtilitySpace {
    /// The domain this space is defined over.
    fn domain(&self) -> &Domain;

    /// Utility of `bid`, in `[0, 1]`.
    fn utility(&self, bid: &Bid) -> f64;

    /// The bid obtained by walking away, if the profile defines one.
    fn reservation_bid(&self) -> Option<&Bid>;

    /// Utility of the reservation bid, if any.
    fn reservation_utility(&self) -> Option<f64> {
        self.reservation_bid().map(|bid| self.utility(bid))
    }
}

/// Weighted-sum utility function over a discrete domain.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearAdditive {
    name: String,
    domain: Domain,
    issue_weights: BTreeMap<String, f64>,
    value_utilities: BTreeMap<String, BTreeMap<Value, f64>>,
    reservation_bid: Option<Bid>,
}

impl LinearAdditive {
    /// Creates a validated utility space.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidProfile`] if a weight or utility is out of
    /// `[0, 1]`, weights do not sum to one, an issue or value is not covered,
    /// or the reservation bid is not a legal bid of the domain.
    pub fn new(
        name: impl Into<String>,
        domain: Domain,
        issue_weights: BTreeMap<String, f64>,
        value_utilities: BTreeMap<String, BTreeMap<Value, f64>>,
        reservation_bid: Option<Bid>,
    ) -> Result<Self, CoreError> {
        let mut total_weight = 0.0;
        for issue in domain.issues() {
            let weight = *issue_weights.get(issue).ok_or_else(|| {
                CoreError::InvalidProfile(format!("issue '{issue}' has no weight"))
            })?;
            if !(0.0..=1.0).contains(&weight) {
                return Err(CoreError::InvalidProfile(format!(
                    "weight {weight} of issue '{issue}' is outside [0, 1]"
                )));
            }
            total_weight += weight;

            let utilities = value_utilities.get(issue).ok_or_else(|| {
                CoreError::InvalidProfile(format!("issue '{issue}' has no value utilities"))
            })?;
            for value in domain.values(issue).unwrap_or_default() {
                let utility = utilities.get(value).ok_or_else(|| {
                    CoreError::InvalidProfile(format!(
                        "value '{value}' of issue '{issue}' has no utility"
                    ))
                })?;
                if !(0.0..=1.0).contains(utility) {
                    return Err(CoreError::InvalidProfile(format!(
                        "utility {utility} of '{issue}={value}' is outside [0, 1]"
                    )));
                }
            }
        }
        if (total_weight - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(CoreError::InvalidProfile(format!(
                "issue weights sum to {total_weight}, expected 1"
            )));
        }
        if let Some(unknown) = issue_weights
            .keys()
            .find(|issue| domain.values(issue).is_none())
        {
            return Err(CoreError::UnknownIssue(unknown.clone()));
        }
        if let Some(bid) = &reservation_bid {
            domain.validate_bid(bid)?;
        }

        Ok(Self {
            name: name.into(),
            domain,
            issue_weights,
            value_utilities,
            reservation_bid,
        })
    }

    /// Starts building a utility space over `domain`.
    #[must_use]
    pub fn builder(domain: Domain) -> LinearAdditiveBuilder {
        LinearAdditiveBuilder {
            name: format!("{}-profile", domain.name()),
            domain,
            issue_weights: BTreeMap::new(),
            value_utilities: BTreeMap::new(),
            reservation_bid: None,
        }
    }

    /// Returns the profile name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the weight of `issue`.
    #[must_use]
    pub fn weight(&self, issue: &str) -> Option<f64> {
        self.issue_weights.get(issue).copied()
    }

    /// Returns the utility contribution of `value` for `issue`, before weighting.
    #[must_use]
    pub fn value_utility(&self, issue: &str, value: &Value) -> Option<f64> {
        self.value_utilities.get(issue)?.get(value).copied()
    }
}

impl UtilitySpace for LinearAdditive {
    fn domain(&self) -> &Domain {
        &self.domain
    }

    fn utility(&self, bid: &Bid) -> f64 {
        let total: f64 = bid
            .iter()
            .filter_map(|(issue, value)| {
                Some(self.weight(issue)? * self.value_utility(issue, value)?)
            })
            .sum();
        total.clamp(0.0, 1.0)
    }

    fn reservation_bid(&self) -> Option<&Bid> {
        self.reservation_bid.as_ref()
    }
}

/// Incremental construction of a [`LinearAdditive`] space.
#[derive(Debug, Clone)]
pub struct LinearAdditiveBuilder {
    name: String,
    domain: Domain,
    issue_weights: BTreeMap<String, f64>,
    value_utilities: BTreeMap<String, BTreeMap<Value, f64>>,
    reservation_bid: Option<Bid>,
}

impl LinearAdditiveBuilder {
    /// Sets the profile name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the weight of an issue.
    #[must_use]
    pub fn weight(mut self, issue: impl Into<String>, weight: f64) -> Self {
        self.issue_weights.insert(issue.into(), weight);
        self
    }

    /// Sets the utility of one value of an issue.
    #[must_use]
    pub fn utility(mut self, issue: impl Into<String>, value: impl Into<Value>, utility: f64) -> Self {
        self.value_utilities
            .entry(issue.into())
            .or_default()
            .insert(value.into(), utility);
        self
    }

    /// Sets the reservation bid.
    #[must_use]
    pub fn reservation(mut self, bid: Bid) -> Self {
        self.reservation_bid = Some(bid);
        self
    }

    /// Validates and builds the space.
    ///
    /// # Errors
    ///
    /// See [`LinearAdditive::new`].
    pub fn build(self) -> Result<LinearAdditive, CoreError> {
        LinearAdditive::new(
            self.name,
            self.domain,
            self.issue_weights,
            self.value_utilities,
            self.reservation_bid,
        )
    }
}

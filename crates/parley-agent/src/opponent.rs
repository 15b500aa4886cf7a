//! Frequency-based opponent model.
//!
//! The model counts how often the opponent proposes each value of each
//! issue and adapts a weight per issue: an issue whose value the opponent
//! keeps from one offer to the next is treated as important to them, an
//! issue whose value keeps changing as one they are willing to trade.
//!
//! Every update returns a new [`FrequencyModel`]; earlier snapshots stay
//! valid and unchanged.

use std::collections::BTreeMap;
use std::sync::Arc;

use parley_core::{Bid, Domain, Value};

use crate::AgentError;

/// Lowest desirability credited to any value, seen or not.
pub const VALUE_FRACTION_FLOOR: f64 = 0.2;

/// Cap on the per-observation weight gain of a stable issue.
pub const MAX_EPSILON: f64 = 0.4;

/// Cap on the per-observation weight loss of a volatile issue.
pub const MAX_PENALTY: f64 = 0.4;

/// Lowest weight any issue can fall to.
pub const WEIGHT_FLOOR: f64 = 0.01;

/// Estimated opponent preferences learned from their offers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrequencyModel {
    domain: Option<Arc<Domain>>,
    frequencies: BTreeMap<String, BTreeMap<Value, u32>>,
    weights: BTreeMap<String, f64>,
    total_bids: u32,
    reservation_bid: Option<Bid>,
}

impl FrequencyModel {
    /// Creates an unbound model. Bind it with [`with_domain`](Self::with_domain).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an empty model bound to `domain`, with equal issue weights.
    #[must_use]
    pub fn with_domain(&self, domain: Arc<Domain>, reservation_bid: Option<Bid>) -> Self {
        let initial_weight = (1.0 / domain.issue_count().max(1) as f64).max(WEIGHT_FLOOR);
        let frequencies = domain
            .issues()
            .map(|issue| (issue.to_string(), BTreeMap::new()))
            .collect();
        let weights = domain
            .issues()
            .map(|issue| (issue.to_string(), initial_weight))
            .collect();
        Self {
            domain: Some(domain),
            frequencies,
            weights,
            total_bids: 0,
            reservation_bid,
        }
    }

    /// Returns the model after observing `bid`.
    ///
    /// `previous` is the opponent's offer before `bid`; when present, issue
    /// weights adapt to whether each issue's value changed.
    pub fn with_offer(&self, bid: &Bid, previous: Option<&Bid>) -> Result<Self, AgentError> {
        let domain = self.domain.as_ref().ok_or(AgentError::UninitializedDomain)?;

        let mut frequencies = self.frequencies.clone();
        for issue in domain.issues() {
            if let Some(value) = bid.value(issue) {
                *frequencies
                    .entry(issue.to_string())
                    .or_default()
                    .entry(value.clone())
                    .or_insert(0) += 1;
            }
        }

        let mut weights = self.weights.clone();
        if let Some(previous) = previous {
            for issue in domain.issues() {
                let epsilon = frequencies.get(issue).map_or(0.0, stability);
                let weight = weights.entry(issue.to_string()).or_insert(WEIGHT_FLOOR);
                if bid.value(issue) == previous.value(issue) {
                    *weight += epsilon;
                } else {
                    let penalty = if epsilon > 0.0 {
                        (1.0 / epsilon).min(MAX_PENALTY)
                    } else {
                        MAX_PENALTY
                    };
                    *weight = (*weight - penalty).max(WEIGHT_FLOOR);
                }
            }
        }

        Ok(Self {
            domain: Some(Arc::clone(domain)),
            frequencies,
            weights,
            total_bids: self.total_bids + 1,
            reservation_bid: self.reservation_bid.clone(),
        })
    }

    /// Estimated utility of `bid` for the opponent, in `[0, 1]`.
    ///
    /// Before any observation every bid is estimated at 1.
    pub fn utility(&self, bid: &Bid) -> Result<f64, AgentError> {
        let domain = self.domain.as_ref().ok_or(AgentError::UninitializedDomain)?;
        if self.total_bids == 0 {
            return Ok(1.0);
        }

        let mut weighted = 0.0;
        let mut applied = 0.0;
        for issue in domain.issues() {
            let Some(value) = bid.value(issue) else {
                continue;
            };
            let weight = self.weight(issue).unwrap_or(WEIGHT_FLOOR);
            weighted += weight * self.fraction(issue, value);
            applied += weight;
        }
        if applied <= 0.0 {
            return Ok(0.0);
        }
        Ok((weighted / applied).clamp(0.0, 1.0))
    }

    /// Returns true once a domain is bound.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.domain.is_some()
    }

    /// Observation counts per value of `issue`.
    #[must_use]
    pub fn counts(&self, issue: &str) -> Option<&BTreeMap<Value, u32>> {
        self.frequencies.get(issue)
    }

    /// Current adapted weight of `issue`.
    #[must_use]
    pub fn weight(&self, issue: &str) -> Option<f64> {
        self.weights.get(issue).copied()
    }

    /// Number of offers observed.
    #[must_use]
    pub const fn total_bids(&self) -> u32 {
        self.total_bids
    }

    /// The reservation bid the model was bound with.
    #[must_use]
    pub fn reservation_bid(&self) -> Option<&Bid> {
        self.reservation_bid.as_ref()
    }

    fn fraction(&self, issue: &str, value: &Value) -> f64 {
        let count = self
            .counts(issue)
            .and_then(|counts| counts.get(value))
            .copied()
            .unwrap_or(0);
        (f64::from(count) / f64::from(self.total_bids)).max(VALUE_FRACTION_FLOOR)
    }
}

/// Share of the most frequent value among one issue's observations, capped.
fn stability(counts: &BTreeMap<Value, u32>) -> f64 {
    let total: u32 = counts.values().sum();
    if total == 0 {
        return 0.0;
    }
    let max = counts.values().copied().max().unwrap_or(0);
    (f64::from(max) / f64::from(total)).min(MAX_EPSILON)
}

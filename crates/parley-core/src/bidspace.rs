//! Bid-space queries.
//!
//! The bidding strategy never walks the bid space itself. It asks a
//! [`BidUtility`] for the best bid, for every bid inside a utility band, or
//! for a uniformly random bid. [`BidsWithUtility`] answers these queries
//! over an enumerated, utility-sorted copy of the space.

use std::sync::Arc;

use rand::{Rng, RngCore};
use tracing::debug;

use crate::{Bid, CoreError, LinearAdditive, UtilitySpace};

/// Largest bid space [`BidsWithUtility`] will enumerate.
pub const MAX_ENUMERATED_BIDS: u64 = 1_000_000;

/// A closed utility interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Inclusive lower bound.
    pub min: f64,
    /// Inclusive upper bound.
    pub max: f64,
}

impl Interval {
    /// Creates an interval. An interval with `min > max` is empty.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true if `utility` lies inside the interval.
    #[must_use]
    pub fn contains(&self, utility: f64) -> bool {
        self.min <= utility && utility <= self.max
    }

    /// Returns true if no utility can lie inside the interval.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }
}

/// Utility queries over the bid space of one utility function.
pub trait BidUtility {
    /// Utility of `bid` under the owning party's utility function.
    fn utility_of(&self, bid: &Bid) -> f64;

    /// The bid of maximum (`maximize = true`) or minimum utility.
    fn extreme_bid(&self, maximize: bool) -> Bid;

    /// Every bid whose utility lies in `interval`. May be empty.
    fn bids_with_utility_in(&self, interval: Interval) -> Vec<Bid>;

    /// A bid drawn uniformly from the whole bid space.
    fn random_bid(&self, rng: &mut dyn RngCore) -> Bid;
}

/// Enumerated bid space sorted by ascending utility.
#[derive(Debug, Clone)]
pub struct BidsWithUtility {
    space: Arc<LinearAdditive>,
    sorted: Vec<(f64, Bid)>,
    best: Bid,
    worst: Bid,
}

impl BidsWithUtility {
    /// Enumerates and sorts the bid space of `space`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::BidSpaceTooLarge`] if the domain has more than
    /// [`MAX_ENUMERATED_BIDS`] bids.
    pub fn new(space: Arc<LinearAdditive>) -> Result<Self, CoreError> {
        let size = space.domain().bid_count().unwrap_or(u64::MAX);
        if size > MAX_ENUMERATED_BIDS {
            return Err(CoreError::BidSpaceTooLarge {
                size,
                limit: MAX_ENUMERATED_BIDS,
            });
        }

        let mut sorted: Vec<(f64, Bid)> = space
            .domain()
            .all_bids()
            .map(|bid| (space.utility(&bid), bid))
            .collect();
        sorted.sort_by(|(a, _), (b, _)| a.total_cmp(b));

        let (worst, best) = match (sorted.first(), sorted.last()) {
            (Some((_, worst)), Some((_, best))) => (worst.clone(), best.clone()),
            _ => {
                return Err(CoreError::InvalidDomain(format!(
                    "domain '{}' has an empty bid space",
                    space.domain().name()
                )));
            }
        };
        debug!(
            domain = space.domain().name(),
            bids = sorted.len(),
            "enumerated bid space"
        );

        Ok(Self {
            space,
            sorted,
            best,
            worst,
        })
    }

    /// The utility space the bids are scored with.
    #[must_use]
    pub fn space(&self) -> &Arc<LinearAdditive> {
        &self.space
    }

    /// Number of bids in the space.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    /// Returns true if the space holds no bids. Never true for a built space.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }
}

impl BidUtility for BidsWithUtility {
    fn utility_of(&self, bid: &Bid) -> f64 {
        self.space.utility(bid)
    }

    fn extreme_bid(&self, maximize: bool) -> Bid {
        if maximize {
            self.best.clone()
        } else {
            self.worst.clone()
        }
    }

    fn bids_with_utility_in(&self, interval: Interval) -> Vec<Bid> {
        if interval.is_empty() {
            return Vec::new();
        }
        let start = self.sorted.partition_point(|(u, _)| *u < interval.min);
        let end = self.sorted.partition_point(|(u, _)| *u <= interval.max);
        self.sorted
            .get(start..end)
            .map(|slice| slice.iter().map(|(_, bid)| bid.clone()).collect())
            .unwrap_or_default()
    }

    fn random_bid(&self, rng: &mut dyn RngCore) -> Bid {
        let index = rng.gen_range(0..self.sorted.len());
        self.sorted
            .get(index)
            .map_or_else(|| self.best.clone(), |(_, bid)| bid.clone())
    }
}

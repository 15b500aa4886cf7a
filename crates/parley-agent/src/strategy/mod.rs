//! Phased bidding strategy.
//!
//! A session is split into three round-indexed phases:
//!
//! - [`Phase::Selfish`] — follow the expected-utility curve with random
//!   bids from a narrow band below it, while the opponent model learns.
//! - [`Phase::Mixed`] — concede through a band driven by `alpha`. The first
//!   half prefers fortunate, nice, concession and silent moves in that
//!   order; the second half favours bids the opponent model rates highest.
//! - [`Phase::Settle`] — re-offer the best bid the opponent has proposed.
//!
//! All cross-call memory (`alpha`, the decrease-pressure flag, the current
//! phase) lives in [`BiddingStrategy`], so any intermediate state can be
//! constructed directly.

use std::collections::BTreeMap;
use std::fmt;

use parley_core::{Bid, BidUtility, Interval, Progress};
use rand::RngCore;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AgentConfig;
use crate::expected::ExpectedUtilityTable;
use crate::opponent::FrequencyModel;
use crate::AgentError;


/// Width of the phase-one band below the expected-utility target.
pub const PHASE_ONE_BAND: f64 = 0.05;

/// Distance of the phase-two band's lower bound below `alpha`.
pub const BAND_BELOW_ALPHA: f64 = 0.04;

/// Offset added to `alpha` before averaging with the target for the upper bound.
pub const BAND_ABOVE_ALPHA: f64 = 0.05;

/// `alpha` decrease applied after a conceding move in the first half of phase two.
pub const PRESSURE_STEP: f64 = 0.0025;

/// Unconditional `alpha` decrease per bid in the second half of phase two.
pub const LATE_ALPHA_STEP: f64 = 0.002;

/// Number of opponent-favoured candidates drawn from late in phase two.
pub const TOP_CANDIDATES: usize = 100;

/// Own-utility tolerance for a nice move.
pub const NICE_TOLERANCE: f64 = 0.007;

/// Tolerance on both deltas for a silent move.
pub const SILENT_TOLERANCE: f64 = 0.005;

/// Random fallback threshold during the first half of the session.
pub const EARLY_RANDOM_THRESHOLD: f64 = 0.65;

/// Random fallback threshold during the second half of the session.
pub const LATE_RANDOM_THRESHOLD: f64 = 0.6;

/// Bidding regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Selfish bidding along the expected-utility curve while learning.
    Selfish,
    /// Mixed concession guided by the opponent model.
    Mixed,
    /// Re-offer the opponent's best proposal.
    Settle,
}

impl Phase {
    /// One-based phase number.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Selfish => 1,
            Self::Mixed => 2,
            Self::Settle => 3,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "phase {}", self.number())
    }
}

/// Round boundaries between phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseSchedule {
    phase_two_start: u32,
    phase_three_start: u32,
    deadline: u32,
}

impl PhaseSchedule {
    /// Creates a schedule. Boundaries are clamped so they never invert.
    #[must_use]
    pub fn new(phase_two_start: u32, phase_three_start: u32, deadline: u32) -> Self {
        let phase_three_start = phase_three_start.min(deadline);
        Self {
            phase_two_start: phase_two_start.min(phase_three_start),
            phase_three_start,
            deadline,
        }
    }

    /// Phase in effect at `round`.
    #[must_use]
    pub const fn phase_at(&self, round: u32) -> Phase {
        if round >= self.phase_three_start {
            Phase::Settle
        } else if round >= self.phase_two_start {
            Phase::Mixed
        } else {
            Phase::Selfish
        }
    }

    /// Round splitting phase two into its concession halves.
    #[must_use]
    pub fn midpoint(&self) -> u32 {
        (f64::from(self.phase_two_start + self.phase_three_start) / 2.0).round() as u32
    }

    /// First round of phase two.
    #[must_use]
    pub const fn phase_two_start(&self) -> u32 {
        self.phase_two_start
    }

    /// First round of phase three.
    #[must_use]
    pub const fn phase_three_start(&self) -> u32 {
        self.phase_three_start
    }

    /// Round deadline.
    #[must_use]
    pub const fn deadline(&self) -> u32 {
        self.deadline
    }
}

impl Default for PhaseSchedule {
    fn default() -> Self {
        AgentConfig::default().schedule()
    }
}

/// Classification of a candidate bid relative to our last offer.
///
/// Variants are ordered by preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    /// Better for both sides.
    Fortunate,
    /// Same for us, better for the opponent.
    Nice,
    /// Worse for us, not worse for the opponent.
    Concession,
    /// Practically the same for both sides.
    Silent,
}

impl MoveKind {
    /// Classifies a move by the change in our utility and the opponent's
    /// estimated utility. Selfish and unfortunate moves yield `None`.
    #[must_use]
    pub fn classify(delta_self: f64, delta_opponent: f64) -> Option<Self> {
        if delta_self > 0.0 && delta_opponent > 0.0 {
            Some(Self::Fortunate)
        } else if delta_self.abs() <= NICE_TOLERANCE && delta_opponent > 0.0 {
            Some(Self::Nice)
        } else if delta_self < 0.0 && delta_opponent >= 0.0 {
            Some(Self::Concession)
        } else if delta_self.abs() <= SILENT_TOLERANCE && delta_opponent.abs() <= SILENT_TOLERANCE {
            Some(Self::Silent)
        } else {
            None
        }
    }

    /// Returns true if choosing this move gives ground.
    #[must_use]
    pub const fn concedes(self) -> bool {
        matches!(self, Self::Concession | Self::Silent)
    }
}

/// Read-only view of the session a bid is generated for.
#[derive(Clone, Copy)]
pub struct BidContext<'a> {
    /// Our bid space.
    pub bids: &'a dyn BidUtility,
    /// Current opponent model snapshot.
    pub opponent: &'a FrequencyModel,
    /// Expected-utility targets.
    pub table: &'a ExpectedUtilityTable,
    /// Session progress at this turn.
    pub progress: Progress,
    /// Our previous offer.
    pub last_offered: Option<&'a Bid>,
    /// Every opponent offer so far, oldest first.
    pub received: &'a [Bid],
    /// Current acceptance floor; resampled bids must reach it.
    pub acceptance_floor: f64,
}

/// Phase-dispatching bid generator.
#[derive(Debug, Clone, PartialEq)]
pub struct BiddingStrategy {
    schedule: PhaseSchedule,
    phase: Phase,
    alpha: f64,
    decrease_pressure: bool,
    random_attempts: u32,
}

impl BiddingStrategy {
    /// Creates a strategy in phase one.
    #[must_use]
    pub fn new(schedule: PhaseSchedule, initial_alpha: f64, random_attempts: u32) -> Self {
        Self {
            schedule,
            phase: Phase::Selfish,
            alpha: initial_alpha,
            decrease_pressure: false,
            random_attempts,
        }
    }

    /// Creates a strategy from agent configuration.
    #[must_use]
    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(config.schedule(), config.initial_alpha, config.random_attempts)
    }

    /// Returns the strategy with the given concession state.
    #[must_use]
    pub fn with_state(self, alpha: f64, decrease_pressure: bool) -> Self {
        Self {
            alpha,
            decrease_pressure,
            ..self
        }
    }

    /// Current concession level.
    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Whether the next first-half phase-two bid lowers `alpha`.
    #[must_use]
    pub const fn decrease_pressure(&self) -> bool {
        self.decrease_pressure
    }

    /// Phase of the most recent turn.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Phase boundaries.
    #[must_use]
    pub const fn schedule(&self) -> &PhaseSchedule {
        &self.schedule
    }

    /// Moves to the phase for `round`. Phases never move backwards.
    pub fn update_phase(&mut self, round: u32) -> Phase {
        let next = self.schedule.phase_at(round).max(self.phase);
        if next != self.phase {
            debug!(round, from = %self.phase, to = %next, "entering new bidding phase");
            self.phase = next;
        }
        self.phase
    }

    /// Produces the next counter-offer for the current phase.
    pub fn next_bid(
        &mut self,
        ctx: &BidContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Bid, AgentError> {
        let bid = match self.phase {
            Phase::Selfish => {
                let bid = Self::selfish_bid(ctx, rng);
                self.avoid_repeat(bid, ctx, rng)
            }
            Phase::Mixed => {
                let bid = if ctx.progress.current_round() < self.schedule.midpoint() {
                    self.classified_bid(ctx, rng)?
                } else {
                    self.opponent_favoured_bid(ctx, rng)?
                };
                self.avoid_repeat(bid, ctx, rng)
            }
            Phase::Settle => Self::settle_bid(ctx),
        };
        Ok(bid)
    }

    fn selfish_bid(ctx: &BidContext<'_>, rng: &mut dyn RngCore) -> Bid {
        let target = ctx.table.get(ctx.progress.remaining_rounds());
        let candidates = ctx
            .bids
            .bids_with_utility_in(Interval::new(target - PHASE_ONE_BAND, target));
        if let Some(bid) = candidates.choose(rng) {
            return bid.clone();
        }
        debug!(target, "no bids near target utility, offering best bid");
        ctx.bids.extreme_bid(true)
    }

    fn concession_band(&self, ctx: &BidContext<'_>) -> Interval {
        let target = ctx.table.get(ctx.progress.remaining_rounds());
        Interval::new(
            self.alpha - BAND_BELOW_ALPHA,
            (self.alpha + BAND_ABOVE_ALPHA + target) / 2.0,
        )
    }

    fn classified_bid(
        &mut self,
        ctx: &BidContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Bid, AgentError> {
        let band = self.concession_band(ctx);
        let candidates = ctx.bids.bids_with_utility_in(band);
        if self.decrease_pressure {
            self.alpha -= PRESSURE_STEP;
        }
        if candidates.is_empty() {
            debug!(min = band.min, max = band.max, "empty concession band");
            self.decrease_pressure = true;
            return Ok(self.random_bid_above(ctx, rng));
        }

        let reference = ctx
            .last_offered
            .cloned()
            .unwrap_or_else(|| ctx.bids.extreme_bid(true));
        let own_reference = ctx.bids.utility_of(&reference);
        let opponent_reference = ctx.opponent.utility(&reference)?;

        let mut buckets: BTreeMap<MoveKind, Vec<&Bid>> = BTreeMap::new();
        for bid in &candidates {
            let delta_self = ctx.bids.utility_of(bid) - own_reference;
            let delta_opponent = ctx.opponent.utility(bid)? - opponent_reference;
            if let Some(kind) = MoveKind::classify(delta_self, delta_opponent) {
                buckets.entry(kind).or_default().push(bid);
            }
        }

        if let Some((kind, bucket)) = buckets.into_iter().next() {
            self.decrease_pressure = kind.concedes();
            if let Some(bid) = bucket.choose(rng) {
                debug!(move_kind = ?kind, alpha = self.alpha, "classified move");
                return Ok((*bid).clone());
            }
        }

        self.decrease_pressure = true;
        debug!(alpha = self.alpha, "no cooperative move available, conceding selfishly");
        Ok(candidates
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| ctx.bids.extreme_bid(true)))
    }

    fn opponent_favoured_bid(
        &mut self,
        ctx: &BidContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Bid, AgentError> {
        let band = self.concession_band(ctx);
        let candidates = ctx.bids.bids_with_utility_in(band);
        self.alpha -= LATE_ALPHA_STEP;
        if candidates.is_empty() {
            debug!(min = band.min, max = band.max, "empty concession band");
            return Ok(self.random_bid_above(ctx, rng));
        }

        let mut scored = candidates
            .into_iter()
            .map(|bid| -> Result<(f64, Bid), AgentError> {
                Ok((ctx.opponent.utility(&bid)?, bid))
            })
            .collect::<Result<Vec<_>, _>>()?;
        scored.sort_by(|(a, _), (b, _)| b.total_cmp(a));
        scored.truncate(TOP_CANDIDATES);

        Ok(scored
            .choose(rng)
            .map(|(_, bid)| bid.clone())
            .unwrap_or_else(|| ctx.bids.extreme_bid(true)))
    }

    fn settle_bid(ctx: &BidContext<'_>) -> Bid {
        let mut best: Option<(f64, &Bid)> = None;
        for bid in ctx.received {
            let utility = ctx.bids.utility_of(bid);
            if best.is_none_or(|(top, _)| utility > top) {
                best = Some((utility, bid));
            }
        }
        best.map_or_else(|| ctx.bids.extreme_bid(true), |(_, bid)| bid.clone())
    }

    /// Bounded random search for a bid above a time-dependent threshold.
    /// Falls back to the best bid sampled.
    fn random_bid_above(&self, ctx: &BidContext<'_>, rng: &mut dyn RngCore) -> Bid {
        let threshold = if ctx.progress.fraction() < 0.5 {
            EARLY_RANDOM_THRESHOLD
        } else {
            LATE_RANDOM_THRESHOLD
        };
        let mut best: Option<(f64, Bid)> = None;
        for _ in 0..self.random_attempts {
            let bid = ctx.bids.random_bid(rng);
            let utility = ctx.bids.utility_of(&bid);
            if utility > threshold {
                return bid;
            }
            if best.as_ref().is_none_or(|(top, _)| utility > *top) {
                best = Some((utility, bid));
            }
        }
        best.map_or_else(|| ctx.bids.extreme_bid(true), |(_, bid)| bid)
    }

    /// Replaces a bid identical to our last offer with a random one that
    /// still clears the acceptance floor, when such a bid can be found.
    fn avoid_repeat(&self, bid: Bid, ctx: &BidContext<'_>, rng: &mut dyn RngCore) -> Bid {
        if ctx.last_offered != Some(&bid) {
            return bid;
        }
        for _ in 0..self.random_attempts {
            let candidate = ctx.bids.random_bid(rng);
            if candidate != bid && ctx.bids.utility_of(&candidate) > ctx.acceptance_floor {
                debug!(%candidate, "resampled repeated bid");
                return candidate;
            }
        }
        bid
    }
}

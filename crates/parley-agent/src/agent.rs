//! The negotiating party.
//!
//! [`NegotiationAgent`] reacts to session events, keeps the opponent model
//! and received-bid history current, and answers each turn with an accept
//! or a counter-offer.

use std::sync::Arc;

use parley_core::{Bid, BidUtility, BidsWithUtility, Progress, UtilitySpace};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::AgentError;
use crate::acceptance::AcceptancePolicy;
use crate::config::AgentConfig;
use crate::expected::ExpectedUtilityTable;
use crate::opponent::FrequencyModel;
use crate::protocol::{Action, Event, Party, PartyId, Settings};
use crate::strategy::{BidContext, BiddingStrategy, Phase};

/// Where the agent is in its session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    /// No session has started.
    WaitingForDomain,
    /// Bound to a domain, between turns.
    WaitingForTurn,
    /// Producing an action for the current turn.
    ActingOnTurn,
    /// The session has ended.
    Finished,
}

struct Session {
    me: PartyId,
    bids: BidsWithUtility,
    table: ExpectedUtilityTable,
    progress: Progress,
    opponent: FrequencyModel,
    strategy: BiddingStrategy,
    acceptance: AcceptancePolicy,
    received: Vec<Bid>,
    last_offered: Option<Bid>,
    learn_throughout: bool,
}

impl Session {
    fn start(settings: Settings, config: &AgentConfig) -> Result<Self, AgentError> {
        let config = config.with_deadline(settings.deadline_rounds);
        config.validate()?;

        let profile = settings.profile;
        let reservation = profile.reservation_utility().unwrap_or(0.0);
        let opponent = FrequencyModel::new().with_domain(
            Arc::new(profile.domain().clone()),
            profile.reservation_bid().cloned(),
        );

        info!(
            party = %settings.party,
            domain = profile.domain().name(),
            deadline = settings.deadline_rounds,
            reservation,
            "session started"
        );

        Ok(Self {
            me: settings.party,
            bids: BidsWithUtility::new(profile)?,
            table: ExpectedUtilityTable::new(reservation, settings.deadline_rounds),
            progress: Progress::new(settings.deadline_rounds)?,
            opponent,
            strategy: BiddingStrategy::from_config(&config),
            acceptance: config.acceptance.clone(),
            received: Vec::new(),
            last_offered: None,
            learn_throughout: config.learn_throughout,
        })
    }

    fn observe(&mut self, action: &Action) -> Result<(), AgentError> {
        if action.actor() == &self.me {
            return Ok(());
        }
        let Action::Offer { bid, .. } = action else {
            debug!(%action, "opponent action carries no new offer");
            return Ok(());
        };
        if let Err(e) = self.bids.space().domain().validate_bid(bid) {
            warn!(%bid, error = %e, "ignoring invalid opponent bid");
            return Ok(());
        }

        let phase = self.strategy.update_phase(self.progress.current_round());
        if phase == Phase::Selfish || self.learn_throughout {
            self.opponent = self.opponent.with_offer(bid, self.received.last())?;
        }
        debug!(
            round = self.progress.current_round(),
            utility = self.bids.utility_of(bid),
            "received offer"
        );
        self.received.push(bid.clone());
        Ok(())
    }

    fn act(&mut self, rng: &mut dyn RngCore) -> Result<Action, AgentError> {
        let round = self.progress.current_round();
        let time = self.progress.fraction();
        let phase = self.strategy.update_phase(round);

        let action = match self.received.last() {
            None => Action::Offer {
                actor: self.me.clone(),
                bid: self.bids.extreme_bid(true),
            },
            Some(standing) if self.acceptance.accepts_outright(self.bids.utility_of(standing)) => {
                Action::Accept {
                    actor: self.me.clone(),
                    bid: standing.clone(),
                }
            }
            Some(standing) => {
                let ctx = BidContext {
                    bids: &self.bids,
                    opponent: &self.opponent,
                    table: &self.table,
                    progress: self.progress,
                    last_offered: self.last_offered.as_ref(),
                    received: &self.received,
                    acceptance_floor: self.acceptance.floor_at(time),
                };
                let counter = self.strategy.next_bid(&ctx, rng)?;
                if self.acceptance.accept(&self.bids, Some(standing), &counter, time) {
                    Action::Accept {
                        actor: self.me.clone(),
                        bid: standing.clone(),
                    }
                } else {
                    Action::Offer {
                        actor: self.me.clone(),
                        bid: counter,
                    }
                }
            }
        };

        if let Action::Offer { bid, .. } = &action {
            debug!(round, %phase, utility = self.bids.utility_of(bid), "offering");
            self.last_offered = Some(bid.clone());
        } else {
            info!(round, %phase, "accepting standing offer");
        }
        self.progress = self.progress.advance();
        Ok(action)
    }
}

/// An event-driven negotiating party.
///
/// The random source is a type parameter so sessions can be replayed with a
/// seeded generator.
pub struct NegotiationAgent<R = StdRng> {
    config: AgentConfig,
    lifecycle: Lifecycle,
    session: Option<Session>,
    rng: R,
}

impl NegotiationAgent<StdRng> {
    /// Creates an agent seeded from the operating system.
    #[must_use]
    pub fn new(config: AgentConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates an agent with a deterministic random source.
    #[must_use]
    pub fn with_seed(config: AgentConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> NegotiationAgent<R> {
    /// Creates an agent drawing randomness from `rng`.
    #[must_use]
    pub fn with_rng(config: AgentConfig, rng: R) -> Self {
        Self {
            config,
            lifecycle: Lifecycle::WaitingForDomain,
            session: None,
            rng,
        }
    }

    /// Agent configuration.
    #[must_use]
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// The opponent model, while a session is running.
    #[must_use]
    pub fn opponent_model(&self) -> Option<&FrequencyModel> {
        self.session.as_ref().map(|s| &s.opponent)
    }

    /// The bidding strategy state, while a session is running.
    #[must_use]
    pub fn strategy(&self) -> Option<&BiddingStrategy> {
        self.session.as_ref().map(|s| &s.strategy)
    }

    /// Expected-utility targets, while a session is running.
    #[must_use]
    pub fn expected_utilities(&self) -> Option<&ExpectedUtilityTable> {
        self.session.as_ref().map(|s| &s.table)
    }

    /// Session progress, while a session is running.
    #[must_use]
    pub fn progress(&self) -> Option<Progress> {
        self.session.as_ref().map(|s| s.progress)
    }

    /// Opponent offers received so far, oldest first.
    #[must_use]
    pub fn received_bids(&self) -> &[Bid] {
        self.session
            .as_ref()
            .map(|s| s.received.as_slice())
            .unwrap_or_default()
    }

    /// Our most recent offer.
    #[must_use]
    pub fn last_offered(&self) -> Option<&Bid> {
        self.session.as_ref().and_then(|s| s.last_offered.as_ref())
    }

    fn session_mut(&mut self) -> Result<&mut Session, AgentError> {
        match (self.lifecycle, self.session.as_mut()) {
            (Lifecycle::Finished, _) => Err(AgentError::SessionFinished),
            (_, Some(session)) => Ok(session),
            (_, None) => Err(AgentError::UninitializedDomain),
        }
    }
}

impl<R: RngCore> Party for NegotiationAgent<R> {
    fn notify(&mut self, event: Event) -> Result<Option<Action>, AgentError> {
        match event {
            Event::SessionStart(settings) => {
                match self.lifecycle {
                    Lifecycle::WaitingForDomain => {}
                    Lifecycle::Finished => return Err(AgentError::SessionFinished),
                    Lifecycle::WaitingForTurn | Lifecycle::ActingOnTurn => {
                        return Err(AgentError::SessionAlreadyStarted);
                    }
                }
                self.session = Some(Session::start(settings, &self.config)?);
                self.lifecycle = Lifecycle::WaitingForTurn;
                Ok(None)
            }
            Event::OpponentActed(action) => {
                self.session_mut()?.observe(&action)?;
                Ok(None)
            }
            Event::YourTurn => {
                self.session_mut()?;
                self.lifecycle = Lifecycle::ActingOnTurn;
                let result = match self.session.as_mut() {
                    Some(session) => session.act(&mut self.rng),
                    None => Err(AgentError::UninitializedDomain),
                };
                self.lifecycle = Lifecycle::WaitingForTurn;
                result.map(Some)
            }
            Event::SessionEnd => {
                if let Some(session) = self.session.take() {
                    info!(
                        party = %session.me,
                        rounds = session.progress.current_round(),
                        received = session.received.len(),
                        "session ended"
                    );
                }
                self.lifecycle = Lifecycle::Finished;
                Ok(None)
            }
        }
    }

    fn description(&self) -> String {
        "phased frequency-model agent".to_string()
    }
}

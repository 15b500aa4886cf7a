//! Built-in baseline opponents.
//!
//! Both react to the same events as the phased agent but follow a fixed
//! rule, which makes them useful sparring partners and test fixtures.

use std::sync::Arc;

use parley_agent::{Action, AgentError, Event, Party, PartyId, Settings};
use parley_core::{Bid, BidUtility, BidsWithUtility};
use rand::rngs::StdRng;
use rand::RngCore;

/// Session state shared by the baseline opponents.
struct Seat {
    me: PartyId,
    bids: BidsWithUtility,
    standing: Option<Bid>,
}

impl Seat {
    fn start(settings: Settings) -> Result<Self, AgentError> {
        Ok(Self {
            me: settings.party,
            bids: BidsWithUtility::new(Arc::clone(&settings.profile))?,
            standing: None,
        })
    }

    fn observe(&mut self, action: &Action) {
        if action.actor() == &self.me {
            return;
        }
        if let Action::Offer { bid, .. } = action {
            self.standing = Some(bid.clone());
        }
    }

    fn standing_utility(&self) -> Option<f64> {
        self.standing.as_ref().map(|bid| self.bids.utility_of(bid))
    }

    fn accept_or(&self, accept: bool, counter: Bid) -> Action {
        match &self.standing {
            Some(standing) if accept => Action::Accept {
                actor: self.me.clone(),
                bid: standing.clone(),
            },
            _ => Action::Offer {
                actor: self.me.clone(),
                bid: counter,
            },
        }
    }
}

/// Keeps offering its own best bid.
#[derive(Default)]
pub struct StubbornParty {
    seat: Option<Seat>,
}

impl StubbornParty {
    /// Lowest utility this party accepts.
    pub const ACCEPT_AT: f64 = 0.8;

    /// Creates an idle party.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Party for StubbornParty {
    fn notify(&mut self, event: Event) -> Result<Option<Action>, AgentError> {
        match event {
            Event::SessionStart(settings) => {
                self.seat = Some(Seat::start(settings)?);
                Ok(None)
            }
            Event::OpponentActed(action) => {
                self.seat
                    .as_mut()
                    .ok_or(AgentError::UninitializedDomain)?
                    .observe(&action);
                Ok(None)
            }
            Event::YourTurn => {
                let seat = self.seat.as_ref().ok_or(AgentError::UninitializedDomain)?;
                let accept = seat.standing_utility().is_some_and(|u| u >= Self::ACCEPT_AT);
                Ok(Some(seat.accept_or(accept, seat.bids.extreme_bid(true))))
            }
            Event::SessionEnd => {
                self.seat = None;
                Ok(None)
            }
        }
    }

    fn description(&self) -> String {
        format!("stubborn (accepts at {})", Self::ACCEPT_AT)
    }
}

/// Offers uniformly random bids.
pub struct RandomParty<R = StdRng> {
    seat: Option<Seat>,
    rng: R,
}

impl<R: RngCore> RandomParty<R> {
    /// Utility an offer must exceed to be accepted.
    pub const ACCEPT_ABOVE: f64 = 0.6;

    /// Creates an idle party drawing from `rng`.
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { seat: None, rng }
    }
}

impl<R: RngCore> Party for RandomParty<R> {
    fn notify(&mut self, event: Event) -> Result<Option<Action>, AgentError> {
        match event {
            Event::SessionStart(settings) => {
                self.seat = Some(Seat::start(settings)?);
                Ok(None)
            }
            Event::OpponentActed(action) => {
                self.seat
                    .as_mut()
                    .ok_or(AgentError::UninitializedDomain)?
                    .observe(&action);
                Ok(None)
            }
            Event::YourTurn => {
                let seat = self.seat.as_ref().ok_or(AgentError::UninitializedDomain)?;
                let accept = seat.standing_utility().is_some_and(|u| u > Self::ACCEPT_ABOVE);
                let counter = seat.bids.random_bid(&mut self.rng);
                Ok(Some(seat.accept_or(accept, counter)))
            }
            Event::SessionEnd => {
                self.seat = None;
                Ok(None)
            }
        }
    }

    fn description(&self) -> String {
        format!("random (accepts above {})", Self::ACCEPT_ABOVE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::{Domain, LinearAdditive};
    use rand::SeedableRng;

    fn settings() -> Settings {
        let domain = Domain::builder("lunch")
            .issue("food", ["pizza", "sushi"])
            .issue("drink", ["water", "soda"])
            .build()
            .unwrap();
        let profile = LinearAdditive::builder(domain)
            .weight("food", 0.5)
            .weight("drink", 0.5)
            .utility("food", "pizza", 1.0)
            .utility("food", "sushi", 0.0)
            .utility("drink", "water", 0.0)
            .utility("drink", "soda", 1.0)
            .build()
            .unwrap();
        Settings {
            party: "b".into(),
            profile: Arc::new(profile),
            deadline_rounds: 10,
        }
    }

    fn offer(food: &str, drink: &str) -> Event {
        Event::OpponentActed(Action::Offer {
            actor: "a".into(),
            bid: Bid::from_pairs([("food", food), ("drink", drink)]),
        })
    }

    #[test]
    fn stubborn_offers_best_bid() {
        let mut party = StubbornParty::new();
        party.notify(Event::SessionStart(settings())).unwrap();
        party.notify(offer("sushi", "soda")).unwrap();
        let action = party.notify(Event::YourTurn).unwrap().unwrap();
        assert_eq!(
            action.bid(),
            Some(&Bid::from_pairs([("food", "pizza"), ("drink", "soda")]))
        );
        assert!(!action.is_accept());
    }

    #[test]
    fn stubborn_accepts_good_offer() {
        let mut party = StubbornParty::new();
        party.notify(Event::SessionStart(settings())).unwrap();
        party.notify(offer("pizza", "soda")).unwrap();
        assert!(party.notify(Event::YourTurn).unwrap().unwrap().is_accept());
    }

    #[test]
    fn random_rejects_poor_offer() {
        let mut party = RandomParty::new(StdRng::seed_from_u64(3));
        party.notify(Event::SessionStart(settings())).unwrap();
        party.notify(offer("sushi", "water")).unwrap();
        let action = party.notify(Event::YourTurn).unwrap().unwrap();
        assert!(matches!(action, Action::Offer { .. }));
    }

    #[test]
    fn turn_before_start_fails() {
        let mut party = RandomParty::new(StdRng::seed_from_u64(3));
        assert!(matches!(
            party.notify(Event::YourTurn),
            Err(AgentError::UninitializedDomain)
        ));
    }
}

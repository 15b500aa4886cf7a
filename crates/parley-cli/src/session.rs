//! Local alternating-offers session runner.
//!
//! Party A opens. Each turn the active party must answer with an action,
//! which is then broadcast to both parties. An accept or a walk-away ends
//! the session; otherwise it ends without agreement at the deadline.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parley_agent::{Action, Event, Party, PartyId, Settings};
use parley_core::{Bid, LinearAdditive, UtilitySpace};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::CliError;

/// A party seated in a session together with its private profile.
pub struct Participant {
    /// Id the party negotiates under.
    pub id: PartyId,
    /// The party's utility function.
    pub profile: Arc<LinearAdditive>,
    /// The party itself.
    pub party: Box<dyn Party>,
}

impl Participant {
    /// Seats a party.
    pub fn new(id: impl Into<String>, profile: Arc<LinearAdditive>, party: Box<dyn Party>) -> Self {
        Self {
            id: PartyId::new(id),
            profile,
            party,
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// A party accepted the other's offer.
    Agreement {
        /// The agreed bid.
        bid: Bid,
        /// Utility of the agreement for each party, in seat order.
        utilities: [f64; 2],
    },
    /// A party walked away.
    Ended {
        /// The party that walked away.
        by: PartyId,
    },
    /// The deadline passed without agreement.
    Deadline,
}

impl Outcome {
    /// Returns true if the session reached agreement.
    #[must_use]
    pub const fn is_agreement(&self) -> bool {
        matches!(self, Self::Agreement { .. })
    }
}

/// One action in the session trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEntry {
    /// Zero-based round.
    pub round: u32,
    /// The action taken.
    pub action: Action,
    /// Utility of the action's bid for each party, in seat order.
    pub utilities: Option<[f64; 2]>,
}

/// Summary of a finished session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    /// Session id.
    pub id: Uuid,
    /// Domain negotiated over.
    pub domain: String,
    /// Party ids in seat order.
    pub parties: [PartyId; 2],
    /// Party descriptions in seat order.
    pub descriptions: [String; 2],
    /// Round deadline.
    pub deadline: u32,
    /// Rounds started before the session ended.
    pub rounds_used: u32,
    /// How the session ended.
    pub outcome: Outcome,
    /// When the session started.
    pub started_at: DateTime<Utc>,
    /// When the session ended.
    pub finished_at: DateTime<Utc>,
    /// Every action, in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<TraceEntry>,
}

/// Runs one session between two participants.
///
/// Both profiles must be defined over the same domain.
///
/// # Errors
///
/// Returns an error if the domains differ, a party fails on an event, or a
/// party breaks the protocol.
pub fn run_session(mut seats: [Participant; 2], deadline: u32) -> Result<SessionReport, CliError> {
    let domain_a = seats[0].profile.domain();
    let domain_b = seats[1].profile.domain();
    if domain_a != domain_b {
        return Err(CliError::DomainMismatch(
            domain_a.name().to_string(),
            domain_b.name().to_string(),
        ));
    }
    if deadline == 0 {
        return Err(CliError::InvalidArgument(
            "deadline must be at least one round".to_string(),
        ));
    }

    let id = Uuid::new_v4();
    let started_at = Utc::now();
    let domain = domain_a.name().to_string();
    info!(%id, %domain, deadline, "starting session");

    for seat in &mut seats {
        seat.party.notify(Event::SessionStart(Settings {
            party: seat.id.clone(),
            profile: Arc::clone(&seat.profile),
            deadline_rounds: deadline,
        }))?;
    }

    let mut trace = Vec::new();
    let mut standing: Option<Bid> = None;
    let mut outcome = Outcome::Deadline;
    let mut rounds_used = 0;

    'rounds: for round in 0..deadline {
        rounds_used = round + 1;
        for turn in 0..2 {
            let action = take_turn(&mut seats[turn], standing.as_ref())?;
            let utilities = action.bid().map(|bid| utilities_of(&seats, bid));
            debug!(round, %action, "action");
            trace.push(TraceEntry {
                round,
                action: action.clone(),
                utilities,
            });
            for seat in &mut seats {
                seat.party.notify(Event::OpponentActed(action.clone()))?;
            }

            match action {
                Action::Offer { bid, .. } => standing = Some(bid),
                Action::Accept { bid, .. } => {
                    let utilities = utilities_of(&seats, &bid);
                    outcome = Outcome::Agreement { bid, utilities };
                    break 'rounds;
                }
                Action::EndNegotiation { actor } => {
                    outcome = Outcome::Ended { by: actor };
                    break 'rounds;
                }
            }
        }
    }

    for seat in &mut seats {
        seat.party.notify(Event::SessionEnd)?;
    }
    info!(%id, rounds_used, agreement = outcome.is_agreement(), "session finished");

    let [a, b] = seats;
    Ok(SessionReport {
        id,
        domain,
        descriptions: [a.party.description(), b.party.description()],
        parties: [a.id, b.id],
        deadline,
        rounds_used,
        outcome,
        started_at,
        finished_at: Utc::now(),
        trace,
    })
}

fn take_turn(seat: &mut Participant, standing: Option<&Bid>) -> Result<Action, CliError> {
    let violation = |reason: &str| CliError::Protocol {
        party: seat.id.to_string(),
        reason: reason.to_string(),
    };
    let Some(action) = seat.party.notify(Event::YourTurn)? else {
        return Err(violation("no action on its turn"));
    };
    if action.actor() != &seat.id {
        return Err(violation("acted under another party's id"));
    }
    match &action {
        Action::Accept { bid, .. } if standing != Some(bid) => {
            Err(violation("accepted a bid that is not the standing offer"))
        }
        Action::Offer { bid, .. } | Action::Accept { bid, .. } => {
            seat.profile.domain().validate_bid(bid)?;
            Ok(action)
        }
        Action::EndNegotiation { .. } => Ok(action),
    }
}

fn utilities_of(seats: &[Participant; 2], bid: &Bid) -> [f64; 2] {
    [seats[0].profile.utility(bid), seats[1].profile.utility(bid)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opponents::StubbornParty;
    use parley_agent::{AgentConfig, AgentError, NegotiationAgent};
    use parley_core::Domain;

    fn domain() -> Domain {
        Domain::builder("lunch")
            .issue("food", ["pizza", "sushi", "salad"])
            .issue("drink", ["water", "soda", "juice"])
            .build()
            .unwrap()
    }

    fn profile(pizza: f64, soda: f64) -> Arc<LinearAdditive> {
        Arc::new(
            LinearAdditive::builder(domain())
                .weight("food", 0.5)
                .weight("drink", 0.5)
                .utility("food", "pizza", pizza)
                .utility("food", "sushi", 0.5)
                .utility("food", "salad", 1.0 - pizza)
                .utility("drink", "water", 1.0 - soda)
                .utility("drink", "soda", soda)
                .utility("drink", "juice", 0.5)
                .build()
                .unwrap(),
        )
    }

    struct Silent;

    impl Party for Silent {
        fn notify(&mut self, _event: Event) -> Result<Option<Action>, AgentError> {
            Ok(None)
        }

        fn description(&self) -> String {
            "silent".to_string()
        }
    }

    #[test]
    fn identical_preferences_agree_immediately() {
        let seats = [
            Participant::new("a", profile(1.0, 1.0), Box::new(StubbornParty::new())),
            Participant::new("b", profile(1.0, 1.0), Box::new(StubbornParty::new())),
        ];
        let report = run_session(seats, 10).unwrap();
        assert_eq!(report.rounds_used, 1);
        assert!(report.outcome.is_agreement());
        assert_eq!(report.trace.len(), 2);
    }

    #[test]
    fn opposed_stubborn_parties_hit_deadline() {
        let seats = [
            Participant::new("a", profile(1.0, 1.0), Box::new(StubbornParty::new())),
            Participant::new("b", profile(0.0, 0.0), Box::new(StubbornParty::new())),
        ];
        let report = run_session(seats, 5).unwrap();
        assert_eq!(report.outcome, Outcome::Deadline);
        assert_eq!(report.rounds_used, 5);
        assert_eq!(report.trace.len(), 10);
    }

    #[test]
    fn agent_settles_against_stubborn_opponent() {
        let agent = NegotiationAgent::with_seed(AgentConfig::default(), 11);
        let seats = [
            Participant::new("agent", profile(1.0, 1.0), Box::new(agent)),
            Participant::new("stubborn", profile(0.0, 0.0), Box::new(StubbornParty::new())),
        ];
        let report = run_session(seats, 200).unwrap();
        // the stubborn party never moves, so only the agent can close
        if let Outcome::Agreement { bid, .. } = &report.outcome {
            assert_eq!(bid, &Bid::from_pairs([("food", "salad"), ("drink", "water")]));
        }
        assert!(report.rounds_used <= 200);
    }

    #[test]
    fn missing_action_is_a_protocol_violation() {
        let seats = [
            Participant::new("a", profile(1.0, 1.0), Box::new(Silent)),
            Participant::new("b", profile(1.0, 1.0), Box::new(StubbornParty::new())),
        ];
        assert!(matches!(
            run_session(seats, 5),
            Err(CliError::Protocol { .. })
        ));
    }

    #[test]
    fn mismatched_domains_are_rejected() {
        let other = Domain::builder("other")
            .issue("food", ["pizza"])
            .build()
            .unwrap();
        let other = Arc::new(
            LinearAdditive::builder(other)
                .weight("food", 1.0)
                .utility("food", "pizza", 1.0)
                .build()
                .unwrap(),
        );
        let seats = [
            Participant::new("a", profile(1.0, 1.0), Box::new(StubbornParty::new())),
            Participant::new("b", other, Box::new(StubbornParty::new())),
        ];
        assert!(matches!(
            run_session(seats, 5),
            Err(CliError::DomainMismatch(_, _))
        ));
    }
}

//! Session events and actions exchanged between a runner and its parties.
//!
//! A runner drives each [`Party`] with [`Event`]s. On [`Event::YourTurn`]
//! the party must answer with exactly one [`Action`]; every other event
//! yields no action.

use std::fmt;
use std::sync::Arc;

use parley_core::{Bid, LinearAdditive};
use serde::{Deserialize, Serialize};

use crate::AgentError;

/// Name of a negotiating party within a session.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartyId(String);

impl PartyId {
    /// Creates a party id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PartyId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A move made by a party on its turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Propose a bid.
    Offer {
        /// Party making the offer.
        actor: PartyId,
        /// The proposed bid.
        bid: Bid,
    },
    /// Accept the other party's standing offer.
    Accept {
        /// Party accepting.
        actor: PartyId,
        /// The bid being accepted.
        bid: Bid,
    },
    /// Walk away without agreement.
    EndNegotiation {
        /// Party walking away.
        actor: PartyId,
    },
}

impl Action {
    /// The party that took the action.
    #[must_use]
    pub fn actor(&self) -> &PartyId {
        match self {
            Self::Offer { actor, .. } | Self::Accept { actor, .. } | Self::EndNegotiation { actor } => {
                actor
            }
        }
    }

    /// The bid carried by the action, if any.
    #[must_use]
    pub fn bid(&self) -> Option<&Bid> {
        match self {
            Self::Offer { bid, .. } | Self::Accept { bid, .. } => Some(bid),
            Self::EndNegotiation { .. } => None,
        }
    }

    /// Returns true for an accept.
    #[must_use]
    pub const fn is_accept(&self) -> bool {
        matches!(self, Self::Accept { .. })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offer { actor, bid } => write!(f, "{actor} offers {bid}"),
            Self::Accept { actor, bid } => write!(f, "{actor} accepts {bid}"),
            Self::EndNegotiation { actor } => write!(f, "{actor} ends the negotiation"),
        }
    }
}

/// What a party learns when a session starts.
#[derive(Debug, Clone)]
pub struct Settings {
    /// The receiving party's own id.
    pub party: PartyId,
    /// The receiving party's private utility function.
    pub profile: Arc<LinearAdditive>,
    /// Number of rounds before the session ends without agreement.
    pub deadline_rounds: u32,
}

/// Notification delivered to a party.
#[derive(Debug, Clone)]
pub enum Event {
    /// A session begins.
    SessionStart(Settings),
    /// A party acted. Parties also receive their own actions.
    OpponentActed(Action),
    /// The receiving party must act.
    YourTurn,
    /// The session is over.
    SessionEnd,
}

/// A negotiating party driven by events.
pub trait Party {
    /// Handles an event. Returns `Some` action exactly for [`Event::YourTurn`].
    ///
    /// # Errors
    ///
    /// Returns an error if the event arrives in a state that cannot accept it.
    fn notify(&mut self, event: Event) -> Result<Option<Action>, AgentError>;

    /// Short human-readable description.
    fn description(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bid() -> Bid {
        Bid::from_pairs([("food", "pizza"), ("drink", "soda")])
    }

    #[test]
    fn action_accessors() {
        let offer = Action::Offer {
            actor: "a".into(),
            bid: bid(),
        };
        assert_eq!(offer.actor().as_str(), "a");
        assert_eq!(offer.bid(), Some(&bid()));
        assert!(!offer.is_accept());

        let end = Action::EndNegotiation { actor: "b".into() };
        assert_eq!(end.bid(), None);
    }

    #[test]
    fn action_serializes_with_type_tag() {
        let accept = Action::Accept {
            actor: "a".into(),
            bid: bid(),
        };
        let json = serde_json::to_value(&accept).unwrap();
        assert_eq!(json["type"], "accept");
        assert_eq!(json["actor"], "a");
        assert_eq!(json["bid"]["food"], "pizza");

        let back: Action = serde_json::from_value(json).unwrap();
        assert_eq!(back, accept);
    }

    #[test]
    fn action_display() {
        let end = Action::EndNegotiation { actor: "b".into() };
        assert_eq!(end.to_string(), "b ends the negotiation");
    }
}

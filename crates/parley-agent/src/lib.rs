//! # parley-agent
//!
//! A bilateral negotiating agent for alternating-offer sessions.
//!
//! This crate provides:
//!
//! - **Opponent modelling** — [`FrequencyModel`] learns value frequencies and adaptive issue weights
//! - **Bidding** — [`BiddingStrategy`] concedes through three round-indexed phases
//! - **Acceptance** — [`AcceptancePolicy`] with time-bracketed utility floors
//! - **Driver** — [`NegotiationAgent`] reacts to session [`Event`]s with [`Action`]s
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use parley_agent::{Action, AgentConfig, Event, NegotiationAgent, Party, Settings};
//! use parley_core::{Bid, Domain, LinearAdditive};
//!
//! let domain = Domain::builder("lunch")
//!     .issue("food", ["pizza", "sushi"])
//!     .issue("drink", ["water", "soda"])
//!     .build()
//!     .unwrap();
//! let profile = LinearAdditive::builder(domain)
//!     .weight("food", 0.6)
//!     .weight("drink", 0.4)
//!     .utility("food", "pizza", 1.0)
//!     .utility("food", "sushi", 0.5)
//!     .utility("drink", "water", 0.2)
//!     .utility("drink", "soda", 1.0)
//!     .build()
//!     .unwrap();
//!
//! let mut agent = NegotiationAgent::with_seed(AgentConfig::default(), 7);
//! agent
//!     .notify(Event::SessionStart(Settings {
//!         party: "me".into(),
//!         profile: Arc::new(profile),
//!         deadline_rounds: 200,
//!     }))
//!     .unwrap();
//!
//! // The opening move is always our best bid.
//! let opening = agent.notify(Event::YourTurn).unwrap().unwrap();
//! assert_eq!(
//!     opening.bid(),
//!     Some(&Bid::from_pairs([("food", "pizza"), ("drink", "soda")]))
//! );
//! assert!(matches!(opening, Action::Offer { .. }));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod acceptance;
pub mod agent;
pub mod config;
pub mod error;
pub mod expected;
pub mod opponent;
pub mod protocol;
pub mod strategy;

pub use error::AgentError;

// Re-exports for convenience
pub use acceptance::{AcceptanceBracket, AcceptancePolicy};
pub use agent::{Lifecycle, NegotiationAgent};
pub use config::{AgentConfig, MAX_DEADLINE_ROUNDS, REFERENCE_DEADLINE};
pub use expected::ExpectedUtilityTable;
pub use opponent::FrequencyModel;
pub use protocol::{Action, Event, Party, PartyId, Settings};
pub use strategy::{BidContext, BiddingStrategy, MoveKind, Phase, PhaseSchedule};

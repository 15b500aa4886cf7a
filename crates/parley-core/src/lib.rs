//! # parley-core
//!
//! Negotiation primitives shared by every Parley party.
//!
//! This crate provides:
//!
//! - [`Domain`] and [`Value`] — the issues under negotiation and their discrete settings
//! - [`Bid`] — a complete issue-to-value assignment
//! - [`LinearAdditive`] — an additive, normalized utility space over bids
//! - [`BidUtility`] — interval and extreme-bid queries over the bid space
//! - [`Progress`] — round-based deadline tracking
//! - [`Profile`] — the JSON profile format loaded at session start
//!
//! ## Example
//!
//! ```rust
//! use parley_core::{Bid, BidUtility, BidsWithUtility, Domain, Interval, LinearAdditive};
//! use std::sync::Arc;
//!
//! let domain = Domain::builder("lunch")
//!     .issue("food", ["pizza", "sushi"])
//!     .issue("drink", ["water", "soda"])
//!     .build()
//!     .unwrap();
//!
//! let space = LinearAdditive::builder(domain)
//!     .weight("food", 0.6)
//!     .weight("drink", 0.4)
//!     .utility("food", "pizza", 1.0)
//!     .utility("food", "sushi", 0.5)
//!     .utility("drink", "water", 0.2)
//!     .utility("drink", "soda", 1.0)
//!     .build()
//!     .unwrap();
//!
//! let bids = BidsWithUtility::new(Arc::new(space)).unwrap();
//! let best = bids.extreme_bid(true);
//! assert_eq!(best, Bid::from_pairs([("food", "pizza"), ("drink", "soda")]));
//! assert_eq!(bids.bids_with_utility_in(Interval::new(0.9, 1.0)).len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bid;
pub mod bidspace;
pub mod domain;
pub mod error;
pub mod profile;
pub mod progress;
pub mod utility;

pub use bid::Bid;
pub use bidspace::{BidUtility, BidsWithUtility, Interval, MAX_ENUMERATED_BIDS};
pub use domain::{Domain, DomainBuilder, Value};
pub use error::CoreError;
pub use profile::{DomainSpec, Profile, ValueSetSpec};
pub use progress::Progress;
pub use utility::{LinearAdditive, LinearAdditiveBuilder, UtilitySpace};

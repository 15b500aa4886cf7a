//! # parley-cli
//!
//! Parley command-line interface.
//!
//! Provides commands for:
//! - Running a local alternating-offers session between the agent and a
//!   built-in opponent
//! - Printing the agent's expected-utility targets
//!
//! # Architecture
//!
//! The session runner seats two [`parley_agent::Party`] implementations,
//! delivers events to them turn by turn and collects a [`SessionReport`].
//!
//! ```text
//! ┌─────────┐   Event / Action   ┌──────────┐   Event / Action   ┌──────────┐
//! │  agent  │◄──────────────────►│  runner  │◄──────────────────►│ opponent │
//! └─────────┘                    └──────────┘                    └──────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod opponents;
pub mod output;
pub mod session;

pub use cli::{Cli, Commands, Format, OpponentKind, RunArgs, TableArgs};
pub use error::CliError;
pub use output::OutputFormat;
pub use session::{Outcome, Participant, SessionReport, TraceEntry, run_session};

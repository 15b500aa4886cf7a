//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Parley - automated bilateral negotiation.
#[derive(Parser, Debug, Clone)]
#[command(name = "parley")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(short, long, value_enum, env = "PARLEY_FORMAT", default_value_t = Format::Table, global = true)]
    pub format: Format,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[derive(Default)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run a negotiation session between the agent and an opponent.
    Run(RunArgs),

    /// Print the expected-utility targets for a reservation value.
    Table(TableArgs),
}

/// Arguments for the run command.
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Profile of the agent (party A, opens the session).
    #[arg(long, env = "PARLEY_PROFILE_A", value_name = "FILE")]
    pub profile_a: PathBuf,

    /// Profile of the opponent (party B).
    #[arg(long, env = "PARLEY_PROFILE_B", value_name = "FILE")]
    pub profile_b: PathBuf,

    /// Opponent behaviour.
    #[arg(short, long, value_enum, env = "PARLEY_OPPONENT", default_value_t = OpponentKind::Agent)]
    pub opponent: OpponentKind,

    /// Round deadline. Defaults to the configured deadline.
    #[arg(short, long, env = "PARLEY_ROUNDS")]
    pub rounds: Option<u32>,

    /// Seed for every random source in the session.
    #[arg(short, long, env = "PARLEY_SEED")]
    pub seed: Option<u64>,

    /// Agent configuration file (JSON).
    #[arg(short, long, env = "PARLEY_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Include every action in the output.
    #[arg(long)]
    pub trace: bool,
}

/// Built-in opponents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[derive(Default)]
pub enum OpponentKind {
    /// Another instance of the phased agent.
    #[default]
    Agent,
    /// Re-offers its best bid, accepts offers worth 0.8 or more.
    Stubborn,
    /// Offers random bids, accepts offers worth more than 0.6.
    Random,
}

/// Arguments for the table command.
#[derive(Parser, Debug, Clone)]
pub struct TableArgs {
    /// Reservation utility the table starts from.
    #[arg(long, default_value_t = 0.0)]
    pub reservation: f64,

    /// Number of rounds the table covers.
    #[arg(short, long, default_value_t = 200)]
    pub rounds: u32,

    /// Print every n-th entry only.
    #[arg(long, default_value_t = 10)]
    pub step: u32,
}

//! Session run command.
//!
//! Loads both profiles and the optional agent configuration, seats the
//! agent against the chosen opponent and prints the session report.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use parley_agent::{AgentConfig, NegotiationAgent, Party};
use parley_core::{LinearAdditive, Profile};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::cli::{OpponentKind, RunArgs};
use crate::opponents::{RandomParty, StubbornParty};
use crate::output::OutputFormat;
use crate::session::{Participant, SessionReport, run_session};

/// Run command executor.
pub struct RunCommand<'a> {
    args: &'a RunArgs,
}

impl<'a> RunCommand<'a> {
    /// Create a new run command.
    #[must_use]
    pub const fn new(args: &'a RunArgs) -> Self {
        Self { args }
    }

    /// Execute the run command.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be loaded, the session fails, or
    /// output fails.
    pub fn execute<W: Write>(&self, writer: &mut W, format: &OutputFormat) -> anyhow::Result<()> {
        let mut report = self.report()?;
        if !self.args.trace {
            report.trace.clear();
        }
        format.write(writer, &report)?;
        Ok(())
    }

    /// Runs the session and returns the full report, trace included.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be loaded or the session fails.
    pub fn report(&self) -> anyhow::Result<SessionReport> {
        let config = match &self.args.config {
            Some(path) => AgentConfig::load(path)
                .with_context(|| format!("loading agent config {}", path.display()))?,
            None => AgentConfig::default(),
        };
        let deadline = self.args.rounds.unwrap_or(config.deadline_rounds);
        let profile_a = load_profile(&self.args.profile_a)?;
        let profile_b = load_profile(&self.args.profile_b)?;

        let agent = match self.args.seed {
            Some(seed) => NegotiationAgent::with_seed(config.clone(), seed),
            None => NegotiationAgent::new(config.clone()),
        };
        let opponent = self.opponent(config);
        info!(
            opponent = %opponent.description(),
            deadline,
            seed = ?self.args.seed,
            "running session"
        );

        let seats = [
            Participant::new("agent", profile_a, Box::new(agent)),
            Participant::new(self.opponent_name(), profile_b, opponent),
        ];
        Ok(run_session(seats, deadline)?)
    }

    fn opponent(&self, config: AgentConfig) -> Box<dyn Party> {
        let rng = self
            .args
            .seed
            .map_or_else(StdRng::from_entropy, |seed| {
                StdRng::seed_from_u64(seed.wrapping_add(1))
            });
        match self.args.opponent {
            OpponentKind::Agent => Box::new(NegotiationAgent::with_rng(config, rng)),
            OpponentKind::Stubborn => Box::new(StubbornParty::new()),
            OpponentKind::Random => Box::new(RandomParty::new(rng)),
        }
    }

    const fn opponent_name(&self) -> &'static str {
        match self.args.opponent {
            OpponentKind::Agent => "opponent",
            OpponentKind::Stubborn => "stubborn",
            OpponentKind::Random => "random",
        }
    }
}

fn load_profile(path: &Path) -> anyhow::Result<Arc<LinearAdditive>> {
    let space = Profile::load(path)
        .and_then(Profile::into_utility_space)
        .with_context(|| format!("loading profile {}", path.display()))?;
    Ok(Arc::new(space))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::cli::Format;

    fn demo(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../demos/profiles")
            .join(name)
    }

    fn args(opponent: OpponentKind) -> RunArgs {
        RunArgs {
            profile_a: demo("holiday_traveller.json"),
            profile_b: demo("holiday_partner.json"),
            opponent,
            rounds: Some(60),
            seed: Some(5),
            config: None,
            trace: false,
        }
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let args = args(OpponentKind::Agent);
        let first = RunCommand::new(&args).report().unwrap();
        let second = RunCommand::new(&args).report().unwrap();
        assert_eq!(first.outcome, second.outcome);
        assert_eq!(first.rounds_used, second.rounds_used);
        assert_eq!(first.trace, second.trace);
    }

    #[test]
    fn trace_is_omitted_unless_requested() {
        let args = args(OpponentKind::Stubborn);
        let mut out = Vec::new();
        RunCommand::new(&args)
            .execute(&mut out, &OutputFormat::new(Format::Json))
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert!(value.get("trace").is_none());
        assert_eq!(value["deadline"], 60);
    }

    #[test]
    fn missing_profile_reports_path() {
        let mut args = args(OpponentKind::Random);
        args.profile_b = demo("does_not_exist.json");
        let err = RunCommand::new(&args).report().unwrap_err();
        assert!(format!("{err:#}").contains("does_not_exist.json"));
    }
}

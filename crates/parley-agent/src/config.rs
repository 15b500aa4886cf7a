//! Agent configuration.
//!
//! Defaults reproduce the reference tuning for a 200-round session. Every
//! field may be omitted from a JSON config file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::AgentError;
use crate::acceptance::AcceptancePolicy;
use crate::strategy::PhaseSchedule;

/// Deadline the default phase boundaries are tuned for.
pub const REFERENCE_DEADLINE: u32 = 200;

/// Longest deadline a session may run to.
pub const MAX_DEADLINE_ROUNDS: u32 = 100_000;

/// Tunable parameters of a [`NegotiationAgent`](crate::NegotiationAgent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentConfig {
    /// Round deadline the phase boundaries below refer to.
    pub deadline_rounds: u32,
    /// First round of the mixed-concession phase.
    pub phase_two_start: u32,
    /// First round of the settle phase.
    pub phase_three_start: u32,
    /// Starting value of the concession level used in phase two.
    pub initial_alpha: f64,
    /// Keep learning the opponent model after phase one.
    pub learn_throughout: bool,
    /// Samples drawn by the random fallback searches.
    pub random_attempts: u32,
    /// Acceptance thresholds.
    pub acceptance: AcceptancePolicy,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            deadline_rounds: REFERENCE_DEADLINE,
            phase_two_start: 30,
            phase_three_start: 196,
            initial_alpha: 0.9,
            learn_throughout: false,
            random_attempts: 50,
            acceptance: AcceptancePolicy::default(),
        }
    }
}

impl AgentConfig {
    /// Default configuration rescaled to a `rounds`-round deadline.
    #[must_use]
    pub fn for_deadline(rounds: u32) -> Self {
        Self::default().with_deadline(rounds)
    }

    /// Returns this configuration with phase boundaries rescaled
    /// proportionally to a `rounds`-round deadline.
    #[must_use]
    pub fn with_deadline(&self, rounds: u32) -> Self {
        if rounds == self.deadline_rounds || self.deadline_rounds == 0 {
            return Self {
                deadline_rounds: rounds,
                ..self.clone()
            };
        }
        let scale = |round: u32| {
            let scaled = f64::from(round) * f64::from(rounds) / f64::from(self.deadline_rounds);
            (scaled.round() as u32).min(rounds)
        };
        let phase_two_start = scale(self.phase_two_start);
        let phase_three_start = scale(self.phase_three_start).max(phase_two_start);
        debug!(
            rounds,
            phase_two_start, phase_three_start, "rescaled phase boundaries"
        );
        Self {
            deadline_rounds: rounds,
            phase_two_start,
            phase_three_start,
            ..self.clone()
        }
    }

    /// The phase boundaries as a schedule.
    #[must_use]
    pub fn schedule(&self) -> PhaseSchedule {
        PhaseSchedule::new(
            self.phase_two_start,
            self.phase_three_start,
            self.deadline_rounds,
        )
    }

    /// Checks the configuration is usable.
    pub fn validate(&self) -> Result<(), AgentError> {
        if self.deadline_rounds == 0 {
            return Err(AgentError::InvalidConfig(
                "deadline must be at least one round".to_string(),
            ));
        }
        if self.deadline_rounds > MAX_DEADLINE_ROUNDS {
            return Err(AgentError::InvalidConfig(format!(
                "deadline of {} rounds exceeds the {MAX_DEADLINE_ROUNDS}-round limit",
                self.deadline_rounds
            )));
        }
        if self.phase_two_start > self.phase_three_start
            || self.phase_three_start > self.deadline_rounds
        {
            return Err(AgentError::InvalidConfig(format!(
                "phase boundaries {} / {} do not fit a {}-round deadline",
                self.phase_two_start, self.phase_three_start, self.deadline_rounds
            )));
        }
        if !(0.0..=1.0).contains(&self.initial_alpha) {
            return Err(AgentError::InvalidConfig(format!(
                "initial alpha {} is outside [0, 1]",
                self.initial_alpha
            )));
        }
        self.acceptance.validate()
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, AgentError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| AgentError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AgentError> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| AgentError::Core(e.into()))?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(AgentConfig::default().validate().is_ok());
    }

    #[test]
    fn rescaling_keeps_proportions() {
        let config = AgentConfig::for_deadline(100);
        assert_eq!(config.deadline_rounds, 100);
        assert_eq!(config.phase_two_start, 15);
        assert_eq!(config.phase_three_start, 98);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rescaling_to_same_deadline_is_identity() {
        assert_eq!(AgentConfig::for_deadline(200), AgentConfig::default());
    }

    #[test]
    fn inverted_phases_are_invalid() {
        let config = AgentConfig {
            phase_two_start: 150,
            phase_three_start: 100,
            ..AgentConfig::default()
        };
        assert!(matches!(config.validate(), Err(AgentError::InvalidConfig(_))));
    }

    #[test]
    fn zero_deadline_is_invalid() {
        let config = AgentConfig {
            deadline_rounds: 0,
            phase_two_start: 0,
            phase_three_start: 0,
            ..AgentConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn deadline_above_limit_is_invalid() {
        let config = AgentConfig::for_deadline(MAX_DEADLINE_ROUNDS + 1);
        assert!(matches!(config.validate(), Err(AgentError::InvalidConfig(_))));
        assert!(AgentConfig::for_deadline(MAX_DEADLINE_ROUNDS).validate().is_ok());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config = AgentConfig::from_json(r#"{ "initialAlpha": 0.8, "learnThroughout": true }"#).unwrap();
        assert_eq!(config.initial_alpha, 0.8);
        assert!(config.learn_throughout);
        assert_eq!(config.phase_three_start, 196);
    }

    #[test]
    fn malformed_json_is_invalid_config() {
        assert!(matches!(
            AgentConfig::from_json("[1, 2"),
            Err(AgentError::InvalidConfig(_))
        ));
    }
}

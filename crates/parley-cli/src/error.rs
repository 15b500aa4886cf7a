//! CLI error types.

use parley_agent::AgentError;
use parley_core::CoreError;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// The two profiles describe different domains.
    #[error("profiles describe different domains: {0} and {1}")]
    DomainMismatch(String, String),

    /// A party broke the alternating-offers protocol.
    #[error("protocol violation by {party}: {reason}")]
    Protocol {
        /// Offending party.
        party: String,
        /// What went wrong.
        reason: String,
    },

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),

    /// Agent error.
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// Domain or profile error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_error_display_protocol() {
        let err = CliError::Protocol {
            party: "b".into(),
            reason: "no action on turn".into(),
        };
        assert_eq!(err.to_string(), "protocol violation by b: no action on turn");
    }

    #[test]
    fn cli_error_display_domain_mismatch() {
        let err = CliError::DomainMismatch("lunch".into(), "holiday".into());
        assert_eq!(
            err.to_string(),
            "profiles describe different domains: lunch and holiday"
        );
    }

    #[test]
    fn cli_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err = CliError::from(io_err);
        assert!(matches!(cli_err, CliError::Io(_)));
    }

    #[test]
    fn agent_error_is_transparent() {
        let err = CliError::from(AgentError::UninitializedDomain);
        assert_eq!(err.to_string(), "domain is not initialized");
    }
}

//! Error types for parley-agent.

use parley_core::CoreError;
use thiserror::Error;

/// Errors that can occur in agent operations.
#[derive(Debug, Error)]
pub enum AgentError {
    /// A model or turn operation was invoked before the domain was bound.
    #[error("domain is not initialized")]
    UninitializedDomain,

    /// A session start arrived while a session is already running.
    #[error("a negotiation session is already running")]
    SessionAlreadyStarted,

    /// A turn was requested after the session ended.
    #[error("negotiation session has finished")]
    SessionFinished,

    /// Agent configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Domain or profile error.
    #[error(transparent)]
    Core(#[from] CoreError),
}

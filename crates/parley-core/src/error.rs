//! Error types for parley-core.

use thiserror::Error;

/// Errors that can occur while building or querying negotiation primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The domain definition is malformed (no issues, empty value sets, duplicates).
    #[error("invalid domain: {0}")]
    InvalidDomain(String),

    /// The utility profile is malformed or inconsistent with its domain.
    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    /// A bid does not assign a value to every issue of the domain.
    #[error("bid is missing a value for issue '{issue}'")]
    IncompleteBid {
        /// The issue without a value.
        issue: String,
    },

    /// A bid assigns a value the domain does not define.
    #[error("value '{value}' is not defined for issue '{issue}'")]
    UnknownValue {
        /// The issue carrying the value.
        issue: String,
        /// The offending value.
        value: String,
    },

    /// A bid mentions an issue the domain does not define.
    #[error("issue '{0}' is not part of the domain")]
    UnknownIssue(String),

    /// The bid space is too large to enumerate.
    #[error("bid space of {size} bids exceeds the enumeration limit of {limit}")]
    BidSpaceTooLarge {
        /// Number of bids in the space (saturated at `u64::MAX`).
        size: u64,
        /// The configured limit.
        limit: u64,
    },

    /// Reading a profile from disk failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing a profile failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

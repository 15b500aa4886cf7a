//! JSON utility profiles.
//!
//! A profile bundles a domain definition with one party's additive
//! preferences over it:
//!
//! ```json
//! {
//!   "name": "buyer",
//!   "domain": { "name": "lunch", "issuesValues": { "food": { "values": ["pizza", "sushi"] } } },
//!   "issueWeights": { "food": 1.0 },
//!   "issueUtilities": { "food": { "pizza": 1.0, "sushi": 0.4 } },
//!   "reservationBid": { "food": "sushi" }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Bid, CoreError, Domain, LinearAdditive, Value};

/// The values of one issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSetSpec {
    /// Possible values, in declaration order.
    pub values: Vec<Value>,
}

/// Serialized form of a [`Domain`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainSpec {
    /// Domain name.
    pub name: String,
    /// Issues and their values.
    pub issues_values: BTreeMap<String, ValueSetSpec>,
}

/// Serialized form of a [`LinearAdditive`] utility space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Profile name.
    pub name: String,
    /// The domain the profile is defined over.
    pub domain: DomainSpec,
    /// Weight per issue; must sum to one.
    pub issue_weights: BTreeMap<String, f64>,
    /// Utility per issue value.
    pub issue_utilities: BTreeMap<String, BTreeMap<Value, f64>>,
    /// Outcome of walking away, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation_bid: Option<Bid>,
}

impl Profile {
    /// Parses a profile from JSON text.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a profile file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let profile = Self::from_json(&text)?;
        debug!(path = %path.display(), name = %profile.name, "loaded profile");
        Ok(profile)
    }

    /// Validates the profile and converts it into a utility space.
    pub fn into_utility_space(self) -> Result<LinearAdditive, CoreError> {
        LinearAdditive::try_from(self)
    }
}

impl TryFrom<Profile> for LinearAdditive {
    type Error = CoreError;

    fn try_from(profile: Profile) -> Result<Self, Self::Error> {
        let issues = profile
            .domain
            .issues_values
            .into_iter()
            .map(|(issue, set)| (issue, set.values))
            .collect();
        let domain = Domain::new(profile.domain.name, issues)?;
        Self::new(
            profile.name,
            domain,
            profile.issue_weights,
            profile.issue_utilities,
            profile.reservation_bid,
        )
    }
}

//! Acceptance policy.
//!
//! Decides whether the opponent's standing offer is good enough to accept
//! instead of sending the counter-offer the bidding strategy produced.

use parley_core::{Bid, BidUtility};
use serde::{Deserialize, Serialize};

use crate::AgentError;

/// Utility floor that applies until a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcceptanceBracket {
    /// The bracket applies while the elapsed time fraction is below this.
    pub before: f64,
    /// Minimum utility (exclusive) for an offer to be acceptable.
    pub floor: f64,
}

/// Time-dependent acceptance thresholds.
///
/// An offer scoring above `instant_accept` is always accepted. Otherwise
/// the offer must clear the floor of the current time bracket and be at
/// least as good as our own next counter-offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AcceptancePolicy {
    /// Utility above which any offer is accepted.
    pub instant_accept: f64,
    /// Floors by elapsed time, ordered by `before`.
    pub brackets: Vec<AcceptanceBracket>,
    /// Floor once every bracket has passed.
    pub final_floor: f64,
}

impl Default for AcceptancePolicy {
    fn default() -> Self {
        Self {
            instant_accept: 0.9,
            brackets: vec![
                AcceptanceBracket {
                    before: 0.5,
                    floor: 0.85,
                },
                AcceptanceBracket {
                    before: 0.7,
                    floor: 0.75,
                },
                AcceptanceBracket {
                    before: 0.9,
                    floor: 0.6,
                },
            ],
            final_floor: 0.5,
        }
    }
}

impl AcceptancePolicy {
    /// Utility floor at elapsed time fraction `time`.
    #[must_use]
    pub fn floor_at(&self, time: f64) -> f64 {
        self.brackets
            .iter()
            .find(|bracket| time < bracket.before)
            .map_or(self.final_floor, |bracket| bracket.floor)
    }

    /// Returns true if an offer of this utility is accepted regardless of time.
    #[must_use]
    pub fn accepts_outright(&self, standing_utility: f64) -> bool {
        standing_utility > self.instant_accept
    }

    /// Decides on utilities alone.
    ///
    /// `standing` is the utility of the opponent's current offer, `None` if
    /// nothing has been offered yet; `counter` is the utility of the bid we
    /// would send instead.
    #[must_use]
    pub fn accepts(&self, standing: Option<f64>, counter: f64, time: f64) -> bool {
        let Some(standing) = standing else {
            return false;
        };
        self.accepts_outright(standing) || (standing > self.floor_at(time) && standing >= counter)
    }

    /// Decides on bids, scoring them with `bids`.
    #[must_use]
    pub fn accept(
        &self,
        bids: &dyn BidUtility,
        standing: Option<&Bid>,
        counter: &Bid,
        time: f64,
    ) -> bool {
        self.accepts(
            standing.map(|bid| bids.utility_of(bid)),
            bids.utility_of(counter),
            time,
        )
    }

    /// Checks thresholds lie in `[0, 1]` and brackets are ordered.
    pub fn validate(&self) -> Result<(), AgentError> {
        let unit = 0.0..=1.0;
        if !unit.contains(&self.instant_accept) || !unit.contains(&self.final_floor) {
            return Err(AgentError::InvalidConfig(
                "acceptance thresholds must lie in [0, 1]".to_string(),
            ));
        }
        for bracket in &self.brackets {
            if !unit.contains(&bracket.before) || !unit.contains(&bracket.floor) {
                return Err(AgentError::InvalidConfig(format!(
                    "acceptance bracket {bracket:?} is outside [0, 1]"
                )));
            }
        }
        if self.brackets.windows(2).any(|pair| pair[0].before >= pair[1].before) {
            return Err(AgentError::InvalidConfig(
                "acceptance brackets must be strictly ordered by time".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case(0.0, 0.85 ; "start of session")]
    #[test_case(0.49, 0.85 ; "just before half time")]
    #[test_case(0.5, 0.75 ; "half time")]
    #[test_case(0.7, 0.6 ; "seventy percent")]
    #[test_case(0.89, 0.6 ; "just before ninety percent")]
    #[test_case(0.9, 0.5 ; "ninety percent")]
    #[test_case(1.0, 0.5 ; "deadline")]
    fn floor_by_time_bracket(time: f64, expected: f64) {
        assert_eq!(AcceptancePolicy::default().floor_at(time), expected);
    }

    #[test]
    fn nothing_to_accept_without_an_offer() {
        let policy = AcceptancePolicy::default();
        assert!(!policy.accepts(None, 0.0, 1.0));
    }

    #[test]
    fn low_offer_late_is_rejected() {
        let policy = AcceptancePolicy::default();
        assert!(!policy.accepts(Some(0.3), 0.1, 0.95));
    }

    #[test]
    fn late_offer_above_floor_must_dominate_counter() {
        let policy = AcceptancePolicy::default();
        assert!(policy.accepts(Some(0.55), 0.55, 0.95));
        assert!(!policy.accepts(Some(0.55), 0.56, 0.95));
    }

    #[test]
    fn offer_at_floor_is_not_enough() {
        let policy = AcceptancePolicy::default();
        assert!(!policy.accepts(Some(0.85), 0.1, 0.1));
        assert!(policy.accepts(Some(0.86), 0.1, 0.1));
    }

    #[test]
    fn default_policy_is_valid() {
        assert!(AcceptancePolicy::default().validate().is_ok());
    }

    #[test]
    fn unordered_brackets_are_invalid() {
        let mut policy = AcceptancePolicy::default();
        policy.brackets.reverse();
        assert!(matches!(policy.validate(), Err(AgentError::InvalidConfig(_))));
    }

    #[test]
    fn policy_deserializes_with_defaults() {
        let policy: AcceptancePolicy = serde_json::from_str(r#"{ "instantAccept": 0.95 }"#).unwrap();
        assert_eq!(policy.instant_accept, 0.95);
        assert_eq!(policy.final_floor, 0.5);
        assert_eq!(policy.brackets.len(), 3);
    }

    proptest! {
        #[test]
        fn near_ideal_offer_is_always_accepted(
            counter in 0.0f64..=1.0,
            time in 0.0f64..=1.0,
        ) {
            prop_assert!(AcceptancePolicy::default().accepts(Some(0.95), counter, time));
        }

        #[test]
        fn accepted_offers_clear_the_floor(
            standing in 0.0f64..=1.0,
            counter in 0.0f64..=1.0,
            time in 0.0f64..=1.0,
        ) {
            let policy = AcceptancePolicy::default();
            if policy.accepts(Some(standing), counter, time) && standing <= policy.instant_accept {
                prop_assert!(standing > policy.floor_at(time));
                prop_assert!(standing >= counter);
            }
        }
    }
}

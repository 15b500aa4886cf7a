//! Round-based negotiation progress.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Position of a session relative to its round deadline.
///
/// Progress only moves forward: [`advance`](Self::advance) returns a new
/// value one round later and saturates at the deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    current_round: u32,
    total_rounds: u32,
}

impl Progress {
    /// Creates progress at round zero of a `total_rounds` deadline.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidProfile`] if `total_rounds` is zero.
    pub fn new(total_rounds: u32) -> Result<Self, CoreError> {
        if total_rounds == 0 {
            return Err(CoreError::InvalidProfile(
                "deadline must be at least one round".to_string(),
            ));
        }
        Ok(Self {
            current_round: 0,
            total_rounds,
        })
    }

    /// The current zero-based round.
    #[must_use]
    pub const fn current_round(&self) -> u32 {
        self.current_round
    }

    /// The round deadline.
    #[must_use]
    pub const fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    /// Rounds left before the deadline.
    #[must_use]
    pub const fn remaining_rounds(&self) -> u32 {
        self.total_rounds.saturating_sub(self.current_round)
    }

    /// Elapsed fraction of the session, in `[0, 1]`.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        (f64::from(self.current_round) / f64::from(self.total_rounds)).min(1.0)
    }

    /// Returns progress one round later.
    #[must_use]
    pub const fn advance(self) -> Self {
        let next = if self.current_round < self.total_rounds {
            self.current_round + 1
        } else {
            self.total_rounds
        };
        Self {
            current_round: next,
            total_rounds: self.total_rounds,
        }
    }

    /// Returns true once the deadline has been reached.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.current_round >= self.total_rounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_round_deadline_is_rejected() {
        assert!(Progress::new(0).is_err());
    }

    #[test]
    fn advance_moves_one_round() {
        let progress = Progress::new(200).unwrap().advance();
        assert_eq!(progress.current_round(), 1);
        assert_eq!(progress.remaining_rounds(), 199);
        assert!((progress.fraction() - 0.005).abs() < 1e-12);
    }

    #[test]
    fn advance_saturates_at_deadline() {
        let mut progress = Progress::new(3).unwrap();
        for _ in 0..10 {
            progress = progress.advance();
        }
        assert_eq!(progress.current_round(), 3);
        assert!(progress.is_finished());
        assert_eq!(progress.fraction(), 1.0);
    }

    #[test]
    fn progress_never_decreases() {
        let mut progress = Progress::new(50).unwrap();
        let mut last = progress.fraction();
        for _ in 0..60 {
            progress = progress.advance();
            assert!(progress.fraction() >= last);
            last = progress.fraction();
        }
    }
}

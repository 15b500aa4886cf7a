//! Expected-utility targets per remaining round.
//!
//! With `n` rounds left, a rational agent that concedes optimally against a
//! uniformly random opponent can expect `u[n]`, where `u[0]` is the
//! reservation utility and `u[n] = ¼ (u[n-1] + 1)²`. The map
//! `u ↦ ¼ (u + 1)²` satisfies `f(u) - u = ¼ (u - 1)² ≥ 0` and has its
//! fixed point at 1, so the table is non-decreasing in `n` and bounded by 1:
//! the target drops as the deadline approaches.

use serde::Serialize;

/// Precomputed targets indexed by rounds remaining.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpectedUtilityTable {
    values: Vec<f64>,
}

impl ExpectedUtilityTable {
    /// Builds the table for `rounds` rounds (`rounds + 1` entries).
    #[must_use]
    pub fn new(reservation_utility: f64, rounds: u32) -> Self {
        let mut values = Vec::with_capacity(rounds as usize + 1);
        let mut current = reservation_utility.clamp(0.0, 1.0);
        values.push(current);
        for _ in 0..rounds {
            current = 0.25 * (current + 1.0).powi(2);
            values.push(current);
        }
        Self { values }
    }

    /// Target utility with `remaining` rounds left.
    ///
    /// Indices past the end read the last entry.
    #[must_use]
    pub fn get(&self, remaining: u32) -> f64 {
        let last = self.values.len().saturating_sub(1);
        self.values
            .get((remaining as usize).min(last))
            .copied()
            .unwrap_or(0.0)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the table has no entries. Never true for a built table.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All entries, indexed by rounds remaining.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::tiers::{MAX_ATTEMPTS, PointTiers};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("all {max} attempts have already been used")]
    NoAttemptsLeft { max: u8 },
}

/// Result of grading one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptOutcome {
    Correct { points: u32 },
    IncorrectRetry { remaining: u8 },
    IncorrectExhausted,
}

/// Attempt counter for the problem currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptState {
    used: u8,
    max: u8,
}

impl Default for AttemptState {
    fn default() -> Self {
        Self::new()
    }
}

impl AttemptState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            used: 0,
            max: MAX_ATTEMPTS,
        }
    }

    #[must_use]
    pub fn used(&self) -> u8 {
        self.used
    }

    #[must_use]
    pub fn max(&self) -> u8 {
        self.max
    }

    #[must_use]
    pub fn remaining(&self) -> u8 {
        self.max - self.used
    }

    /// True before the first graded submission.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.used == 0
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.used >= self.max
    }

    /// Grades one submission and consumes an attempt.
    ///
    /// Points come from `tiers` indexed by the attempts used before this one.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::NoAttemptsLeft` once the counter is exhausted.
    pub fn record(
        &mut self,
        correct: bool,
        tiers: &PointTiers,
    ) -> Result<AttemptOutcome, AttemptError> {
        if self.is_exhausted() {
            return Err(AttemptError::NoAttemptsLeft { max: self.max });
        }
        let before = self.used;
        self.used += 1;

        if correct {
            return Ok(AttemptOutcome::Correct {
                points: tiers.points_for(before),
            });
        }
        if self.is_exhausted() {
            Ok(AttemptOutcome::IncorrectExhausted)
        } else {
            Ok(AttemptOutcome::IncorrectRetry {
                remaining: self.remaining(),
            })
        }
    }
}

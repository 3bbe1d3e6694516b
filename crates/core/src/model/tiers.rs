use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed number of attempts every problem allows.
pub const MAX_ATTEMPTS: u8 = 3;

const TIER_LEN: usize = MAX_ATTEMPTS as usize;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TierError {
    #[error("point tiers must have exactly {expected} entries, got {len}")]
    WrongLength { expected: usize, len: usize },

    #[error("point tiers must not increase with attempts used")]
    Increasing,
}

/// Points awarded for a correct answer, indexed by attempts already used.
///
/// Index 0 is the first-try reward; the last index is the reward on the
/// final allowed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointTiers([u32; TIER_LEN]);

impl PointTiers {
    /// `{3, 2, 1}`: single-problem tasks.
    pub const STANDARD: Self = Self([3, 2, 1]);

    /// `{6, 4, 2}`: double-weighted bonus tasks and 3D shapes.
    pub const BONUS: Self = Self([6, 4, 2]);

    /// Builds a custom tier schedule.
    ///
    /// # Errors
    ///
    /// Returns `TierError::WrongLength` unless exactly `MAX_ATTEMPTS` values are given,
    /// and `TierError::Increasing` if a later attempt would earn more than an earlier one.
    pub fn new(points: &[u32]) -> Result<Self, TierError> {
        let tiers: [u32; TIER_LEN] = points.try_into().map_err(|_| TierError::WrongLength {
            expected: TIER_LEN,
            len: points.len(),
        })?;
        if tiers.windows(2).any(|pair| pair[1] > pair[0]) {
            return Err(TierError::Increasing);
        }
        Ok(Self(tiers))
    }

    /// Points for a correct answer after `attempts_used` wrong ones.
    ///
    /// Returns 0 once every attempt has been spent.
    #[must_use]
    pub fn points_for(&self, attempts_used: u8) -> u32 {
        self.0.get(usize::from(attempts_used)).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

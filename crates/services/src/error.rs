//! Shared error types for the services crate.

use thiserror::Error;

use shapeville_core::generator::GenerationError;
use shapeville_core::model::{ActivityKind, AttemptError, ItemId, SettingsError};
use shapeville_core::validator::InputError;

use crate::activity::Control;

/// Errors emitted by `LedgerHandle`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LedgerError {
    #[error("session ledger lock poisoned: {0}")]
    Poisoned(String),
}

/// Errors emitted by `TaskMachine`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ActivityError {
    #[error("{0} is not available right now")]
    ControlDisabled(Control),
    #[error("no problem is in progress")]
    NotInProgress,
    #[error("{requested} cannot be started from the {activity} activity")]
    ModeMismatch {
        activity: ActivityKind,
        requested: ActivityKind,
    },
    #[error("{item} has already been completed")]
    DuplicateCompletedItem { item: ItemId },
    #[error("navigation cancelled")]
    NavigationCancelled,
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Attempt(#[from] AttemptError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl ActivityError {
    /// True for rejected input that leaves the current problem untouched.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ActivityError::Input(_)
                | ActivityError::DuplicateCompletedItem { .. }
                | ActivityError::ControlDisabled(_)
                | ActivityError::NavigationCancelled
        )
    }
}

/// Errors emitted while building a `Tutor`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TutorError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

use services::{LedgerError, TutorError};
use thiserror::Error;

use crate::args::ArgsError;

/// Failures that end the binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Args(#[from] ArgsError),
    #[error(transparent)]
    Tutor(#[from] TutorError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

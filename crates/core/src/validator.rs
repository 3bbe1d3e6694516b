//! Answer validation: numeric tolerance for measurements, exact
//! case-insensitive matching for shape names and angle labels.

use thiserror::Error;

/// Largest accepted distance between a numeric answer and the correct value.
pub const NUMERIC_TOLERANCE: f64 = 0.01;

/// Rejected input. Never consumes an attempt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputError {
    #[error("not a number: {raw:?}")]
    InvalidNumeric { raw: String },

    #[error("angle {value} is not a multiple of 10 between 0 and 360")]
    OutOfRange { value: i64 },
}

impl InputError {
    /// Message to show when re-prompting.
    #[must_use]
    pub fn prompt(&self) -> &'static str {
        match self {
            InputError::InvalidNumeric { .. } => "Please enter a valid number.",
            InputError::OutOfRange { .. } => {
                "Invalid input! Please enter a number between 0 - 360 that's a multiple of 10."
            }
        }
    }
}

/// Parses a numeric answer, ignoring surrounding whitespace.
///
/// # Errors
///
/// Returns `InputError::InvalidNumeric` for text that is not a finite number.
pub fn parse_numeric(raw: &str) -> Result<f64, InputError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| InputError::InvalidNumeric {
            raw: raw.to_string(),
        })
}

/// `|user - correct| < 0.01`, compared in `f64`.
///
/// Answers a full hundredth away sit on the float boundary and may pass.
#[must_use]
pub fn numeric_matches(user: f64, correct: f64) -> bool {
    (user - correct).abs() < NUMERIC_TOLERANCE
}

/// Trimmed, case-insensitive, exact label comparison.
#[must_use]
pub fn label_matches(user: &str, correct: &str) -> bool {
    user.trim().to_lowercase() == correct.trim().to_lowercase()
}

/// Parses a user-entered angle: an integer multiple of 10 in `[0, 360]`.
///
/// # Errors
///
/// Returns `InputError::InvalidNumeric` for non-integer text and
/// `InputError::OutOfRange` for values outside the allowed set.
pub fn parse_angle(raw: &str) -> Result<u16, InputError> {
    let value = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| InputError::InvalidNumeric {
            raw: raw.to_string(),
        })?;
    if !(0..=360).contains(&value) || value % 10 != 0 {
        return Err(InputError::OutOfRange { value });
    }
    u16::try_from(value).map_err(|_| InputError::OutOfRange { value })
}

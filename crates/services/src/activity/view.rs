use serde::Serialize;

use shapeville_core::model::{ActivityKind, ItemId};

use super::controls::EnabledControls;
use super::machine::Phase;

/// How feedback should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTone {
    Success,
    Warning,
    Failure,
}

/// Message shown under the answer box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub tone: FeedbackTone,
    pub message: String,
}

impl Feedback {
    pub(crate) fn success(message: impl Into<String>) -> Self {
        Self {
            tone: FeedbackTone::Success,
            message: message.into(),
        }
    }

    pub(crate) fn warning(message: impl Into<String>) -> Self {
        Self {
            tone: FeedbackTone::Warning,
            message: message.into(),
        }
    }

    pub(crate) fn failure(message: impl Into<String>) -> Self {
        Self {
            tone: FeedbackTone::Failure,
            message: message.into(),
        }
    }
}

/// Presentation-agnostic state of one activity.
///
/// Everything a renderer needs; no pre-built widgets, no asset paths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivitySnapshot {
    pub activity: ActivityKind,
    pub title: &'static str,
    pub phase: Phase,
    pub prompt: Option<String>,
    pub asset_key: Option<String>,
    pub display_radius: Option<u32>,
    pub attempts_remaining: Option<u8>,
    pub max_attempts: u8,
    pub remaining_seconds: Option<u32>,
    pub feedback: Option<Feedback>,
    pub solution: Option<String>,
    pub completed_items: Vec<ItemId>,
    pub required: usize,
    pub is_complete: bool,
    pub controls: EnabledControls,
}

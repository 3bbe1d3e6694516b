use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::ids::ItemId;

/// Distinct items finished within one activity.
///
/// Survives leaving the activity; only an explicit fresh run clears it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityProgress {
    completed: BTreeSet<ItemId>,
    required: usize,
}

impl ActivityProgress {
    #[must_use]
    pub fn new(required: usize) -> Self {
        Self {
            completed: BTreeSet::new(),
            required,
        }
    }

    /// Records an item. Returns `false` if it was already present.
    pub fn insert(&mut self, item: ItemId) -> bool {
        self.completed.insert(item)
    }

    #[must_use]
    pub fn contains(&self, item: &ItemId) -> bool {
        self.completed.contains(item)
    }

    #[must_use]
    pub fn completed(&self) -> &BTreeSet<ItemId> {
        &self.completed
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.completed.len()
    }

    #[must_use]
    pub fn required(&self) -> usize {
        self.required
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed.len() >= self.required
    }

    pub fn reset(&mut self) {
        self.completed.clear();
    }
}

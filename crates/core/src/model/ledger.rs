use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{ItemId, SessionId};
use crate::model::ActivityKind;

//
// ─── SETTLEMENT ────────────────────────────────────────────────────────────────
//

/// Terminal state of one problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Settlement {
    Correct { points: u32 },
    Exhausted,
    Expired,
    AlreadyCompleted,
}

impl Settlement {
    #[must_use]
    pub fn points(&self) -> u32 {
        match self {
            Settlement::Correct { points } => *points,
            _ => 0,
        }
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        matches!(self, Settlement::Correct { .. })
    }
}

/// One entry of the session history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRecord {
    pub activity: ActivityKind,
    pub item: ItemId,
    pub settlement: Settlement,
    pub settled_at: DateTime<Utc>,
}

impl SettlementRecord {
    #[must_use]
    pub fn new(
        activity: ActivityKind,
        item: ItemId,
        settlement: Settlement,
        settled_at: DateTime<Utc>,
    ) -> Self {
        Self {
            activity,
            item,
            settlement,
            settled_at,
        }
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.settlement.points()
    }
}

//
// ─── LEDGER ────────────────────────────────────────────────────────────────────
//

/// Score, completed activities and history for one session.
///
/// The only writer of score and completion; everything presented to the
/// user is read back through [`SessionLedger::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLedger {
    id: SessionId,
    started_at: DateTime<Utc>,
    score: u32,
    completed: BTreeSet<ActivityKind>,
    history: Vec<SettlementRecord>,
}

/// Read-only view of the ledger for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub score: u32,
    pub progress_percent: u8,
    pub completed_activities: Vec<ActivityKind>,
}

/// Final report produced when the session ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: SessionId,
    pub score: u32,
    pub progress_percent: u8,
    pub completed_activities: Vec<ActivityKind>,
    pub correct: usize,
    pub exhausted: usize,
    pub expired: usize,
    pub already_completed: usize,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

impl SessionLedger {
    #[must_use]
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            id: SessionId::new_random(),
            started_at,
            score: 0,
            completed: BTreeSet::new(),
            history: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Adds points. Saturates instead of wrapping so the score never decreases.
    pub fn award(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Marks an activity complete. Returns `true` only the first time.
    pub fn mark_complete(&mut self, activity: ActivityKind) -> bool {
        self.completed.insert(activity)
    }

    #[must_use]
    pub fn is_complete(&self, activity: ActivityKind) -> bool {
        self.completed.contains(&activity)
    }

    /// `round(completed / 6 * 100)`, in integer arithmetic.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        let completed = self.completed.len().min(ActivityKind::COUNT);
        let percent = (completed * 100 + ActivityKind::COUNT / 2) / ActivityKind::COUNT;
        u8::try_from(percent).unwrap_or(100)
    }

    pub fn record(&mut self, record: SettlementRecord) {
        self.history.push(record);
    }

    #[must_use]
    pub fn history(&self) -> &[SettlementRecord] {
        &self.history
    }

    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            score: self.score,
            progress_percent: self.progress_percent(),
            completed_activities: self.completed.iter().copied().collect(),
        }
    }

    #[must_use]
    pub fn summary(&self, ended_at: DateTime<Utc>) -> SessionSummary {
        let count = |wanted: fn(&Settlement) -> bool| {
            self.history
                .iter()
                .filter(|record| wanted(&record.settlement))
                .count()
        };
        SessionSummary {
            session_id: self.id,
            score: self.score,
            progress_percent: self.progress_percent(),
            completed_activities: self.completed.iter().copied().collect(),
            correct: count(Settlement::is_correct),
            exhausted: count(|s| matches!(s, Settlement::Exhausted)),
            expired: count(|s| matches!(s, Settlement::Expired)),
            already_completed: count(|s| matches!(s, Settlement::AlreadyCompleted)),
            started_at: self.started_at,
            ended_at,
        }
    }
}

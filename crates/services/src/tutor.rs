use serde::Serialize;
use tracing::info;

use shapeville_core::model::{ActivityKind, SessionSummary, TutorSettings, TutorSettingsDraft};

use crate::Clock;
use crate::activity::{ActivityIntent, ActivitySnapshot, DispatchOutcome, TaskMachine};
use crate::countdown::{TickOutcome, TimerTicket};
use crate::error::{ActivityError, LedgerError, TutorError};
use crate::ledger::LedgerHandle;
use crate::navigation::{ConfirmNavigation, Destination};

/// One tile of the home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityTile {
    pub activity: ActivityKind,
    pub title: &'static str,
    pub is_bonus: bool,
    pub completed: bool,
}

/// Home page state: score, overall progress and the activity tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeSnapshot {
    pub score: u32,
    pub progress_percent: u8,
    pub tiles: Vec<ActivityTile>,
}

/// Composition root: the shared ledger plus one machine per activity.
#[derive(Debug)]
pub struct Tutor {
    settings: TutorSettings,
    ledger: LedgerHandle,
    machines: [TaskMachine; ActivityKind::COUNT],
    current: Option<ActivityKind>,
}

impl Tutor {
    #[must_use]
    pub fn new(settings: TutorSettings, clock: Clock) -> Self {
        let ledger = LedgerHandle::new(clock);
        let machines =
            ActivityKind::ALL.map(|kind| TaskMachine::new(kind, &settings, ledger.clone()));
        info!(
            time_limit = settings.time_limit_secs(),
            bonus_time_limit = settings.bonus_time_limit_secs(),
            seeded = settings.seed().is_some(),
            "tutor ready"
        );
        Self {
            settings,
            ledger,
            machines,
            current: None,
        }
    }

    /// Validates `draft` and builds a tutor from it.
    ///
    /// # Errors
    ///
    /// Returns `TutorError::Settings` if the draft is out of range.
    pub fn from_draft(draft: TutorSettingsDraft, clock: Clock) -> Result<Self, TutorError> {
        Ok(Self::new(draft.validate()?, clock))
    }

    #[must_use]
    pub fn settings(&self) -> &TutorSettings {
        &self.settings
    }

    #[must_use]
    pub fn ledger(&self) -> &LedgerHandle {
        &self.ledger
    }

    /// The activity whose page is open, if any.
    #[must_use]
    pub fn current(&self) -> Option<ActivityKind> {
        self.current
    }

    #[must_use]
    pub fn machine(&self, kind: ActivityKind) -> &TaskMachine {
        &self.machines[slot(kind)]
    }

    pub fn machine_mut(&mut self, kind: ActivityKind) -> &mut TaskMachine {
        &mut self.machines[slot(kind)]
    }

    /// Opens an activity page, leaving the current one first.
    ///
    /// # Errors
    ///
    /// Returns `NavigationCancelled` if `confirm` declines abandoning a problem
    /// in progress, or the error of entering the new activity.
    pub fn open(
        &mut self,
        kind: ActivityKind,
        confirm: &dyn ConfirmNavigation,
    ) -> Result<Option<TimerTicket>, ActivityError> {
        if let Some(current) = self.current.filter(|current| *current != kind) {
            self.machine_mut(current)
                .leave(Destination::Activity(kind), confirm)?;
        }
        self.current = Some(kind);
        self.machine_mut(kind).enter()
    }

    /// Returns to the home page.
    ///
    /// # Errors
    ///
    /// Returns `NavigationCancelled` if `confirm` declines.
    pub fn leave(&mut self, confirm: &dyn ConfirmNavigation) -> Result<(), ActivityError> {
        if let Some(current) = self.current {
            self.machine_mut(current).leave(Destination::Home, confirm)?;
        }
        self.current = None;
        Ok(())
    }

    /// Applies an intent to the open activity.
    ///
    /// # Errors
    ///
    /// Returns `NotInProgress` on the home page, otherwise the machine's error.
    pub fn dispatch(&mut self, intent: ActivityIntent) -> Result<DispatchOutcome, ActivityError> {
        let current = self.current.ok_or(ActivityError::NotInProgress)?;
        self.machine_mut(current).dispatch(intent)
    }

    /// Delivers a one-second tick to the open activity.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::Ledger` if an expiry cannot be recorded.
    pub fn tick(&mut self) -> Result<TickOutcome, ActivityError> {
        match self.current {
            Some(current) => self.machine_mut(current).tick(),
            None => Ok(TickOutcome::Ignored),
        }
    }

    /// Delivers a ticketed tick to the open activity that minted it.
    ///
    /// Tickets from other activities or earlier countdowns are ignored.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::Ledger` if an expiry cannot be recorded.
    pub fn tick_ticket(&mut self, ticket: TimerTicket) -> Result<TickOutcome, ActivityError> {
        match self.current {
            Some(current) if current == ticket.activity() => {
                self.machine_mut(current).tick_ticket(ticket)
            }
            _ => Ok(TickOutcome::Ignored),
        }
    }

    #[must_use]
    pub fn activity_snapshot(&self) -> Option<ActivitySnapshot> {
        self.current.map(|kind| self.machine(kind).snapshot())
    }

    /// # Errors
    ///
    /// Returns `LedgerError::Poisoned` if the ledger is unusable.
    pub fn home(&self) -> Result<HomeSnapshot, LedgerError> {
        let ledger = self.ledger.snapshot()?;
        let tiles = ActivityKind::ALL
            .into_iter()
            .map(|activity| ActivityTile {
                activity,
                title: activity.title(),
                is_bonus: activity.is_bonus(),
                completed: ledger.completed_activities.contains(&activity),
            })
            .collect();
        Ok(HomeSnapshot {
            score: ledger.score,
            progress_percent: ledger.progress_percent,
            tiles,
        })
    }

    /// Stops every countdown and produces the final report.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Poisoned` if the ledger is unusable.
    pub fn end_session(&mut self) -> Result<SessionSummary, LedgerError> {
        for machine in &mut self.machines {
            machine.reset_activity();
        }
        self.current = None;
        let summary = self.ledger.summary()?;
        info!(
            score = summary.score,
            progress_percent = summary.progress_percent,
            correct = summary.correct,
            "session ended"
        );
        Ok(summary)
    }
}

fn slot(kind: ActivityKind) -> usize {
    match kind {
        ActivityKind::ShapeRecognition => 0,
        ActivityKind::AngleClassification => 1,
        ActivityKind::PolygonArea => 2,
        ActivityKind::CircleMeasure => 3,
        ActivityKind::CompositeArea => 4,
        ActivityKind::SectorArea => 5,
    }
}

use serde::Serialize;
use tracing::{debug, info, warn};

use shapeville_core::catalog::{COMPOSITE_IDS, SECTOR_IDS};
use shapeville_core::generator::{ContentGenerator, GenerationError};
use shapeville_core::model::{
    ActivityKind, ActivityMode, ActivityProgress, AngleClass, AttemptOutcome, AttemptState,
    CircleMeasure, ItemId, MAX_ATTEMPTS, PolygonFamily, Problem, ProblemParams, Settlement,
    TutorSettings,
};
use shapeville_core::validator;

use crate::countdown::{Countdown, TickOutcome, TimerTicket};
use crate::error::ActivityError;
use crate::ledger::LedgerHandle;
use crate::navigation::{ConfirmNavigation, Destination, LeaveRequest};

use super::config::{ActivityConfig, CompletionRule};
use super::controls::{Control, EnabledControls, ItemChoice};
use super::view::{ActivitySnapshot, Feedback};

const ANGLE_ALREADY_COMPLETED: &str =
    "You have already completed this angle type! Try a different angle.";

//
// ─── STATES AND INTENTS ────────────────────────────────────────────────────────
//

/// Lifecycle state of an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Selecting,
    InProgress,
    Settled(Settlement),
}

/// A command issued by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityIntent {
    Start(ActivityMode),
    Submit(String),
    ChooseAngle(String),
    Reveal,
    /// A tick from a host that does not track tickets.
    Tick,
    TimerTick(TimerTicket),
    Next,
    Reset,
}

impl ActivityIntent {
    fn is_tick(&self) -> bool {
        matches!(self, ActivityIntent::Tick | ActivityIntent::TimerTick(_))
    }
}

/// What happened in response to one intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Started(TimerTicket),
    Answered(AttemptOutcome),
    AngleChosen(AngleChoice),
    Revealed(String),
    Ticked(TickOutcome),
    Advanced(NextStep),
    Reset,
}

/// Result of advancing past a settled problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    Problem(TimerTicket),
    /// The user picks the next item.
    Selecting,
    /// The run is complete and the activity is idle.
    Completed,
}

/// Result of a user-entered angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleChoice {
    Accepted { degrees: u16, ticket: TimerTicket },
    AlreadyCompleted { class: AngleClass },
}

//
// ─── MACHINE ───────────────────────────────────────────────────────────────────
//

#[derive(Debug)]
struct ActiveProblem {
    problem: Problem,
    attempts: AttemptState,
}

/// One activity: problem generation, attempts, countdown and completion.
///
/// The same machine serves all six activities; `ActivityConfig` carries the
/// differences. Every settlement goes through `settle`, which stops the
/// countdown before anything else happens.
#[derive(Debug)]
pub struct TaskMachine {
    config: ActivityConfig,
    generator: ContentGenerator,
    ledger: LedgerHandle,
    progress: ActivityProgress,
    phase: Phase,
    mode: Option<ActivityMode>,
    active: Option<ActiveProblem>,
    countdown: Countdown,
    feedback: Option<Feedback>,
    revealed: bool,
}

impl TaskMachine {
    /// Builds a machine whose generator is seeded from `settings`.
    ///
    /// With a configured seed, each activity gets its own derived stream so
    /// two activities never replay the same draws.
    #[must_use]
    pub fn new(kind: ActivityKind, settings: &TutorSettings, ledger: LedgerHandle) -> Self {
        let generator = match settings.seed() {
            Some(seed) => {
                let offset = ActivityKind::ALL
                    .iter()
                    .position(|candidate| *candidate == kind)
                    .unwrap_or(0) as u64;
                ContentGenerator::seeded(seed.wrapping_add(offset), settings)
            }
            None => ContentGenerator::new(settings),
        };
        Self::with_generator(ActivityConfig::for_kind(kind, settings), generator, ledger)
    }

    #[must_use]
    pub fn with_generator(
        config: ActivityConfig,
        generator: ContentGenerator,
        ledger: LedgerHandle,
    ) -> Self {
        Self {
            progress: ActivityProgress::new(config.required()),
            countdown: Countdown::new(config.kind()),
            config,
            generator,
            ledger,
            phase: Phase::Idle,
            mode: None,
            active: None,
            feedback: None,
            revealed: false,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ActivityKind {
        self.config.kind()
    }

    #[must_use]
    pub fn config(&self) -> &ActivityConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn progress(&self) -> &ActivityProgress {
        &self.progress
    }

    #[must_use]
    pub fn current_problem(&self) -> Option<&Problem> {
        self.active.as_ref().map(|active| &active.problem)
    }

    #[must_use]
    pub fn attempts(&self) -> Option<AttemptState> {
        self.active.as_ref().map(|active| active.attempts)
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> Option<u32> {
        self.active.as_ref().map(|_| self.countdown.remaining())
    }

    /// Ticket of the running countdown.
    #[must_use]
    pub fn ticket(&self) -> Option<TimerTicket> {
        self.countdown
            .ticket()
            .filter(|_| self.countdown.is_running())
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    //
    // ─── ENTRY AND SELECTION ──────────────────────────────────────────────────
    //

    /// Opens the activity page.
    ///
    /// A completed run is cleared first. Activities with sub-modes wait in
    /// `Selecting`; angle classification starts a problem immediately.
    /// Re-entering while a problem is active resumes it.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError` if the first problem cannot be generated.
    pub fn enter(&mut self) -> Result<Option<TimerTicket>, ActivityError> {
        match self.phase {
            Phase::InProgress => return Ok(self.ticket()),
            Phase::Selecting | Phase::Settled(_) => return Ok(None),
            Phase::Idle => {}
        }
        if self.progress.is_complete() {
            self.progress.reset();
            debug!(activity = %self.kind(), "starting a fresh run");
        }
        if self.kind().has_sub_modes() {
            self.phase = Phase::Selecting;
            return Ok(None);
        }
        self.start_activity(ActivityMode::Angles(None)).map(Some)
    }

    /// Starts a problem for the chosen sub-mode.
    ///
    /// # Errors
    ///
    /// - `ControlDisabled(Start)` while a problem is in progress.
    /// - `ModeMismatch` if `mode` belongs to another activity.
    /// - `DuplicateCompletedItem` if `mode` pins a completed item.
    /// - `Generation` if the pinned item is unknown or nothing is left.
    pub fn start_activity(&mut self, mode: ActivityMode) -> Result<TimerTicket, ActivityError> {
        self.ensure_kind(mode.kind())?;
        if self.phase == Phase::InProgress {
            return Err(ActivityError::ControlDisabled(Control::Start));
        }
        if self.progress.is_complete() || mode.starts_fresh_run() {
            self.progress.reset();
            if let ActivityMode::Shapes(dimension) = mode {
                self.generator.plan_shape_run(dimension);
            }
        }

        match self.generator.generate(mode, self.progress.completed()) {
            Ok(params) => {
                self.mode = Some(mode);
                Ok(self.begin(params))
            }
            Err(GenerationError::DuplicateCompletedItem { item }) => {
                warn!(activity = %self.kind(), %item, "item already completed");
                self.feedback = Some(Feedback::warning(format!(
                    "You have already completed {item}! Choose another one."
                )));
                Err(ActivityError::DuplicateCompletedItem { item })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Starts a caller-built problem, bypassing the generator.
    ///
    /// # Errors
    ///
    /// - `ControlDisabled(Start)` while a problem is in progress.
    /// - `ModeMismatch` if the problem belongs to another activity.
    /// - `DuplicateCompletedItem` if its item is already completed.
    pub fn start_prepared(&mut self, problem: Problem) -> Result<TimerTicket, ActivityError> {
        self.ensure_kind(problem.kind())?;
        if self.phase == Phase::InProgress {
            return Err(ActivityError::ControlDisabled(Control::Start));
        }
        if self.progress.is_complete() {
            self.progress.reset();
        }
        if self.progress.contains(problem.item()) {
            return Err(ActivityError::DuplicateCompletedItem {
                item: problem.item().clone(),
            });
        }
        self.mode = Some(mode_of(problem.params()));
        Ok(self.begin_problem(problem))
    }

    /// Replaces the current angle with one the user typed.
    ///
    /// Allowed before the first attempt, or after an already-completed
    /// rejection. An angle of a completed type settles as `AlreadyCompleted`
    /// without consuming an attempt.
    ///
    /// # Errors
    ///
    /// - `ControlDisabled(ChooseAngle)` outside those states.
    /// - `Input` if `raw` is not a multiple of 10 in 0..=360.
    pub fn choose_angle(&mut self, raw: &str) -> Result<AngleChoice, ActivityError> {
        if !self.can_choose_angle() {
            return Err(ActivityError::ControlDisabled(Control::ChooseAngle));
        }
        let degrees = match validator::parse_angle(raw) {
            Ok(degrees) => degrees,
            Err(err) => {
                warn!(raw, "rejected angle input");
                self.feedback = Some(Feedback::warning(err.prompt()));
                return Err(err.into());
            }
        };

        self.countdown.cancel();
        let mode = ActivityMode::Angles(Some(degrees));
        match self.generator.generate(mode, self.progress.completed()) {
            Ok(params) => {
                self.mode = Some(mode);
                let ticket = self.begin(params);
                Ok(AngleChoice::Accepted { degrees, ticket })
            }
            Err(GenerationError::DuplicateCompletedItem { .. }) => {
                let params = ProblemParams::Angle { degrees };
                let problem = self.build_problem(params);
                self.active = Some(ActiveProblem {
                    problem,
                    attempts: AttemptState::new(),
                });
                self.settle(Settlement::AlreadyCompleted)?;
                Ok(AngleChoice::AlreadyCompleted {
                    class: AngleClass::classify(degrees),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    //
    // ─── ANSWERING ────────────────────────────────────────────────────────────
    //

    /// Grades a submission against the current problem.
    ///
    /// # Errors
    ///
    /// - `NotInProgress` unless a problem is in progress.
    /// - `Input` for unparseable numeric input; no attempt is consumed and the
    ///   countdown keeps running.
    pub fn submit_answer(&mut self, raw: &str) -> Result<AttemptOutcome, ActivityError> {
        if self.phase != Phase::InProgress {
            return Err(ActivityError::NotInProgress);
        }
        let active = self.active.as_mut().ok_or(ActivityError::NotInProgress)?;

        let correct = match active.problem.check(raw) {
            Ok(correct) => correct,
            Err(err) => {
                warn!(activity = %self.config.kind(), raw, "rejected answer input");
                self.feedback = Some(Feedback::warning(err.prompt()));
                return Err(err.into());
            }
        };
        let tiers = active.problem.tiers();
        let outcome = active.attempts.record(correct, &tiers)?;
        debug!(
            activity = %self.config.kind(),
            attempts_used = active.attempts.used(),
            ?outcome,
            "answer graded"
        );

        match outcome {
            AttemptOutcome::Correct { points } => self.settle(Settlement::Correct { points })?,
            AttemptOutcome::IncorrectRetry { remaining } => {
                self.feedback = Some(Feedback::failure(format!(
                    "Incorrect! You have {remaining} attempts left."
                )));
            }
            AttemptOutcome::IncorrectExhausted => self.settle(Settlement::Exhausted)?,
        }
        Ok(outcome)
    }

    /// Shows the solution of a settled problem.
    ///
    /// # Errors
    ///
    /// Returns `ControlDisabled(Reveal)` unless a graded problem has settled.
    pub fn request_reveal(&mut self) -> Result<String, ActivityError> {
        let revealable = matches!(self.phase, Phase::Settled(settlement) if settlement != Settlement::AlreadyCompleted);
        let solution = self
            .current_problem()
            .filter(|_| revealable)
            .map(Problem::solution)
            .ok_or(ActivityError::ControlDisabled(Control::Reveal))?;
        self.revealed = true;
        Ok(solution)
    }

    //
    // ─── TIMER ────────────────────────────────────────────────────────────────
    //

    /// Advances the countdown by one second; expiry settles the problem.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::Ledger` if the expiry cannot be recorded.
    pub fn tick(&mut self) -> Result<TickOutcome, ActivityError> {
        if self.phase != Phase::InProgress {
            return Ok(TickOutcome::Ignored);
        }
        let outcome = self.countdown.tick();
        self.after_tick(outcome)
    }

    /// Like [`TaskMachine::tick`], but only for the countdown named by `ticket`.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError::Ledger` if the expiry cannot be recorded.
    pub fn tick_ticket(&mut self, ticket: TimerTicket) -> Result<TickOutcome, ActivityError> {
        if self.phase != Phase::InProgress {
            return Ok(TickOutcome::Ignored);
        }
        let outcome = self.countdown.tick_ticket(ticket);
        self.after_tick(outcome)
    }

    fn after_tick(&mut self, outcome: TickOutcome) -> Result<TickOutcome, ActivityError> {
        if outcome == TickOutcome::Expired {
            self.settle(Settlement::Expired)?;
        }
        Ok(outcome)
    }

    //
    // ─── ADVANCING ────────────────────────────────────────────────────────────
    //

    /// Moves past a settled problem.
    ///
    /// A complete run returns to `Idle`. A pinned item returns to
    /// `Selecting` so the user picks the next one; otherwise the generator
    /// supplies the next unused item.
    ///
    /// # Errors
    ///
    /// Returns `ControlDisabled(Next)` unless the current problem has settled.
    pub fn next_problem(&mut self) -> Result<NextStep, ActivityError> {
        let Phase::Settled(_) = self.phase else {
            return Err(ActivityError::ControlDisabled(Control::Next));
        };
        self.active = None;
        self.revealed = false;

        if self.progress.is_complete() {
            self.phase = Phase::Idle;
            self.feedback = Some(Feedback::success(format!(
                "Congratulations! You have completed {}!",
                self.kind().title()
            )));
            return Ok(NextStep::Completed);
        }

        let user_selects_items = self.kind().has_sub_modes();
        let mode = match self.mode {
            Some(mode) if mode == mode.unpinned() || !user_selects_items => mode.unpinned(),
            _ => {
                self.phase = Phase::Selecting;
                self.feedback = None;
                return Ok(NextStep::Selecting);
            }
        };
        match self.generator.generate(mode, self.progress.completed()) {
            Ok(params) => Ok(NextStep::Problem(self.begin(params))),
            Err(GenerationError::PoolExhausted { .. }) => {
                self.phase = Phase::Selecting;
                Ok(NextStep::Selecting)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Abandons the current problem without a settlement. Progress is kept.
    pub fn reset_activity(&mut self) {
        self.countdown.cancel();
        if self.active.take().is_some() {
            debug!(activity = %self.kind(), "problem abandoned");
        }
        self.phase = Phase::Idle;
        self.feedback = None;
        self.revealed = false;
    }

    /// Leaves the page, asking `confirm` first if a problem is in progress.
    ///
    /// # Errors
    ///
    /// Returns `NavigationCancelled` if the user declines.
    pub fn leave(
        &mut self,
        destination: Destination,
        confirm: &dyn ConfirmNavigation,
    ) -> Result<(), ActivityError> {
        if self.phase == Phase::InProgress {
            let request = LeaveRequest {
                activity: self.kind(),
                destination,
            };
            if !confirm.confirm(&request) {
                return Err(ActivityError::NavigationCancelled);
            }
        }
        self.reset_activity();
        Ok(())
    }

    //
    // ─── DISPATCH ─────────────────────────────────────────────────────────────
    //

    /// Applies one intent.
    ///
    /// # Errors
    ///
    /// Propagates the error of the underlying operation.
    pub fn dispatch(&mut self, intent: ActivityIntent) -> Result<DispatchOutcome, ActivityError> {
        match intent {
            ActivityIntent::Start(mode) => self.start_activity(mode).map(DispatchOutcome::Started),
            ActivityIntent::Submit(raw) => self.submit_answer(&raw).map(DispatchOutcome::Answered),
            ActivityIntent::ChooseAngle(raw) => {
                self.choose_angle(&raw).map(DispatchOutcome::AngleChosen)
            }
            ActivityIntent::Reveal => self.request_reveal().map(DispatchOutcome::Revealed),
            ActivityIntent::Tick => self.tick().map(DispatchOutcome::Ticked),
            ActivityIntent::TimerTick(ticket) => {
                self.tick_ticket(ticket).map(DispatchOutcome::Ticked)
            }
            ActivityIntent::Next => self.next_problem().map(DispatchOutcome::Advanced),
            ActivityIntent::Reset => {
                self.reset_activity();
                Ok(DispatchOutcome::Reset)
            }
        }
    }

    /// Applies intents that arrived in the same instant.
    ///
    /// Ticks go first, so an expiry beats an answer submitted in the same
    /// cycle. Other intents keep their order. Results are returned in
    /// processing order.
    pub fn dispatch_cycle(
        &mut self,
        intents: impl IntoIterator<Item = ActivityIntent>,
    ) -> Vec<Result<DispatchOutcome, ActivityError>> {
        let (ticks, rest): (Vec<_>, Vec<_>) =
            intents.into_iter().partition(ActivityIntent::is_tick);
        ticks
            .into_iter()
            .chain(rest)
            .map(|intent| self.dispatch(intent))
            .collect()
    }

    //
    // ─── VIEW ─────────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn controls(&self) -> EnabledControls {
        let in_progress = self.phase == Phase::InProgress;
        let settled = matches!(self.phase, Phase::Settled(_));
        let graded = matches!(self.phase, Phase::Settled(s) if s != Settlement::AlreadyCompleted);
        EnabledControls {
            start: !in_progress,
            submit: in_progress,
            choose_angle: self.can_choose_angle(),
            reveal: graded && !self.revealed,
            next: settled,
            back: true,
            items: self.item_choices(!in_progress),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> ActivitySnapshot {
        let problem = self.current_problem();
        ActivitySnapshot {
            activity: self.kind(),
            title: self.kind().title(),
            phase: self.phase,
            prompt: problem.map(Problem::prompt),
            asset_key: problem.map(Problem::asset_key),
            display_radius: problem.and_then(Problem::display_radius),
            attempts_remaining: self.attempts().map(|attempts| attempts.remaining()),
            max_attempts: MAX_ATTEMPTS,
            remaining_seconds: self.remaining_seconds(),
            feedback: self.feedback.clone(),
            solution: problem.filter(|_| self.revealed).map(Problem::solution),
            completed_items: self.progress.completed().iter().cloned().collect(),
            required: self.progress.required(),
            is_complete: self.progress.is_complete(),
            controls: self.controls(),
        }
    }

    //
    // ─── INTERNALS ────────────────────────────────────────────────────────────
    //

    fn ensure_kind(&self, requested: ActivityKind) -> Result<(), ActivityError> {
        if requested == self.kind() {
            Ok(())
        } else {
            Err(ActivityError::ModeMismatch {
                activity: self.kind(),
                requested,
            })
        }
    }

    fn can_choose_angle(&self) -> bool {
        if self.kind() != ActivityKind::AngleClassification {
            return false;
        }
        match self.phase {
            Phase::InProgress => self
                .active
                .as_ref()
                .is_some_and(|active| active.attempts.is_fresh()),
            Phase::Settled(Settlement::AlreadyCompleted) => true,
            _ => false,
        }
    }

    fn item_choices(&self, selectable: bool) -> Vec<ItemChoice> {
        let items: Vec<ItemId> = match self.kind() {
            ActivityKind::ShapeRecognition | ActivityKind::AngleClassification => Vec::new(),
            ActivityKind::PolygonArea => PolygonFamily::ALL
                .into_iter()
                .map(|family| ItemId::new(family.name()))
                .collect(),
            ActivityKind::CircleMeasure => [CircleMeasure::Area, CircleMeasure::Circumference]
                .into_iter()
                .map(|measure| ItemId::new(measure.name()))
                .collect(),
            ActivityKind::CompositeArea => COMPOSITE_IDS.into_iter().map(ItemId::number).collect(),
            ActivityKind::SectorArea => SECTOR_IDS.into_iter().map(ItemId::number).collect(),
        };
        items
            .into_iter()
            .map(|item| ItemChoice {
                enabled: selectable && !self.progress.contains(&item),
                item,
            })
            .collect()
    }

    fn build_problem(&self, params: ProblemParams) -> Problem {
        let tiers = self.config.tiers_for(&params);
        Problem::new(params, tiers, self.config.time_limit_secs())
    }

    fn begin(&mut self, params: ProblemParams) -> TimerTicket {
        let problem = self.build_problem(params);
        self.begin_problem(problem)
    }

    fn begin_problem(&mut self, problem: Problem) -> TimerTicket {
        let ticket = self.countdown.start(problem.time_limit_secs());
        debug!(
            activity = %self.kind(),
            item = %problem.item(),
            asset = %problem.asset_key(),
            "problem started"
        );
        self.active = Some(ActiveProblem {
            problem,
            attempts: AttemptState::new(),
        });
        self.phase = Phase::InProgress;
        self.feedback = None;
        self.revealed = false;
        ticket
    }

    fn settle(&mut self, settlement: Settlement) -> Result<(), ActivityError> {
        self.countdown.cancel();
        let active = self.active.as_ref().ok_or(ActivityError::NotInProgress)?;
        let item = active.problem.item().clone();
        let solution = active.problem.solution();
        let kind = self.kind();

        let score = self.ledger.settle(kind, item.clone(), settlement)?;
        let counts = match (settlement, self.config.completion()) {
            (Settlement::AlreadyCompleted, _) => false,
            (Settlement::Correct { .. }, _) | (_, CompletionRule::OnSettle) => true,
            (_, CompletionRule::OnCorrect) => false,
        };
        if counts {
            self.progress.insert(item.clone());
        }

        self.phase = Phase::Settled(settlement);
        self.feedback = Some(match settlement {
            Settlement::Correct { points } => {
                Feedback::success(format!("Great job! You earned {points} points!"))
            }
            Settlement::Exhausted => {
                self.revealed = true;
                Feedback::failure(format!("Incorrect! {solution}"))
            }
            Settlement::Expired => {
                self.revealed = true;
                Feedback::failure(format!("Time's up! {solution}"))
            }
            Settlement::AlreadyCompleted => Feedback::warning(ANGLE_ALREADY_COMPLETED),
        });
        info!(
            activity = %kind,
            %item,
            ?settlement,
            score,
            completed = self.progress.count(),
            required = self.progress.required(),
            "problem settled"
        );

        if self.progress.is_complete() {
            self.ledger.mark_complete(kind)?;
        }
        Ok(())
    }
}

fn mode_of(params: &ProblemParams) -> ActivityMode {
    match params {
        ProblemParams::Shape(entry) => ActivityMode::Shapes(entry.dimension),
        ProblemParams::Angle { .. } => ActivityMode::Angles(None),
        ProblemParams::Polygon(_) => ActivityMode::Polygon(None),
        ProblemParams::Circle { measure, .. } => ActivityMode::Circle(*measure),
        ProblemParams::Composite(_) => ActivityMode::Composite(None),
        ProblemParams::Sector(_) => ActivityMode::Sector(None),
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use shapeville_core::model::PolygonShape;
    use shapeville_core::time::fixed_clock;

    fn machine(kind: ActivityKind) -> (TaskMachine, LedgerHandle) {
        let ledger = LedgerHandle::new(fixed_clock());
        let settings = TutorSettings::default().with_seed(9);
        (TaskMachine::new(kind, &settings, ledger.clone()), ledger)
    }

    fn rectangle() -> Problem {
        Problem::new(
            ProblemParams::Polygon(PolygonShape::Rectangle {
                length: 5,
                width: 4,
            }),
            shapeville_core::model::PointTiers::STANDARD,
            180,
        )
    }

    #[test]
    fn polygon_entry_waits_for_a_selection() {
        let (mut machine, _) = machine(ActivityKind::PolygonArea);
        assert_eq!(machine.enter().unwrap(), None);
        assert_eq!(machine.phase(), Phase::Selecting);
        let controls = machine.controls();
        let triangle = controls
            .items
            .iter()
            .find(|choice| choice.item == ItemId::new("Triangle"))
            .unwrap();
        assert!(triangle.enabled);
    }

    #[test]
    fn angle_entry_starts_immediately() {
        let (mut machine, _) = machine(ActivityKind::AngleClassification);
        assert!(machine.enter().unwrap().is_some());
        assert_eq!(machine.phase(), Phase::InProgress);
        assert_eq!(machine.remaining_seconds(), Some(180));
        assert!(machine.controls().choose_angle);
    }

    #[test]
    fn invalid_numeric_input_consumes_nothing() {
        let (mut machine, _) = machine(ActivityKind::PolygonArea);
        machine.start_prepared(rectangle()).unwrap();
        machine.tick().unwrap();

        let err = machine.submit_answer("twenty").unwrap_err();
        assert!(matches!(err, ActivityError::Input(_)));
        assert_eq!(machine.attempts().unwrap().used(), 0);
        assert_eq!(machine.remaining_seconds(), Some(179));
        assert_eq!(
            machine.feedback().unwrap().message,
            "Please enter a valid number."
        );
        assert_eq!(machine.phase(), Phase::InProgress);
    }

    #[test]
    fn wrong_answer_reports_remaining_attempts() {
        let (mut machine, _) = machine(ActivityKind::PolygonArea);
        machine.start_prepared(rectangle()).unwrap();
        assert_eq!(
            machine.submit_answer("21").unwrap(),
            AttemptOutcome::IncorrectRetry { remaining: 2 }
        );
        assert_eq!(
            machine.feedback().unwrap().message,
            "Incorrect! You have 2 attempts left."
        );
    }

    #[test]
    fn settling_stops_the_countdown() {
        let (mut machine, _) = machine(ActivityKind::PolygonArea);
        let ticket = machine.start_prepared(rectangle()).unwrap();
        machine.submit_answer("20").unwrap();

        assert_eq!(machine.ticket(), None);
        assert_eq!(machine.tick_ticket(ticket).unwrap(), TickOutcome::Ignored);
        assert_eq!(machine.remaining_seconds(), Some(180));
    }

    #[test]
    fn reveal_requires_a_settled_problem() {
        let (mut machine, _) = machine(ActivityKind::PolygonArea);
        machine.start_prepared(rectangle()).unwrap();
        assert!(matches!(
            machine.request_reveal(),
            Err(ActivityError::ControlDisabled(Control::Reveal))
        ));
        machine.submit_answer("20").unwrap();
        assert_eq!(
            machine.request_reveal().unwrap(),
            "Area = length × width = 5 × 4 = 20.00 cm²"
        );
        assert!(!machine.controls().reveal);
    }

    #[test]
    fn modes_of_other_activities_are_rejected() {
        let (mut machine, _) = machine(ActivityKind::SectorArea);
        assert!(matches!(
            machine.start_activity(ActivityMode::Composite(None)),
            Err(ActivityError::ModeMismatch { .. })
        ));
    }

    #[test]
    fn leaving_mid_problem_asks_first() {
        let (mut machine, _) = machine(ActivityKind::PolygonArea);
        machine.start_prepared(rectangle()).unwrap();

        let decline = |_: &LeaveRequest| false;
        assert!(matches!(
            machine.leave(Destination::Home, &decline),
            Err(ActivityError::NavigationCancelled)
        ));
        assert_eq!(machine.phase(), Phase::InProgress);

        let accept = |_: &LeaveRequest| true;
        machine.leave(Destination::Home, &accept).unwrap();
        assert_eq!(machine.phase(), Phase::Idle);
        assert!(machine.current_problem().is_none());
        assert_eq!(machine.ticket(), None);
    }
}

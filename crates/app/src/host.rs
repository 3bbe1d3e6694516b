use std::cell::Cell;
use std::time::Duration;

use serde::Serialize;
use services::{
    ActivityError, ActivityIntent, AlwaysConfirm, AngleChoice, ConfirmNavigation, DispatchOutcome,
    LeaveRequest, NextStep, TickOutcome, TimerTicket, Tutor,
};
use shapeville_core::model::{
    ActivityKind, ActivityMode, AttemptOutcome, CircleMeasure, Dimension, ParseActivityError,
    PolygonFamily, SessionSummary,
};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::render;
use crate::ticker::TickerGuard;

const TICK_PERIOD: Duration = Duration::from_secs(1);

//
// ─── COMMANDS ──────────────────────────────────────────────────────────────────
//

/// One line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Home,
    Open(ActivityKind),
    Start(Option<String>),
    Angle(String),
    Answer(String),
    Reveal,
    Next,
    Back,
    End,
    Help,
    Quit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputParseError {
    #[error("unknown command: {0} (type `help`)")]
    UnknownCommand(String),
    #[error("`{command}` needs a value")]
    MissingArgument { command: &'static str },
    #[error(transparent)]
    UnknownActivity(#[from] ParseActivityError),
    #[error("`{raw}` is not a choice for {activity}")]
    InvalidMode { activity: &'static str, raw: String },
}

impl Input {
    pub fn parse(line: &str) -> Result<Option<Self>, InputParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };
        let argument = |name: &'static str| {
            if rest.is_empty() {
                Err(InputParseError::MissingArgument { command: name })
            } else {
                Ok(rest.to_string())
            }
        };

        let input = match command.to_lowercase().as_str() {
            "home" => Input::Home,
            "open" => Input::Open(argument("open")?.parse()?),
            "start" => Input::Start((!rest.is_empty()).then(|| rest.to_string())),
            "angle" => Input::Angle(argument("angle")?),
            // Blank answers are still submitted and cost an attempt.
            "answer" | "a" => Input::Answer(rest.to_string()),
            "reveal" => Input::Reveal,
            "next" | "n" => Input::Next,
            "back" => Input::Back,
            "end" => Input::End,
            "help" | "?" => Input::Help,
            "quit" | "exit" => Input::Quit,
            other => return Err(InputParseError::UnknownCommand(other.to_string())),
        };
        Ok(Some(input))
    }
}

/// Maps the argument of `start` onto the activity's sub-mode.
pub fn parse_mode(kind: ActivityKind, raw: Option<&str>) -> Result<ActivityMode, InputParseError> {
    let raw = raw.map(str::trim).unwrap_or("random");
    let invalid = || InputParseError::InvalidMode {
        activity: kind.title(),
        raw: raw.to_string(),
    };
    let random = raw.eq_ignore_ascii_case("random");
    let numbered = || -> Result<Option<u8>, InputParseError> {
        if random {
            Ok(None)
        } else {
            raw.parse::<u8>().map(Some).map_err(|_| invalid())
        }
    };

    match kind {
        ActivityKind::ShapeRecognition => match raw.to_lowercase().as_str() {
            "2d" | "2" => Ok(ActivityMode::Shapes(Dimension::Two)),
            "3d" | "3" => Ok(ActivityMode::Shapes(Dimension::Three)),
            _ => Err(invalid()),
        },
        ActivityKind::AngleClassification => Ok(ActivityMode::Angles(None)),
        ActivityKind::PolygonArea => {
            if random {
                Ok(ActivityMode::Polygon(None))
            } else {
                PolygonFamily::from_name(raw)
                    .map(|family| ActivityMode::Polygon(Some(family)))
                    .ok_or_else(invalid)
            }
        }
        ActivityKind::CircleMeasure => match raw.to_lowercase().as_str() {
            "area" => Ok(ActivityMode::Circle(CircleMeasure::Area)),
            "circumference" => Ok(ActivityMode::Circle(CircleMeasure::Circumference)),
            _ => Err(invalid()),
        },
        ActivityKind::CompositeArea => numbered().map(ActivityMode::Composite),
        ActivityKind::SectorArea => numbered().map(ActivityMode::Sector),
    }
}

pub fn print_help() {
    println!("Commands:");
    println!("  home                 show score, progress and activities");
    println!("  open <activity>      shapes | angles | area | circle | composite | sector");
    println!("  start [choice]       begin: 2d/3d, a shape family, area/circumference, a figure number or random");
    println!("  angle <degrees>      enter an angle (multiple of 10, 0-360)");
    println!("  answer <value>       submit an answer");
    println!("  reveal               show the answer once attempts are used up");
    println!("  next                 continue after a problem is settled");
    println!("  back                 return to the home page");
    println!("  end                  finish the session and show the summary");
    println!("  quit                 same as end");
}

//
// ─── NAVIGATION ────────────────────────────────────────────────────────────────
//

/// Declines every request and remembers it, so the prompt can ask y/N.
#[derive(Debug, Default)]
struct AskLater {
    asked: Cell<Option<LeaveRequest>>,
}

impl ConfirmNavigation for AskLater {
    fn confirm(&self, request: &LeaveRequest) -> bool {
        self.asked.set(Some(*request));
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingLeave {
    Home,
    Open(ActivityKind),
}

//
// ─── HOST ──────────────────────────────────────────────────────────────────────
//

/// Terminal front end: reads commands, drives the countdown and renders.
pub struct Host {
    tutor: Tutor,
    json: bool,
    ticker: Option<TickerGuard>,
    ticks: mpsc::UnboundedSender<TimerTicket>,
    pending: Option<PendingLeave>,
}

enum Flow {
    Continue,
    Finish,
}

#[derive(Debug, PartialEq, Eq)]
enum Event {
    Tick(TimerTicket),
    Line(Option<String>),
}

/// Waits for the next tick or input line. A queued tick is taken first, so
/// an expiry lands before an answer typed in the same instant.
async fn next_event<R: AsyncBufRead + Unpin>(
    lines: &mut Lines<R>,
    ticks: &mut mpsc::UnboundedReceiver<TimerTicket>,
) -> std::io::Result<Event> {
    tokio::select! {
        biased;
        Some(ticket) = ticks.recv() => Ok(Event::Tick(ticket)),
        line = lines.next_line() => line.map(Event::Line),
    }
}

impl Host {
    pub fn new(tutor: Tutor, json: bool, ticks: mpsc::UnboundedSender<TimerTicket>) -> Self {
        Self {
            tutor,
            json,
            ticker: None,
            ticks,
            pending: None,
        }
    }

    /// Runs until `end`, `quit` or end of input, then returns the session report.
    ///
    /// # Errors
    ///
    /// Returns `AppError` for I/O failures or an unusable ledger.
    pub async fn run(
        mut self,
        mut tick_rx: mpsc::UnboundedReceiver<TimerTicket>,
    ) -> Result<SessionSummary, AppError> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        self.show_home()?;

        loop {
            match next_event(&mut lines, &mut tick_rx).await? {
                Event::Tick(ticket) => self.handle_tick(ticket)?,
                Event::Line(None) => {
                    debug!("input closed");
                    break;
                }
                Event::Line(Some(line)) => {
                    if let Flow::Finish = self.handle_line(&line)? {
                        break;
                    }
                }
            }
            self.sync_ticker();
        }

        self.ticker = None;
        let summary = self.tutor.end_session()?;
        self.emit(&summary, render::summary)?;
        Ok(summary)
    }

    fn handle_line(&mut self, line: &str) -> Result<Flow, AppError> {
        if let Some(pending) = self.pending.take() {
            let answer = line.trim().to_lowercase();
            if answer == "y" || answer == "yes" {
                let outcome = match pending {
                    PendingLeave::Home => self.tutor.leave(&AlwaysConfirm).map(|_| None),
                    PendingLeave::Open(kind) => self.tutor.open(kind, &AlwaysConfirm),
                };
                self.report(outcome)?;
                self.show_current()?;
            } else {
                println!("Staying on this page.");
            }
            return Ok(Flow::Continue);
        }

        let input = match Input::parse(line) {
            Ok(Some(input)) => input,
            Ok(None) => return Ok(Flow::Continue),
            Err(err) => {
                println!("{err}");
                return Ok(Flow::Continue);
            }
        };
        debug!(?input, "command");

        match input {
            Input::Home => self.show_home()?,
            Input::Help => print_help(),
            Input::End | Input::Quit => return Ok(Flow::Finish),
            Input::Open(kind) => {
                let asker = AskLater::default();
                let outcome = self.tutor.open(kind, &asker);
                self.navigate(outcome, &asker, PendingLeave::Open(kind))?;
            }
            Input::Back => {
                let asker = AskLater::default();
                let outcome = self.tutor.leave(&asker).map(|_| None);
                self.navigate(outcome, &asker, PendingLeave::Home)?;
            }
            Input::Start(choice) => {
                let Some(kind) = self.tutor.current() else {
                    println!("Open an activity first.");
                    return Ok(Flow::Continue);
                };
                match parse_mode(kind, choice.as_deref()) {
                    Ok(mode) => self.dispatch(ActivityIntent::Start(mode))?,
                    Err(err) => println!("{err}"),
                }
            }
            Input::Angle(raw) => self.dispatch(ActivityIntent::ChooseAngle(raw))?,
            Input::Answer(raw) => self.dispatch(ActivityIntent::Submit(raw))?,
            Input::Reveal => self.dispatch(ActivityIntent::Reveal)?,
            Input::Next => self.dispatch(ActivityIntent::Next)?,
        }
        Ok(Flow::Continue)
    }

    fn navigate(
        &mut self,
        outcome: Result<Option<TimerTicket>, ActivityError>,
        asker: &AskLater,
        pending: PendingLeave,
    ) -> Result<(), AppError> {
        if let Err(ActivityError::NavigationCancelled) = outcome {
            if let Some(request) = asker.asked.get() {
                println!("{} [y/N]", request.message());
                self.pending = Some(pending);
                return Ok(());
            }
        }
        self.report(outcome)?;
        self.show_current()
    }

    fn dispatch(&mut self, intent: ActivityIntent) -> Result<(), AppError> {
        let outcome = self.tutor.dispatch(intent);
        if let Ok(outcome) = &outcome {
            log_outcome(outcome);
        }
        if self.report(outcome)? {
            self.show_current()?;
        }
        Ok(())
    }

    fn handle_tick(&mut self, ticket: TimerTicket) -> Result<(), AppError> {
        match self.tutor.tick_ticket(ticket) {
            Ok(TickOutcome::Expired) => {
                info!(epoch = ticket.epoch(), "countdown expired");
                self.show_current()?;
            }
            Ok(TickOutcome::Running { remaining }) => {
                if !self.json && (remaining % 60 == 0 || remaining <= 10) {
                    println!("  ... {remaining}s left");
                }
            }
            Ok(TickOutcome::Ignored) => debug!(epoch = ticket.epoch(), "stale tick"),
            Err(err) => {
                self.report::<()>(Err(err))?;
            }
        }
        Ok(())
    }

    /// Prints recoverable errors; only an unusable ledger ends the session.
    fn report<T>(&self, outcome: Result<T, ActivityError>) -> Result<bool, AppError> {
        match outcome {
            Ok(_) => Ok(true),
            Err(ActivityError::Ledger(err)) => Err(err.into()),
            Err(ActivityError::Input(err)) => {
                println!("{}", err.prompt());
                Ok(false)
            }
            Err(err) => {
                if !err.is_recoverable() {
                    warn!(error = %err, "activity command failed");
                }
                println!("{err}");
                Ok(false)
            }
        }
    }

    /// Keeps exactly one ticker alive, bound to the running countdown.
    fn sync_ticker(&mut self) {
        let wanted = self
            .tutor
            .current()
            .and_then(|kind| self.tutor.machine(kind).ticket());
        let current = self.ticker.as_ref().map(TickerGuard::ticket);
        if wanted == current {
            return;
        }
        self.ticker = wanted.map(|ticket| TickerGuard::spawn(ticket, TICK_PERIOD, self.ticks.clone()));
    }

    fn show_current(&self) -> Result<(), AppError> {
        match self.tutor.activity_snapshot() {
            Some(snapshot) => self.emit(&snapshot, render::activity),
            None => self.show_home(),
        }
    }

    fn show_home(&self) -> Result<(), AppError> {
        let home = self.tutor.home()?;
        self.emit(&home, render::home)
    }

    fn emit<T: Serialize>(&self, value: &T, text: impl Fn(&T) -> String) -> Result<(), AppError> {
        if self.json {
            println!("{}", serde_json::to_string(value)?);
        } else {
            println!("{}", text(value));
        }
        Ok(())
    }
}

fn log_outcome(outcome: &DispatchOutcome) {
    match outcome {
        DispatchOutcome::Answered(AttemptOutcome::Correct { points }) => {
            info!(points, "answer correct");
        }
        DispatchOutcome::Answered(AttemptOutcome::IncorrectExhausted) => {
            info!("attempts exhausted");
        }
        DispatchOutcome::AngleChosen(AngleChoice::AlreadyCompleted { class }) => {
            debug!(class = class.label(), "angle type already completed");
        }
        DispatchOutcome::Advanced(NextStep::Completed) => info!("activity run complete"),
        _ => {}
    }
}

use serde::{Deserialize, Serialize};
use tracing::debug;

use shapeville_core::model::ActivityKind;

/// Identifies one countdown instance.
///
/// Every `Countdown::start` mints a new ticket. Ticks carrying an older
/// ticket, or one minted by another activity's countdown, are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerTicket {
    activity: ActivityKind,
    epoch: u64,
}

impl TimerTicket {
    #[must_use]
    pub fn activity(self) -> ActivityKind {
        self.activity
    }

    #[must_use]
    pub fn epoch(self) -> u64 {
        self.epoch
    }
}

/// Result of delivering one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickOutcome {
    Running { remaining: u32 },
    Expired,
    Ignored,
}

/// Per-problem countdown, decremented once per tick.
#[derive(Debug, Clone)]
pub struct Countdown {
    owner: ActivityKind,
    epoch: u64,
    remaining: u32,
    running: bool,
}

impl Countdown {
    #[must_use]
    pub fn new(owner: ActivityKind) -> Self {
        Self {
            owner,
            epoch: 0,
            remaining: 0,
            running: false,
        }
    }

    fn current_ticket(&self) -> TimerTicket {
        TimerTicket {
            activity: self.owner,
            epoch: self.epoch,
        }
    }

    /// Starts counting down from `seconds`, replacing any running countdown.
    pub fn start(&mut self, seconds: u32) -> TimerTicket {
        self.epoch += 1;
        self.remaining = seconds;
        self.running = true;
        debug!(activity = %self.owner, epoch = self.epoch, seconds, "countdown started");
        self.current_ticket()
    }

    /// Decrements by one second. Reaching zero stops the countdown.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Ignored;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            debug!(epoch = self.epoch, "countdown expired");
            TickOutcome::Expired
        } else {
            TickOutcome::Running {
                remaining: self.remaining,
            }
        }
    }

    /// Ticks only if `ticket` names the current countdown.
    pub fn tick_ticket(&mut self, ticket: TimerTicket) -> TickOutcome {
        if ticket != self.current_ticket() {
            debug!(
                from = %ticket.activity,
                stale = ticket.epoch,
                current = self.epoch,
                "ignoring stale tick"
            );
            return TickOutcome::Ignored;
        }
        self.tick()
    }

    /// Stops the countdown. Safe to call when already stopped.
    pub fn cancel(&mut self) {
        if self.running {
            debug!(epoch = self.epoch, remaining = self.remaining, "countdown cancelled");
        }
        self.running = false;
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Ticket of the most recent countdown, if one was ever started.
    #[must_use]
    pub fn ticket(&self) -> Option<TimerTicket> {
        (self.epoch > 0).then(|| self.current_ticket())
    }
}

use std::time::Duration;

use services::TimerTicket;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

/// Owns the periodic task feeding one countdown.
///
/// Dropping the guard aborts the task.
#[derive(Debug)]
pub struct TickerGuard {
    ticket: TimerTicket,
    handle: JoinHandle<()>,
}

impl TickerGuard {
    /// Sends `ticket` on `ticks` once per `period`, starting one period from now.
    pub fn spawn(ticket: TimerTicket, period: Duration, ticks: UnboundedSender<TimerTicket>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if ticks.send(ticket).is_err() {
                    break;
                }
            }
        });
        debug!(epoch = ticket.epoch(), "ticker spawned");
        Self { ticket, handle }
    }

    #[must_use]
    pub fn ticket(&self) -> TimerTicket {
        self.ticket
    }
}

impl Drop for TickerGuard {
    fn drop(&mut self) {
        self.handle.abort();
        debug!(epoch = self.ticket.epoch(), "ticker stopped");
    }
}

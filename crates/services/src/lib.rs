#![forbid(unsafe_code)]

pub mod activity;
pub mod countdown;
pub mod error;
pub mod ledger;
pub mod navigation;
pub mod tutor;

pub use shapeville_core::Clock;

pub use activity::{
    ActivityConfig, ActivityIntent, ActivitySnapshot, AngleChoice, Control, DispatchOutcome,
    EnabledControls, Feedback, NextStep, Phase, TaskMachine,
};
pub use countdown::{Countdown, TickOutcome, TimerTicket};
pub use error::{ActivityError, LedgerError, TutorError};
pub use ledger::LedgerHandle;
pub use navigation::{AlwaysConfirm, ConfirmNavigation, Destination, LeaveRequest};
pub use tutor::{ActivityTile, HomeSnapshot, Tutor};

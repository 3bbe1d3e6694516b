mod config;
mod controls;
mod machine;
mod view;

pub use config::{ActivityConfig, CompletionRule};
pub use controls::{Control, EnabledControls, ItemChoice};
pub use machine::{ActivityIntent, AngleChoice, DispatchOutcome, NextStep, Phase, TaskMachine};
pub use view::{ActivitySnapshot, Feedback, FeedbackTone};

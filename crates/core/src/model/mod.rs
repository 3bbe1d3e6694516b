mod activity;
mod attempt;
mod ids;
mod ledger;
mod problem;
mod progress;
mod settings;
mod tiers;

pub use activity::{
    ActivityKind, ActivityMode, AngleClass, CircleMeasure, Dimension, ParseActivityError,
    PolygonFamily,
};
pub use attempt::{AttemptError, AttemptOutcome, AttemptState};
pub use ids::{ItemId, SessionId};
pub use ledger::{LedgerSnapshot, SessionLedger, SessionSummary, Settlement, SettlementRecord};
pub use problem::{CIRCLE_RENDER_SCALE, CorrectAnswer, PolygonShape, Problem, ProblemParams};
pub use progress::ActivityProgress;
pub use settings::{SettingsError, TutorSettings, TutorSettingsDraft};
pub use tiers::{MAX_ATTEMPTS, PointTiers, TierError};

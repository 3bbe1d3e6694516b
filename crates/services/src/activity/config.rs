use shapeville_core::model::{
    ActivityKind, Dimension, PointTiers, ProblemParams, TutorSettings,
};

/// When a settled problem counts toward the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionRule {
    /// Any settlement except an already-completed rejection.
    OnSettle,
    /// Only a correct answer.
    OnCorrect,
}

/// Per-activity parameters of the shared task machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityConfig {
    kind: ActivityKind,
    required: usize,
    time_limit_secs: u32,
    completion: CompletionRule,
}

impl ActivityConfig {
    #[must_use]
    pub fn for_kind(kind: ActivityKind, settings: &TutorSettings) -> Self {
        let required = match kind {
            ActivityKind::ShapeRecognition => settings.shape_run_size(),
            ActivityKind::AngleClassification | ActivityKind::PolygonArea => 4,
            ActivityKind::CircleMeasure => 1,
            ActivityKind::CompositeArea => 6,
            ActivityKind::SectorArea => 8,
        };
        let time_limit_secs = if kind.is_bonus() {
            settings.bonus_time_limit_secs()
        } else {
            settings.time_limit_secs()
        };
        let completion = match kind {
            ActivityKind::ShapeRecognition => CompletionRule::OnSettle,
            _ => CompletionRule::OnCorrect,
        };
        Self {
            kind,
            required,
            time_limit_secs,
            completion,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ActivityKind {
        self.kind
    }

    #[must_use]
    pub fn required(&self) -> usize {
        self.required
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    #[must_use]
    pub fn completion(&self) -> CompletionRule {
        self.completion
    }

    /// Bonus tasks and solid shapes pay double.
    #[must_use]
    pub fn tiers_for(&self, params: &ProblemParams) -> PointTiers {
        match params {
            ProblemParams::Shape(entry) if entry.dimension == Dimension::Three => PointTiers::BONUS,
            ProblemParams::Composite(_) | ProblemParams::Sector(_) => PointTiers::BONUS,
            _ => PointTiers::STANDARD,
        }
    }
}

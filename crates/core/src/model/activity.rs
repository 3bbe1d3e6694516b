use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ACTIVITY KIND ─────────────────────────────────────────────────────────────
//

/// The six learning activities offered by the tutor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    ShapeRecognition,
    AngleClassification,
    PolygonArea,
    CircleMeasure,
    CompositeArea,
    SectorArea,
}

impl ActivityKind {
    /// Every activity, in home-screen order.
    pub const ALL: [ActivityKind; 6] = [
        ActivityKind::ShapeRecognition,
        ActivityKind::AngleClassification,
        ActivityKind::PolygonArea,
        ActivityKind::CircleMeasure,
        ActivityKind::CompositeArea,
        ActivityKind::SectorArea,
    ];

    /// Number of activities that make up 100% progress.
    pub const COUNT: usize = Self::ALL.len();

    /// Stable identifier recorded in the session ledger.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            ActivityKind::ShapeRecognition => "ks1_task1",
            ActivityKind::AngleClassification => "ks1_task2",
            ActivityKind::PolygonArea => "ks2_task3",
            ActivityKind::CircleMeasure => "ks2_task4",
            ActivityKind::CompositeArea => "bonus_task_composite",
            ActivityKind::SectorArea => "bonus_task_sector",
        }
    }

    /// Human-readable title for the activity-selection surface.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            ActivityKind::ShapeRecognition => "KS1 - Shape Recognition",
            ActivityKind::AngleClassification => "KS1 - Angle Type Identification",
            ActivityKind::PolygonArea => "KS2 - Area Calculation",
            ActivityKind::CircleMeasure => "KS2 - Circle Calculation",
            ActivityKind::CompositeArea => "Bonus Task - Composite Figures",
            ActivityKind::SectorArea => "Bonus Task - Sector Calculation",
        }
    }

    /// Bonus tasks are double-weighted and get the longer time limit.
    #[must_use]
    pub fn is_bonus(self) -> bool {
        matches!(self, ActivityKind::CompositeArea | ActivityKind::SectorArea)
    }

    /// Whether entering the activity shows a sub-mode selection first.
    #[must_use]
    pub fn has_sub_modes(self) -> bool {
        !matches!(self, ActivityKind::AngleClassification)
    }

    /// Whether answers are numeric (area/length) rather than labels.
    #[must_use]
    pub fn expects_numeric_answer(self) -> bool {
        !matches!(
            self,
            ActivityKind::ShapeRecognition | ActivityKind::AngleClassification
        )
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when an activity name cannot be recognised.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown activity: {raw}")]
pub struct ParseActivityError {
    raw: String,
}

impl FromStr for ActivityKind {
    type Err = ParseActivityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if let Some(kind) = Self::ALL.into_iter().find(|kind| kind.id() == normalized) {
            return Ok(kind);
        }
        match normalized.as_str() {
            "shapes" | "shape" => Ok(ActivityKind::ShapeRecognition),
            "angles" | "angle" => Ok(ActivityKind::AngleClassification),
            "area" | "polygon" | "polygons" => Ok(ActivityKind::PolygonArea),
            "circle" | "circles" => Ok(ActivityKind::CircleMeasure),
            "composite" => Ok(ActivityKind::CompositeArea),
            "sector" | "sectors" => Ok(ActivityKind::SectorArea),
            _ => Err(ParseActivityError {
                raw: s.to_string(),
            }),
        }
    }
}

//
// ─── SUB-MODES ─────────────────────────────────────────────────────────────────
//

/// Dimension filter for shape recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Two,
    Three,
}

impl Dimension {
    #[must_use]
    pub fn value(self) -> u8 {
        match self {
            Dimension::Two => 2,
            Dimension::Three => 3,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Two => "2D",
            Dimension::Three => "3D",
        }
    }
}

/// Shape families used by the polygon-area activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PolygonFamily {
    Rectangle,
    Parallelogram,
    Triangle,
    Trapezium,
}

impl PolygonFamily {
    pub const ALL: [PolygonFamily; 4] = [
        PolygonFamily::Rectangle,
        PolygonFamily::Parallelogram,
        PolygonFamily::Triangle,
        PolygonFamily::Trapezium,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            PolygonFamily::Rectangle => "Rectangle",
            PolygonFamily::Parallelogram => "Parallelogram",
            PolygonFamily::Triangle => "Triangle",
            PolygonFamily::Trapezium => "Trapezium",
        }
    }

    /// Finds a family by case-insensitive name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|family| family.name().eq_ignore_ascii_case(name))
    }
}

/// What the circle activity asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CircleMeasure {
    Area,
    Circumference,
}

impl CircleMeasure {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            CircleMeasure::Area => "area",
            CircleMeasure::Circumference => "circumference",
        }
    }
}

/// Angle classification by fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AngleClass {
    Acute,
    Right,
    Obtuse,
    Reflex,
}

impl AngleClass {
    pub const ALL: [AngleClass; 4] = [
        AngleClass::Acute,
        AngleClass::Right,
        AngleClass::Obtuse,
        AngleClass::Reflex,
    ];

    /// `<90` acute, `==90` right, `<180` obtuse, anything else reflex.
    #[must_use]
    pub fn classify(degrees: u16) -> Self {
        if degrees < 90 {
            AngleClass::Acute
        } else if degrees == 90 {
            AngleClass::Right
        } else if degrees < 180 {
            AngleClass::Obtuse
        } else {
            AngleClass::Reflex
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AngleClass::Acute => "Acute",
            AngleClass::Right => "Right",
            AngleClass::Obtuse => "Obtuse",
            AngleClass::Reflex => "Reflex",
        }
    }
}

//
// ─── ACTIVITY MODE ─────────────────────────────────────────────────────────────
//

/// Sub-mode chosen when starting an activity.
///
/// Variants carrying an `Option` may pin a specific item (a figure the user
/// clicked); `None` lets the generator pick an unused one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityMode {
    Shapes(Dimension),
    Angles(Option<u16>),
    Polygon(Option<PolygonFamily>),
    Circle(CircleMeasure),
    Composite(Option<u8>),
    Sector(Option<u8>),
}

impl ActivityMode {
    #[must_use]
    pub fn kind(&self) -> ActivityKind {
        match self {
            ActivityMode::Shapes(_) => ActivityKind::ShapeRecognition,
            ActivityMode::Angles(_) => ActivityKind::AngleClassification,
            ActivityMode::Polygon(_) => ActivityKind::PolygonArea,
            ActivityMode::Circle(_) => ActivityKind::CircleMeasure,
            ActivityMode::Composite(_) => ActivityKind::CompositeArea,
            ActivityMode::Sector(_) => ActivityKind::SectorArea,
        }
    }

    /// The same mode with any pinned item released, used when advancing.
    #[must_use]
    pub fn unpinned(self) -> Self {
        match self {
            ActivityMode::Angles(_) => ActivityMode::Angles(None),
            ActivityMode::Polygon(_) => ActivityMode::Polygon(None),
            ActivityMode::Composite(_) => ActivityMode::Composite(None),
            ActivityMode::Sector(_) => ActivityMode::Sector(None),
            other => other,
        }
    }

    /// Choosing a shape dimension always plans a new run.
    #[must_use]
    pub fn starts_fresh_run(&self) -> bool {
        matches!(self, ActivityMode::Shapes(_))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

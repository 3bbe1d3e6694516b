use std::f64::consts::PI;

use crate::catalog::{CatalogShape, CompositeFigure, SECTOR_PI, SectorSpec};
use crate::model::ids::ItemId;
use crate::model::tiers::{MAX_ATTEMPTS, PointTiers};
use crate::model::{ActivityKind, AngleClass, CircleMeasure, Dimension, PolygonFamily};
use crate::validator::{self, InputError};

/// Circles are drawn at four times their nominal radius.
pub const CIRCLE_RENDER_SCALE: u32 = 4;

//
// ─── POLYGONS ──────────────────────────────────────────────────────────────────
//

/// Dimensions of one polygon-area problem, in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonShape {
    Rectangle { length: u32, width: u32 },
    Parallelogram { base: u32, height: u32 },
    Triangle { base: u32, height: u32 },
    Trapezium { upper: u32, lower: u32, height: u32 },
}

impl PolygonShape {
    #[must_use]
    pub fn family(&self) -> PolygonFamily {
        match self {
            PolygonShape::Rectangle { .. } => PolygonFamily::Rectangle,
            PolygonShape::Parallelogram { .. } => PolygonFamily::Parallelogram,
            PolygonShape::Triangle { .. } => PolygonFamily::Triangle,
            PolygonShape::Trapezium { .. } => PolygonFamily::Trapezium,
        }
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        match *self {
            PolygonShape::Rectangle { length, width } => f64::from(length) * f64::from(width),
            PolygonShape::Parallelogram { base, height } => f64::from(base) * f64::from(height),
            PolygonShape::Triangle { base, height } => f64::from(base) * f64::from(height) / 2.0,
            PolygonShape::Trapezium {
                upper,
                lower,
                height,
            } => (f64::from(upper) + f64::from(lower)) / 2.0 * f64::from(height),
        }
    }

    fn describe(&self) -> String {
        match self {
            PolygonShape::Rectangle { length, width } => {
                format!("Rectangle: length = {length} cm, width = {width} cm")
            }
            PolygonShape::Parallelogram { base, height } => {
                format!("Parallelogram: base = {base} cm, height = {height} cm")
            }
            PolygonShape::Triangle { base, height } => {
                format!("Triangle: base = {base} cm, height = {height} cm")
            }
            PolygonShape::Trapezium {
                upper,
                lower,
                height,
            } => format!(
                "Trapezium: upper base a = {upper} cm, lower base b = {lower} cm, height h = {height} cm"
            ),
        }
    }

    fn formula(&self) -> String {
        let area = self.area();
        match self {
            PolygonShape::Rectangle { length, width } => {
                format!("Area = length × width = {length} × {width} = {area:.2} cm²")
            }
            PolygonShape::Parallelogram { base, height } => {
                format!("Area = base × height = {base} × {height} = {area:.2} cm²")
            }
            PolygonShape::Triangle { base, height } => {
                format!("Area = (base × height) ÷ 2 = ({base} × {height}) ÷ 2 = {area:.2} cm²")
            }
            PolygonShape::Trapezium {
                upper,
                lower,
                height,
            } => format!(
                "Area = ((a + b) ÷ 2) × h = (({upper} + {lower}) ÷ 2) × {height} = {area:.2} cm²"
            ),
        }
    }
}

//
// ─── PARAMETERS ────────────────────────────────────────────────────────────────
//

/// Generator-specific values of one problem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProblemParams {
    Shape(&'static CatalogShape),
    Angle { degrees: u16 },
    Polygon(PolygonShape),
    Circle { radius: u32, measure: CircleMeasure },
    Composite(&'static CompositeFigure),
    Sector(&'static SectorSpec),
}

impl ProblemParams {
    #[must_use]
    pub fn kind(&self) -> ActivityKind {
        match self {
            ProblemParams::Shape(_) => ActivityKind::ShapeRecognition,
            ProblemParams::Angle { .. } => ActivityKind::AngleClassification,
            ProblemParams::Polygon(_) => ActivityKind::PolygonArea,
            ProblemParams::Circle { .. } => ActivityKind::CircleMeasure,
            ProblemParams::Composite(_) => ActivityKind::CompositeArea,
            ProblemParams::Sector(_) => ActivityKind::SectorArea,
        }
    }

    /// The progress item this problem completes when solved.
    #[must_use]
    pub fn item(&self) -> ItemId {
        match self {
            ProblemParams::Shape(entry) => ItemId::new(entry.name),
            ProblemParams::Angle { degrees } => ItemId::new(AngleClass::classify(*degrees).label()),
            ProblemParams::Polygon(shape) => ItemId::new(shape.family().name()),
            ProblemParams::Circle { measure, .. } => ItemId::new(measure.name()),
            ProblemParams::Composite(figure) => ItemId::number(figure.id),
            ProblemParams::Sector(spec) => ItemId::number(spec.id),
        }
    }

    fn correct_answer(&self) -> CorrectAnswer {
        match self {
            ProblemParams::Shape(entry) => CorrectAnswer::Label(entry.name.to_string()),
            ProblemParams::Angle { degrees } => {
                CorrectAnswer::Label(AngleClass::classify(*degrees).label().to_string())
            }
            ProblemParams::Polygon(shape) => CorrectAnswer::Numeric(shape.area()),
            ProblemParams::Circle { radius, measure } => {
                let r = f64::from(*radius);
                CorrectAnswer::Numeric(match measure {
                    CircleMeasure::Area => PI * r * r,
                    CircleMeasure::Circumference => 2.0 * PI * r,
                })
            }
            ProblemParams::Composite(figure) => CorrectAnswer::Numeric(figure.area()),
            ProblemParams::Sector(spec) => CorrectAnswer::Numeric(spec.area()),
        }
    }
}

/// The value a submission is checked against.
#[derive(Debug, Clone, PartialEq)]
pub enum CorrectAnswer {
    Numeric(f64),
    Label(String),
}

impl CorrectAnswer {
    /// Checks a raw submission against this answer.
    ///
    /// # Errors
    ///
    /// Returns `InputError::InvalidNumeric` when a number is required and `raw` is not one.
    pub fn accepts(&self, raw: &str) -> Result<bool, InputError> {
        match self {
            CorrectAnswer::Numeric(expected) => {
                let value = validator::parse_numeric(raw)?;
                Ok(validator::numeric_matches(value, *expected))
            }
            CorrectAnswer::Label(expected) => Ok(validator::label_matches(raw, expected)),
        }
    }
}

//
// ─── PROBLEM ───────────────────────────────────────────────────────────────────
//

/// One question instance within an activity.
///
/// Immutable once created; attempt counting lives in `AttemptState`.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    params: ProblemParams,
    correct: CorrectAnswer,
    item: ItemId,
    tiers: PointTiers,
    time_limit_secs: u32,
}

impl Problem {
    #[must_use]
    pub fn new(params: ProblemParams, tiers: PointTiers, time_limit_secs: u32) -> Self {
        Self {
            correct: params.correct_answer(),
            item: params.item(),
            params,
            tiers,
            time_limit_secs,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ActivityKind {
        self.params.kind()
    }

    #[must_use]
    pub fn params(&self) -> &ProblemParams {
        &self.params
    }

    #[must_use]
    pub fn correct_answer(&self) -> &CorrectAnswer {
        &self.correct
    }

    #[must_use]
    pub fn item(&self) -> &ItemId {
        &self.item
    }

    #[must_use]
    pub fn tiers(&self) -> PointTiers {
        self.tiers
    }

    #[must_use]
    pub fn max_attempts(&self) -> u8 {
        MAX_ATTEMPTS
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    /// Checks a raw submission.
    ///
    /// # Errors
    ///
    /// Returns `InputError` when the text cannot be interpreted.
    pub fn check(&self, raw: &str) -> Result<bool, InputError> {
        self.correct.accepts(raw)
    }

    /// Angle class for angle problems.
    #[must_use]
    pub fn angle_class(&self) -> Option<AngleClass> {
        match self.params {
            ProblemParams::Angle { degrees } => Some(AngleClass::classify(degrees)),
            _ => None,
        }
    }

    /// Radius in render units for circle problems.
    #[must_use]
    pub fn display_radius(&self) -> Option<u32> {
        match self.params {
            ProblemParams::Circle { radius, .. } => Some(radius * CIRCLE_RENDER_SCALE),
            _ => None,
        }
    }

    /// Question text shown to the learner.
    #[must_use]
    pub fn prompt(&self) -> String {
        match &self.params {
            ProblemParams::Shape(entry) => entry.description.to_string(),
            ProblemParams::Angle { degrees } => {
                format!("What type of angle is {degrees}°?")
            }
            ProblemParams::Polygon(shape) => shape.describe(),
            ProblemParams::Circle { radius, measure } => match measure {
                CircleMeasure::Area => {
                    format!("Calculate the area of the circle: radius = {radius} cm")
                }
                CircleMeasure::Circumference => format!(
                    "Calculate the arc length (circumference) of the circle: radius = {radius} cm"
                ),
            },
            ProblemParams::Composite(figure) => {
                format!("Calculate the area of figure {}: {}", figure.id, figure.description)
            }
            ProblemParams::Sector(spec) => format!(
                "Sector {}: R={:.1}, Angle={:.0}°. Calculate Area:",
                spec.id, spec.radius, spec.angle_degrees
            ),
        }
    }

    /// Correct answer or worked formula revealed after settlement.
    #[must_use]
    pub fn solution(&self) -> String {
        match &self.params {
            ProblemParams::Shape(entry) => format!("The correct answer is: {}", entry.name),
            ProblemParams::Angle { degrees } => format!(
                "The correct answer was: {}",
                AngleClass::classify(*degrees).label()
            ),
            ProblemParams::Polygon(shape) => shape.formula(),
            ProblemParams::Circle { radius, measure } => {
                let value = self.numeric_answer();
                match measure {
                    CircleMeasure::Area => format!("Area = π×r² = π×{radius}² = {value:.2} cm²"),
                    CircleMeasure::Circumference => {
                        format!("Arc Length = 2πr = 2π×{radius} = {value:.2} cm")
                    }
                }
            }
            ProblemParams::Composite(figure) => {
                format!("Correct area: {:.2}", figure.area())
            }
            ProblemParams::Sector(spec) => format!(
                "Area = π×r²×(θ/360) = {SECTOR_PI}×{:.1}²×({:.0}/360) = {:.2}",
                spec.radius,
                spec.angle_degrees,
                spec.area()
            ),
        }
    }

    /// Key the renderer resolves to an image; never loaded here.
    #[must_use]
    pub fn asset_key(&self) -> String {
        match &self.params {
            ProblemParams::Shape(entry) => {
                let prefix = match entry.dimension {
                    Dimension::Two => "shape2D",
                    Dimension::Three => "shape3D",
                };
                format!("{prefix}/{}", slug(entry.name))
            }
            ProblemParams::Angle { degrees } => format!("angle/{degrees}"),
            ProblemParams::Polygon(shape) => {
                format!("polygon/{}", shape.family().name().to_lowercase())
            }
            ProblemParams::Circle { measure, .. } => format!("circle/{}", measure.name()),
            ProblemParams::Composite(figure) => format!("composite/{}", figure.id),
            ProblemParams::Sector(spec) => format!("sector/{}", spec.id),
        }
    }

    fn numeric_answer(&self) -> f64 {
        match self.correct {
            CorrectAnswer::Numeric(value) => value,
            CorrectAnswer::Label(_) => 0.0,
        }
    }
}

fn slug(name: &str) -> String {
    name.replace(" - ", "-").replace(' ', "_")
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

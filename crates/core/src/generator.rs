//! Random problem generation for every activity.
//!
//! The generator never consults progress on its own: callers pass the set of
//! items already completed in the current run and get back parameters for an
//! item outside that set.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::debug;

use crate::catalog::{
    self, COMPOSITE_IDS, CatalogShape, SECTOR_IDS, SHAPES, composite_figure, sector_spec,
};
use crate::model::{
    ActivityKind, ActivityMode, AngleClass, CircleMeasure, Dimension, ItemId, PolygonFamily,
    PolygonShape, ProblemParams, TutorSettings,
};

/// Polygon side lengths and heights, in centimetres.
const POLYGON_DIMENSION_RANGE: std::ops::RangeInclusive<u32> = 2..=20;
const TRAPEZIUM_UPPER_RANGE: std::ops::RangeInclusive<u32> = 2..=11;
const CIRCLE_RADIUS_RANGE: std::ops::RangeInclusive<u32> = 2..=20;
const ANGLE_STEP: u16 = 10;
const ANGLE_MAX: u16 = 360;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("every {activity} item has been completed")]
    PoolExhausted { activity: ActivityKind },

    #[error("{activity} has no item {item:?}")]
    UnknownItem { activity: ActivityKind, item: String },

    #[error("{item} has already been completed")]
    DuplicateCompletedItem { item: ItemId },
}

/// RNG-backed generator. One instance per activity.
#[derive(Debug)]
pub struct ContentGenerator {
    rng: StdRng,
    run_size: usize,
    draw_cap: usize,
    shape_run: Vec<&'static CatalogShape>,
}

impl ContentGenerator {
    /// Seeds from `settings` when a seed is configured, otherwise from the OS.
    #[must_use]
    pub fn new(settings: &TutorSettings) -> Self {
        let rng = match settings.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(rng, settings)
    }

    #[must_use]
    pub fn seeded(seed: u64, settings: &TutorSettings) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), settings)
    }

    fn with_rng(rng: StdRng, settings: &TutorSettings) -> Self {
        Self {
            rng,
            run_size: settings.shape_run_size(),
            draw_cap: settings.shape_draw_cap(),
            shape_run: Vec::new(),
        }
    }

    /// Plans a new recognition run of distinct shapes of one dimension.
    ///
    /// Draws at most `draw_cap` random catalog entries keeping unseen ones of
    /// the requested dimension, shuffles and truncates to the run size. A
    /// short draw is topped up from the unused entries so the run is always full.
    pub fn plan_shape_run(&mut self, dimension: Dimension) -> &[&'static CatalogShape] {
        let mut run: Vec<&'static CatalogShape> = Vec::with_capacity(self.run_size);
        for _ in 0..self.draw_cap {
            if run.len() == self.run_size {
                break;
            }
            let Some(entry) = SHAPES.choose(&mut self.rng) else {
                break;
            };
            if entry.dimension == dimension && !run.iter().any(|seen| seen.name == entry.name) {
                run.push(entry);
            }
        }

        if run.len() < self.run_size {
            let mut rest: Vec<&'static CatalogShape> = catalog::shapes_of(dimension)
                .filter(|entry| !run.iter().any(|seen| seen.name == entry.name))
                .collect();
            rest.shuffle(&mut self.rng);
            debug!(
                drawn = run.len(),
                topped_up = self.run_size.saturating_sub(run.len()),
                "shape draw fell short"
            );
            run.extend(rest.into_iter().take(self.run_size - run.len()));
        }

        run.shuffle(&mut self.rng);
        run.truncate(self.run_size);
        debug!(dimension = dimension.value(), shapes = run.len(), "planned shape run");
        self.shape_run = run;
        &self.shape_run
    }

    /// Produces parameters for one problem outside `excluded`.
    ///
    /// # Errors
    ///
    /// - `DuplicateCompletedItem` if `mode` pins an item that is in `excluded`.
    /// - `UnknownItem` if `mode` pins a figure or sector that does not exist.
    /// - `PoolExhausted` if every item has been completed.
    pub fn generate(
        &mut self,
        mode: ActivityMode,
        excluded: &BTreeSet<ItemId>,
    ) -> Result<ProblemParams, GenerationError> {
        match mode {
            ActivityMode::Shapes(dimension) => self.next_shape(dimension, excluded),
            ActivityMode::Angles(pinned) => self.angle(pinned, excluded),
            ActivityMode::Polygon(pinned) => self.polygon(pinned, excluded),
            ActivityMode::Circle(measure) => self.circle(measure, excluded),
            ActivityMode::Composite(pinned) => {
                let id = self.numbered(ActivityKind::CompositeArea, &COMPOSITE_IDS, pinned, excluded)?;
                composite_figure(id)
                    .map(ProblemParams::Composite)
                    .ok_or_else(|| unknown(ActivityKind::CompositeArea, id))
            }
            ActivityMode::Sector(pinned) => {
                let id = self.numbered(ActivityKind::SectorArea, &SECTOR_IDS, pinned, excluded)?;
                sector_spec(id)
                    .map(ProblemParams::Sector)
                    .ok_or_else(|| unknown(ActivityKind::SectorArea, id))
            }
        }
    }

    fn next_shape(
        &mut self,
        dimension: Dimension,
        excluded: &BTreeSet<ItemId>,
    ) -> Result<ProblemParams, GenerationError> {
        let planned_for_other = self
            .shape_run
            .first()
            .is_some_and(|entry| entry.dimension != dimension);
        if self.shape_run.is_empty() || planned_for_other {
            self.plan_shape_run(dimension);
        }
        self.shape_run
            .iter()
            .find(|entry| !excluded.contains(&ItemId::new(entry.name)))
            .map(|entry| ProblemParams::Shape(*entry))
            .ok_or(GenerationError::PoolExhausted {
                activity: ActivityKind::ShapeRecognition,
            })
    }

    fn angle(
        &mut self,
        pinned: Option<u16>,
        excluded: &BTreeSet<ItemId>,
    ) -> Result<ProblemParams, GenerationError> {
        let is_done = |degrees: u16| {
            excluded.contains(&ItemId::new(AngleClass::classify(degrees).label()))
        };
        if let Some(degrees) = pinned {
            if is_done(degrees) {
                return Err(GenerationError::DuplicateCompletedItem {
                    item: ItemId::new(AngleClass::classify(degrees).label()),
                });
            }
            return Ok(ProblemParams::Angle { degrees });
        }

        let candidates: Vec<u16> = (0..=ANGLE_MAX)
            .step_by(usize::from(ANGLE_STEP))
            .filter(|degrees| !is_done(*degrees))
            .collect();
        candidates
            .choose(&mut self.rng)
            .map(|degrees| ProblemParams::Angle { degrees: *degrees })
            .ok_or(GenerationError::PoolExhausted {
                activity: ActivityKind::AngleClassification,
            })
    }

    fn polygon(
        &mut self,
        pinned: Option<PolygonFamily>,
        excluded: &BTreeSet<ItemId>,
    ) -> Result<ProblemParams, GenerationError> {
        let family = match pinned {
            Some(family) if excluded.contains(&ItemId::new(family.name())) => {
                return Err(GenerationError::DuplicateCompletedItem {
                    item: ItemId::new(family.name()),
                });
            }
            Some(family) => family,
            None => {
                let open: Vec<PolygonFamily> = PolygonFamily::ALL
                    .into_iter()
                    .filter(|family| !excluded.contains(&ItemId::new(family.name())))
                    .collect();
                *open.choose(&mut self.rng).ok_or(GenerationError::PoolExhausted {
                    activity: ActivityKind::PolygonArea,
                })?
            }
        };

        let shape = match family {
            PolygonFamily::Rectangle => PolygonShape::Rectangle {
                length: self.rng.random_range(POLYGON_DIMENSION_RANGE),
                width: self.rng.random_range(POLYGON_DIMENSION_RANGE),
            },
            PolygonFamily::Parallelogram => PolygonShape::Parallelogram {
                base: self.rng.random_range(POLYGON_DIMENSION_RANGE),
                height: self.rng.random_range(POLYGON_DIMENSION_RANGE),
            },
            PolygonFamily::Triangle => PolygonShape::Triangle {
                base: self.rng.random_range(POLYGON_DIMENSION_RANGE),
                height: self.rng.random_range(POLYGON_DIMENSION_RANGE),
            },
            PolygonFamily::Trapezium => {
                let upper = self.rng.random_range(TRAPEZIUM_UPPER_RANGE);
                PolygonShape::Trapezium {
                    upper,
                    lower: self.rng.random_range(upper + 1..=upper + 10),
                    height: self.rng.random_range(POLYGON_DIMENSION_RANGE),
                }
            }
        };
        Ok(ProblemParams::Polygon(shape))
    }

    fn circle(
        &mut self,
        measure: CircleMeasure,
        excluded: &BTreeSet<ItemId>,
    ) -> Result<ProblemParams, GenerationError> {
        let item = ItemId::new(measure.name());
        if excluded.contains(&item) {
            return Err(GenerationError::DuplicateCompletedItem { item });
        }
        Ok(ProblemParams::Circle {
            radius: self.rng.random_range(CIRCLE_RADIUS_RANGE),
            measure,
        })
    }

    fn numbered(
        &mut self,
        activity: ActivityKind,
        pool: &[u8],
        pinned: Option<u8>,
        excluded: &BTreeSet<ItemId>,
    ) -> Result<u8, GenerationError> {
        if let Some(id) = pinned {
            if !pool.contains(&id) {
                return Err(unknown(activity, id));
            }
            let item = ItemId::number(id);
            if excluded.contains(&item) {
                return Err(GenerationError::DuplicateCompletedItem { item });
            }
            return Ok(id);
        }
        let open: Vec<u8> = pool
            .iter()
            .copied()
            .filter(|id| !excluded.contains(&ItemId::number(*id)))
            .collect();
        open.choose(&mut self.rng)
            .copied()
            .ok_or(GenerationError::PoolExhausted { activity })
    }
}

fn unknown(activity: ActivityKind, id: u8) -> GenerationError {
    GenerationError::UnknownItem {
        activity,
        item: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(seed: u64) -> ContentGenerator {
        ContentGenerator::seeded(seed, &TutorSettings::default())
    }

    fn excluded(items: &[&str]) -> BTreeSet<ItemId> {
        items.iter().map(|item| ItemId::new(*item)).collect()
    }

    #[test]
    fn shape_runs_hold_distinct_shapes_of_one_dimension() {
        for seed in 0..20 {
            let mut generator = generator(seed);
            for dimension in [Dimension::Two, Dimension::Three] {
                let run = generator.plan_shape_run(dimension).to_vec();
                assert_eq!(run.len(), 4);
                assert!(run.iter().all(|entry| entry.dimension == dimension));
                let names: BTreeSet<&str> = run.iter().map(|entry| entry.name).collect();
                assert_eq!(names.len(), 4);
            }
        }
    }

    #[test]
    fn short_draws_are_topped_up() {
        let settings = TutorSettings::new(180, 300, 4, 4, None).unwrap();
        let mut generator = ContentGenerator::seeded(3, &settings);
        assert_eq!(generator.plan_shape_run(Dimension::Three).len(), 4);
    }

    #[test]
    fn next_shape_skips_completed_entries() {
        let mut generator = generator(1);
        let run: Vec<&str> = generator
            .plan_shape_run(Dimension::Two)
            .iter()
            .map(|entry| entry.name)
            .collect();
        let done = excluded(&run[..2]);
        let params = generator
            .generate(ActivityMode::Shapes(Dimension::Two), &done)
            .unwrap();
        assert_eq!(params, ProblemParams::Shape(catalog::find_shape(run[2]).unwrap()));

        let all = excluded(&run);
        assert_eq!(
            generator.generate(ActivityMode::Shapes(Dimension::Two), &all),
            Err(GenerationError::PoolExhausted {
                activity: ActivityKind::ShapeRecognition
            })
        );
    }

    #[test]
    fn angles_are_multiples_of_ten_outside_completed_types() {
        let mut generator = generator(7);
        let done = excluded(&["Acute", "Obtuse", "Reflex"]);
        for _ in 0..20 {
            let params = generator.generate(ActivityMode::Angles(None), &done).unwrap();
            assert_eq!(params, ProblemParams::Angle { degrees: 90 });
        }

        let fresh = BTreeSet::new();
        for _ in 0..50 {
            let ProblemParams::Angle { degrees } =
                generator.generate(ActivityMode::Angles(None), &fresh).unwrap()
            else {
                panic!("expected an angle");
            };
            assert_eq!(degrees % 10, 0);
            assert!(degrees <= 360);
        }
    }

    #[test]
    fn pinned_angle_of_completed_type_is_a_duplicate() {
        let mut generator = generator(7);
        assert_eq!(
            generator.generate(ActivityMode::Angles(Some(40)), &excluded(&["Acute"])),
            Err(GenerationError::DuplicateCompletedItem {
                item: ItemId::new("Acute")
            })
        );
    }

    #[test]
    fn polygon_dimensions_stay_in_range() {
        let mut generator = generator(11);
        let fresh = BTreeSet::new();
        for _ in 0..100 {
            let ProblemParams::Polygon(shape) = generator
                .generate(ActivityMode::Polygon(Some(PolygonFamily::Trapezium)), &fresh)
                .unwrap()
            else {
                panic!("expected a polygon");
            };
            let PolygonShape::Trapezium {
                upper,
                lower,
                height,
            } = shape
            else {
                panic!("expected a trapezium");
            };
            assert!((2..=11).contains(&upper));
            assert!(lower > upper && lower <= upper + 10);
            assert!((2..=20).contains(&height));
        }
    }

    #[test]
    fn unpinned_polygon_picks_an_open_family() {
        let mut generator = generator(5);
        let done = excluded(&["Rectangle", "Triangle", "Trapezium"]);
        let params = generator.generate(ActivityMode::Polygon(None), &done).unwrap();
        let ProblemParams::Polygon(shape) = params else {
            panic!("expected a polygon");
        };
        assert_eq!(shape.family(), PolygonFamily::Parallelogram);
    }

    #[test]
    fn numbered_pools_report_unknown_and_duplicate_items() {
        let mut generator = generator(2);
        assert_eq!(
            generator.generate(ActivityMode::Composite(Some(7)), &BTreeSet::new()),
            Err(GenerationError::UnknownItem {
                activity: ActivityKind::CompositeArea,
                item: "7".to_string()
            })
        );
        assert_eq!(
            generator.generate(ActivityMode::Sector(Some(3)), &excluded(&["3"])),
            Err(GenerationError::DuplicateCompletedItem {
                item: ItemId::number(3)
            })
        );
    }

    #[test]
    fn exhausted_sector_pool_is_reported() {
        let mut generator = generator(2);
        let all: BTreeSet<ItemId> = SECTOR_IDS.iter().map(|id| ItemId::number(*id)).collect();
        assert_eq!(
            generator.generate(ActivityMode::Sector(None), &all),
            Err(GenerationError::PoolExhausted {
                activity: ActivityKind::SectorArea
            })
        );
    }

    #[test]
    fn same_seed_same_problems() {
        let mut a = generator(42);
        let mut b = generator(42);
        let fresh = BTreeSet::new();
        for _ in 0..10 {
            assert_eq!(
                a.generate(ActivityMode::Circle(CircleMeasure::Area), &fresh),
                b.generate(ActivityMode::Circle(CircleMeasure::Area), &fresh)
            );
        }
    }
}

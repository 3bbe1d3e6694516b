//! Fixed content tables: the shape catalog and the pre-baked composite
//! figures and sectors used by the bonus tasks.

use crate::model::Dimension;

//
// ─── SHAPE CATALOG ─────────────────────────────────────────────────────────────
//

/// One entry of the shape-recognition catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogShape {
    pub name: &'static str,
    pub description: &'static str,
    pub dimension: Dimension,
}

const fn shape(name: &'static str, description: &'static str, dimension: Dimension) -> CatalogShape {
    CatalogShape {
        name,
        description,
        dimension,
    }
}

/// 11 two-dimensional and 8 three-dimensional shapes.
pub static SHAPES: [CatalogShape; 19] = [
    shape("circle", "A round shape with no corners", Dimension::Two),
    shape(
        "rectangle",
        "A shape with 4 sides and 4 right angles, opposite sides are equal",
        Dimension::Two,
    ),
    shape("triangle", "A shape with 3 sides and 3 angles", Dimension::Two),
    shape("oval", "An elongated round shape", Dimension::Two),
    shape("octagon", "A shape with 8 sides", Dimension::Two),
    shape(
        "square",
        "A shape with 4 equal sides and 4 right angles",
        Dimension::Two,
    ),
    shape("heptagon", "A shape with 7 sides", Dimension::Two),
    shape(
        "rhombus",
        "A shape with 4 equal sides, opposite angles equal",
        Dimension::Two,
    ),
    shape("pentagon", "A shape with 5 sides", Dimension::Two),
    shape("hexagon", "A shape with 6 sides", Dimension::Two),
    shape(
        "kite",
        "A shape with two distinct pairs of adjacent sides equal",
        Dimension::Two,
    ),
    shape("cube", "A 3D shape with 6 equal square faces", Dimension::Three),
    shape("cuboid", "A 3D shape with 6 rectangular faces", Dimension::Three),
    shape(
        "cylinder",
        "A 3D shape with two circular bases and a curved surface",
        Dimension::Three,
    ),
    shape(
        "sphere",
        "A perfectly round 3D shape like a ball",
        Dimension::Three,
    ),
    shape(
        "cone",
        "A 3D shape with a circular base and a pointed top",
        Dimension::Three,
    ),
    shape(
        "triangular prism",
        "A 3D shape with triangular ends and rectangular faces",
        Dimension::Three,
    ),
    shape(
        "square - based pyramid",
        "A 3D shape with a square base and triangular faces meeting at a point",
        Dimension::Three,
    ),
    shape(
        "tetrahedron",
        "A 3D shape with 4 triangular faces",
        Dimension::Three,
    ),
];

/// Catalog entries of one dimension, in catalog order.
pub fn shapes_of(dimension: Dimension) -> impl Iterator<Item = &'static CatalogShape> {
    SHAPES.iter().filter(move |entry| entry.dimension == dimension)
}

/// Looks a shape up by exact catalog name.
#[must_use]
pub fn find_shape(name: &str) -> Option<&'static CatalogShape> {
    SHAPES.iter().find(|entry| entry.name == name)
}

//
// ─── COMPOSITE FIGURES ─────────────────────────────────────────────────────────
//

/// A component of a composite figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FigurePart {
    Rectangle { width: f64, height: f64 },
    Square { side: f64 },
    Triangle { base: f64, height: f64 },
}

impl FigurePart {
    #[must_use]
    pub fn area(&self) -> f64 {
        match *self {
            FigurePart::Rectangle { width, height } => width * height,
            FigurePart::Square { side } => side * side,
            FigurePart::Triangle { base, height } => (base * height) / 2.0,
        }
    }
}

/// A pre-baked composite figure; its area is the sum of its parts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeFigure {
    pub id: u8,
    pub description: &'static str,
    pub parts: &'static [FigurePart],
}

impl CompositeFigure {
    #[must_use]
    pub fn area(&self) -> f64 {
        self.parts.iter().map(FigurePart::area).sum()
    }
}

pub static COMPOSITE_FIGURES: [CompositeFigure; 6] = [
    CompositeFigure {
        id: 2,
        description: "Rectangle and square combination",
        parts: &[
            FigurePart::Rectangle {
                width: 20.0,
                height: 10.0,
            },
            FigurePart::Square { side: 11.0 },
        ],
    },
    CompositeFigure {
        id: 3,
        description: "Square with a rectangular extension",
        parts: &[
            FigurePart::Square { side: 16.0 },
            FigurePart::Rectangle {
                width: 18.0,
                height: 19.0,
            },
        ],
    },
    CompositeFigure {
        id: 4,
        description: "Multiple rectangle combination",
        parts: &[
            FigurePart::Rectangle {
                width: 24.0,
                height: 6.0,
            },
            FigurePart::Square { side: 12.0 },
        ],
    },
    CompositeFigure {
        id: 5,
        description: "Rectangle and triangle",
        parts: &[
            FigurePart::Rectangle {
                width: 4.0,
                height: 3.0,
            },
            FigurePart::Triangle {
                base: 4.0,
                height: 3.0,
            },
        ],
    },
    CompositeFigure {
        id: 8,
        description: "Large rectangle joined to a square",
        parts: &[
            FigurePart::Rectangle {
                width: 60.0,
                height: 36.0,
            },
            FigurePart::Square { side: 36.0 },
        ],
    },
    CompositeFigure {
        id: 9,
        description: "Rectangle and square",
        parts: &[
            FigurePart::Rectangle {
                width: 11.0,
                height: 10.0,
            },
            FigurePart::Square { side: 8.0 },
        ],
    },
];

/// Ids of the composite-figure pool, in display order.
pub const COMPOSITE_IDS: [u8; 6] = [2, 3, 4, 5, 8, 9];

#[must_use]
pub fn composite_figure(id: u8) -> Option<&'static CompositeFigure> {
    COMPOSITE_FIGURES.iter().find(|figure| figure.id == id)
}

//
// ─── SECTORS ───────────────────────────────────────────────────────────────────
//

/// The π approximation the sector worksheet was authored with.
///
/// Sector answers are checked against areas computed with this constant so
/// that answers worked out by hand with 3.14 stay within tolerance.
pub const SECTOR_PI: f64 = 3.14;

/// A pre-baked sector: radius and central angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorSpec {
    pub id: u8,
    pub radius: f64,
    pub angle_degrees: f64,
}

impl SectorSpec {
    /// `3.14 · r² · (θ / 360)`.
    #[must_use]
    pub fn area(&self) -> f64 {
        SECTOR_PI * self.radius * self.radius * (self.angle_degrees / 360.0)
    }
}

const fn sector(id: u8, radius: f64, angle_degrees: f64) -> SectorSpec {
    SectorSpec {
        id,
        radius,
        angle_degrees,
    }
}

pub static SECTORS: [SectorSpec; 8] = [
    sector(1, 8.0, 90.0),
    sector(2, 18.0, 130.0),
    sector(3, 19.0, 240.0),
    sector(4, 22.0, 110.0),
    sector(5, 3.5, 100.0),
    sector(6, 8.0, 270.0),
    sector(7, 12.0, 280.0),
    sector(8, 15.0, 250.0),
];

/// Ids of the sector pool, in display order.
pub const SECTOR_IDS: [u8; 8] = [1, 2, 3, 4, 5, 6, 7, 8];

#[must_use]
pub fn sector_spec(id: u8) -> Option<&'static SectorSpec> {
    SECTORS.iter().find(|spec| spec.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_eleven_flat_and_eight_solid_shapes() {
        assert_eq!(shapes_of(Dimension::Two).count(), 11);
        assert_eq!(shapes_of(Dimension::Three).count(), 8);
        assert_eq!(find_shape("kite").unwrap().dimension, Dimension::Two);
        assert!(find_shape("dodecahedron").is_none());
    }

    #[test]
    fn composite_areas_match_the_worksheet() {
        let areas: Vec<(u8, f64)> = COMPOSITE_IDS
            .iter()
            .map(|id| (*id, composite_figure(*id).unwrap().area()))
            .collect();
        assert_eq!(
            areas,
            vec![
                (2, 321.0),
                (3, 598.0),
                (4, 288.0),
                (5, 18.0),
                (8, 3456.0),
                (9, 174.0)
            ]
        );
        assert!(composite_figure(1).is_none());
    }

    #[test]
    fn sector_one_uses_the_worksheet_pi() {
        let spec = sector_spec(1).unwrap();
        assert_eq!(spec.radius, 8.0);
        assert_eq!(spec.angle_degrees, 90.0);
        assert!((spec.area() - 50.24).abs() < 1e-9);
    }

    #[test]
    fn every_sector_id_resolves() {
        for id in SECTOR_IDS {
            assert!(sector_spec(id).is_some(), "missing sector {id}");
        }
        assert!(sector_spec(9).is_none());
    }
}

//! Diamond dowel geometry
//!
//! The dowel is a square plate rotated 45°, centred on the origin with its
//! vertices on the axes at distance `d = side·√2/2`. The joint face runs
//! along the vertical diagonal (x = 0); the loaded half is the triangle
//! `(0, -d)`, `(0, d)`, `(d, 0)`. Field coordinates use that half: x = 0 is
//! the base (loaded edge) and x = d the tip.

use serde::{Deserialize, Serialize};

use crate::error::{DowelError, DowelResult};
use crate::units::Length;

/// Exponent of the base-biased station grading in [`DiamondGeometry::mesh_points`]
pub const STATION_GRADING: f64 = 1.6;

/// A point in the plane of the dowel, in mm
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point2) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Preset dowel sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandardSize {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    Metric,
    Imperial,
}

/// Validated diamond dowel geometry. All stored values are in mm.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiamondGeometry {
    side_length: f64,
    thickness: f64,
    joint_opening: f64,
    diagonal_half: f64,
}

impl DiamondGeometry {
    /// Build a geometry from unit-tagged dimensions.
    ///
    /// Fails with an input validation error if any dimension is non-positive
    /// or non-finite, or if the joint opening is not smaller than the side.
    pub fn build(side_length: Length, thickness: Length, joint_opening: Length) -> DowelResult<Self> {
        let side = side_length.to_mm();
        let t = thickness.to_mm();
        let z = joint_opening.to_mm();

        for (field, value) in [("side_length", side), ("thickness", t), ("joint_opening", z)] {
            if !value.is_finite() {
                return Err(DowelError::invalid(field, value, "must be finite"));
            }
            if value <= 0.0 {
                return Err(DowelError::invalid(field, value, "must be positive"));
            }
        }
        if z >= side {
            return Err(DowelError::InvalidGeometry(format!(
                "joint opening {z:.3} mm must be smaller than side length {side:.3} mm"
            )));
        }

        let diagonal_half = side * std::f64::consts::SQRT_2 / 2.0;
        log::debug!("Diamond geometry: side {side:.2} mm, t {t:.2} mm, z {z:.2} mm, d {diagonal_half:.2} mm");

        Ok(Self {
            side_length: side,
            thickness: t,
            joint_opening: z,
            diagonal_half,
        })
    }

    /// Build from plain millimetre values
    pub fn from_mm(side_length: f64, thickness: f64, joint_opening: f64) -> DowelResult<Self> {
        Self::build(
            Length::mm(side_length),
            Length::mm(thickness),
            Length::mm(joint_opening),
        )
    }

    /// Catalogue sizes used for joint design
    pub fn standard(size: StandardSize, system: UnitSystem) -> DowelResult<Self> {
        let (side, t, z) = match (system, size) {
            (UnitSystem::Metric, StandardSize::Small) => (100.0, 6.35, 3.0),
            (UnitSystem::Metric, StandardSize::Medium) => (125.0, 12.7, 4.8),
            (UnitSystem::Metric, StandardSize::Large) => (150.0, 19.1, 6.0),
            (UnitSystem::Imperial, StandardSize::Small) => (4.0, 0.25, 0.125),
            (UnitSystem::Imperial, StandardSize::Medium) => (5.0, 0.5, 0.19),
            (UnitSystem::Imperial, StandardSize::Large) => (6.0, 0.75, 0.25),
        };
        match system {
            UnitSystem::Metric => Self::from_mm(side, t, z),
            UnitSystem::Imperial => {
                Self::build(Length::inches(side), Length::inches(t), Length::inches(z))
            }
        }
    }

    pub fn side_length(&self) -> f64 {
        self.side_length
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn joint_opening(&self) -> f64 {
        self.joint_opening
    }

    /// Half of the diagonal, i.e. base-to-tip length of the loaded half
    pub fn diagonal_half(&self) -> f64 {
        self.diagonal_half
    }

    /// Plan area of the whole diamond (mm²)
    pub fn plan_area(&self) -> f64 {
        self.side_length * self.side_length
    }

    /// Plan area of the loaded half (mm²)
    pub fn half_area(&self) -> f64 {
        self.diagonal_half * self.diagonal_half
    }

    /// Effective bearing width at the joint face: the full diagonal less the
    /// joint opening.
    pub fn bearing_width(&self) -> f64 {
        2.0 * self.diagonal_half - self.joint_opening
    }

    /// Cross-section area at the joint face (mm²)
    pub fn cross_section_area(&self) -> f64 {
        self.bearing_width() * self.thickness
    }

    /// Second moment of area of the joint-face section about its neutral axis (mm⁴)
    pub fn second_moment(&self) -> f64 {
        self.bearing_width() * self.thickness.powi(3) / 12.0
    }

    /// Elastic section modulus of the joint-face section (mm³)
    pub fn section_modulus(&self) -> f64 {
        self.bearing_width() * self.thickness.powi(2) / 6.0
    }

    /// Half-width of the loaded half at distance `x` from the base
    pub fn half_width_at(&self, x: f64) -> f64 {
        (self.diagonal_half - x).max(0.0)
    }

    /// Whether a point (centred coordinates) lies inside the diamond
    pub fn is_inside(&self, p: Point2) -> bool {
        p.x.abs() + p.y.abs() <= self.diagonal_half * (1.0 + 1e-12)
    }

    /// Whether a point lies inside the loaded half
    pub fn in_loaded_half(&self, p: Point2) -> bool {
        p.x >= -1e-12 && self.is_inside(p)
    }

    /// Normalised field coordinates (ξ, η) of a point in the loaded half
    pub fn normalized(&self, p: Point2) -> (f64, f64) {
        let d = self.diagonal_half;
        ((p.x / d).clamp(0.0, 1.0), (p.y.abs() / d).clamp(0.0, 1.0))
    }

    /// `n` points tracing the outline counter-clockwise from the right vertex.
    ///
    /// The returned iterator is finite and can be cloned to restart it.
    pub fn boundary_points(&self, n: usize) -> BoundaryPoints {
        BoundaryPoints {
            d: self.diagonal_half,
            n,
            next: 0,
        }
    }

    /// Sample points over the loaded half, graded toward the base.
    ///
    /// Stations sit at `ξᵢ = (i/n)^1.6`, so spacing is finest next to the
    /// loaded edge. Each station below the tip carries `2k + 1` points
    /// spanning its width (`k = max(1, n/2)`); the tip is a single point.
    /// Points are ordered station by station, bottom to top.
    pub fn mesh_points(&self, density: usize) -> Vec<Point2> {
        let layout = StationLayout::new(density);
        let d = self.diagonal_half;
        let mut points = Vec::with_capacity(layout.point_count());

        for i in 0..layout.stations {
            let x = layout.xi(i) * d;
            let h = self.half_width_at(x);
            for j in 0..layout.per_station() {
                let frac = (j as f64 - layout.k as f64) / layout.k as f64;
                points.push(Point2::new(x, h * frac));
            }
        }
        points.push(Point2::new(d, 0.0));

        points
    }
}

/// Index layout of [`DiamondGeometry::mesh_points`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationLayout {
    /// Stations below the tip
    pub stations: usize,
    /// Points either side of the axis at each station
    pub k: usize,
}

impl StationLayout {
    pub fn new(density: usize) -> Self {
        let stations = density.max(1);
        Self {
            stations,
            k: (stations / 2).max(1),
        }
    }

    pub fn per_station(&self) -> usize {
        2 * self.k + 1
    }

    pub fn point_count(&self) -> usize {
        self.stations * self.per_station() + 1
    }

    /// Index of point `j` on station `i`
    pub fn index(&self, i: usize, j: usize) -> usize {
        i * self.per_station() + j
    }

    pub fn tip_index(&self) -> usize {
        self.stations * self.per_station()
    }

    /// Normalised position of station `i`
    pub fn xi(&self, i: usize) -> f64 {
        (i as f64 / self.stations as f64).powf(STATION_GRADING)
    }
}

/// Iterator over the diamond outline
#[derive(Debug, Clone)]
pub struct BoundaryPoints {
    d: f64,
    n: usize,
    next: usize,
}

impl Iterator for BoundaryPoints {
    type Item = Point2;

    fn next(&mut self) -> Option<Point2> {
        if self.next >= self.n {
            return None;
        }
        let s = 4.0 * self.next as f64 / self.n as f64;
        self.next += 1;

        let side = (s.floor() as usize).min(3);
        let t = s - side as f64;
        let d = self.d;
        let p = match side {
            0 => Point2::new((1.0 - t) * d, t * d),
            1 => Point2::new(-t * d, (1.0 - t) * d),
            2 => Point2::new(-(1.0 - t) * d, -t * d),
            _ => Point2::new(t * d, -(1.0 - t) * d),
        };
        Some(p)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.n.saturating_sub(self.next);
        (left, Some(left))
    }
}

impl ExactSizeIterator for BoundaryPoints {}

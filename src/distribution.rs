#![warn(missing_docs)]
//! Ray distribution patterns
//!
//! A [`Distribution`] describes how the starting points of a ray bundle are sampled on an aperture
//! [`Shape`](crate::shape::Shape). The distribution generates points in a unit square `[-1, 1] x [-1, 1]` which are then
//! scaled to the bounding box of the shape.
//!
//! ## Example
//!
//! ```rust
//! use optrace::distribution::{Distribution, Pattern};
//!
//! let dist = Distribution::new(Pattern::HexaPolar, 2).unwrap();
//! let points = dist.unit_points();
//! assert_eq!(points.len(), 19);
//! assert_eq!(points[0], nalgebra::Point2::origin());
//! ```
use crate::{
    error::{OptError, OptResult},
    utils::{f64_to_usize, math_utils::i64_to_f64, usize_to_f64},
};
use nalgebra::Point2;
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use sobol::{params::JoeKuoD6, Sobol};
use std::f64::consts::PI;
use strum::{Display, EnumIter, EnumString};

/// Ray distribution patterns.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, Display, EnumString,
)]
pub enum Pattern {
    /// Points along the y axis (meridional ray fan).
    Meridional,
    /// Points along the x axis (sagittal ray fan).
    Sagittal,
    /// Points along the x and the y axis.
    Cross,
    /// Points on a square grid.
    Square,
    /// Points on a triangular grid.
    Triangular,
    /// Points on concentric rings with `6 * i` points on the i-th ring.
    #[default]
    HexaPolar,
    /// Jittered grid, one random point per grid cell. Reproducible only if the [`Distribution`] carries a seed.
    Random,
    /// Low-discrepancy quasi-random Sobol sequence.
    Sobol,
}

/// Configuration of a ray distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Distribution {
    pattern: Pattern,
    radial_density: usize,
    scaling: f64,
    seed: Option<u64>,
}
impl Default for Distribution {
    /// Create a default distribution: [`Pattern::HexaPolar`], radial density 5, scaling 0.999, no seed.
    fn default() -> Self {
        Self {
            pattern: Pattern::default(),
            radial_density: 5,
            scaling: 0.999,
            seed: None,
        }
    }
}
impl Distribution {
    /// Create a new [`Distribution`] with the given pattern and radial density.
    ///
    /// The radial density is the number of points (or rings) between the center and the border of the shape.
    ///
    /// # Errors
    ///
    /// This function will return an error if the radial density is zero.
    pub fn new(pattern: Pattern, radial_density: usize) -> OptResult<Self> {
        if radial_density == 0 {
            return Err(OptError::Config("radial density must be >= 1".into()));
        }
        Ok(Self {
            pattern,
            radial_density,
            ..Self::default()
        })
    }
    /// Returns the pattern of this [`Distribution`].
    #[must_use]
    pub const fn pattern(&self) -> Pattern {
        self.pattern
    }
    /// Returns the radial density of this [`Distribution`].
    #[must_use]
    pub const fn radial_density(&self) -> usize {
        self.radial_density
    }
    /// Returns the scaling factor of this [`Distribution`].
    #[must_use]
    pub const fn scaling(&self) -> f64 {
        self.scaling
    }
    /// Returns the seed of this [`Distribution`] (if any).
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }
    /// Sets the scaling factor of this [`Distribution`].
    ///
    /// The pattern is scaled by this factor relative to the bounding box of the shape. A value slightly below 1.0
    /// keeps the outermost points away from the shape border.
    ///
    /// # Errors
    ///
    /// This function will return an error if the scaling factor is not positive or not finite.
    pub fn set_scaling(&mut self, scaling: f64) -> OptResult<()> {
        if !scaling.is_normal() || scaling.is_sign_negative() {
            return Err(OptError::Config(
                "scaling factor must be > 0.0 and finite".into(),
            ));
        }
        self.scaling = scaling;
        Ok(())
    }
    /// Sets the seed of the random generator used by [`Pattern::Random`].
    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.seed = seed;
    }
    /// Returns this [`Distribution`] with the given seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
    /// Generate the pattern points within the unit square `[-1, 1] x [-1, 1]`.
    ///
    /// For all patterns except [`Pattern::Random`] the first point is the origin.
    #[must_use]
    pub fn unit_points(&self) -> Vec<Point2<f64>> {
        let n = self.radial_density.max(1);
        let step = 1.0 / usize_to_f64(n);
        let mut points = Vec::new();
        if self.pattern != Pattern::Random {
            points.push(Point2::origin());
        }
        match self.pattern {
            Pattern::Meridional => {
                for i in 1..=n {
                    let y = usize_to_f64(i) * step;
                    points.push(Point2::new(0.0, y));
                    points.push(Point2::new(0.0, -y));
                }
            }
            Pattern::Sagittal => {
                for i in 1..=n {
                    let x = usize_to_f64(i) * step;
                    points.push(Point2::new(x, 0.0));
                    points.push(Point2::new(-x, 0.0));
                }
            }
            Pattern::Cross => {
                for i in 1..=n {
                    let v = usize_to_f64(i) * step;
                    points.push(Point2::new(0.0, v));
                    points.push(Point2::new(0.0, -v));
                    points.push(Point2::new(v, 0.0));
                    points.push(Point2::new(-v, 0.0));
                }
            }
            Pattern::Square => {
                let range = grid_range(n);
                for j in range.clone() {
                    for i in range.clone() {
                        if i != 0 || j != 0 {
                            points.push(Point2::new(i64_to_f64(i) * step, i64_to_f64(j) * step));
                        }
                    }
                }
            }
            Pattern::Triangular => {
                let row_step = step * 3.0_f64.sqrt() / 2.0;
                let rows = f64_to_usize((1.0 / row_step).floor());
                for j in -i_from_usize(rows)..=i_from_usize(rows) {
                    let shift = if j % 2 == 0 { 0.0 } else { 0.5 };
                    for i in -i_from_usize(n) - 1..=i_from_usize(n) {
                        let x = (i64_to_f64(i) + shift) * step;
                        if (i != 0 || j != 0) && x.abs() <= 1.0 {
                            points.push(Point2::new(x, i64_to_f64(j) * row_step));
                        }
                    }
                }
            }
            Pattern::HexaPolar => {
                for ring in 1..=n {
                    let radius = usize_to_f64(ring) * step;
                    let points_per_ring = 6 * ring;
                    let angle_step = 2.0 * PI / usize_to_f64(points_per_ring);
                    for point_nr in 0..points_per_ring {
                        let (sin, cos) = (usize_to_f64(point_nr) * angle_step).sin_cos();
                        points.push(Point2::new(radius * cos, radius * sin));
                    }
                }
            }
            Pattern::Random => {
                let mut rng: Box<dyn RngCore> = match self.seed {
                    Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
                    None => Box::new(rand::rng()),
                };
                for j in 0..2 * n {
                    for i in 0..2 * n {
                        let x = (usize_to_f64(i) + rng.random_range(0.0..1.0)) * step - 1.0;
                        let y = (usize_to_f64(j) + rng.random_range(0.0..1.0)) * step - 1.0;
                        points.push(Point2::new(x, y));
                    }
                }
            }
            Pattern::Sobol => {
                let params = JoeKuoD6::minimal();
                let seq = Sobol::<f64>::new(2, &params);
                let count = (2 * n + 1) * (2 * n + 1) - 1;
                for point in seq.take(count) {
                    points.push(Point2::new(2.0f64.mul_add(point[0], -1.0), 2.0f64.mul_add(point[1], -1.0)));
                }
            }
        }
        points
    }
}
fn grid_range(n: usize) -> std::ops::RangeInclusive<i64> {
    -i_from_usize(n)..=i_from_usize(n)
}
fn i_from_usize(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

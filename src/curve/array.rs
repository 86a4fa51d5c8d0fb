//! Array of identical curves (lens arrays)
//!
//! An [`Array`] tiles a base curve on a regular lattice. A query position is mapped into the tile it belongs to and
//! the base curve is evaluated relative to the tile center.
use super::{Curve, CurveRef};
use crate::{
    error::{OptError, OptResult},
    meter,
};
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uom::si::f64::Length;

/// Lattice types of an [`Array`] curve.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, Display, EnumString,
)]
pub enum ArrayLattice {
    /// Square tiles with a tile corner at the origin.
    Square,
    /// Square tiles with a tile center at the origin.
    #[default]
    SquareCenter,
    /// Hexagonal tiles with a tile center at the origin.
    Hexagonal,
}

#[derive(Debug, Clone)]
/// A curve consisting of a base curve repeated on a regular lattice.
pub struct Array {
    curve: CurveRef,
    pitch: f64,
    lattice: ArrayLattice,
}
impl Array {
    /// Create a new [`Array`] with the given base curve, lattice pitch and lattice type.
    ///
    /// # Errors
    ///
    /// This function will return an error if the pitch is not positive or not finite.
    pub fn new(curve: CurveRef, pitch: Length, lattice: ArrayLattice) -> OptResult<Self> {
        if !pitch.is_normal() || pitch.is_sign_negative() {
            return Err(OptError::Config(
                "array pitch must be > 0.0 and finite".into(),
            ));
        }
        Ok(Self {
            curve,
            pitch: pitch.value,
            lattice,
        })
    }
    /// Returns the pitch of this [`Array`].
    #[must_use]
    pub fn pitch(&self) -> Length {
        meter!(self.pitch)
    }
    /// Returns the lattice type of this [`Array`].
    #[must_use]
    pub const fn lattice(&self) -> ArrayLattice {
        self.lattice
    }
    /// Returns the center of the tile containing the given position.
    #[must_use]
    pub fn tile_center(&self, xy: &Point2<f64>) -> Point2<f64> {
        let p = self.pitch;
        match self.lattice {
            ArrayLattice::Square => Point2::new(
                ((xy.x / p).floor() + 0.5) * p,
                ((xy.y / p).floor() + 0.5) * p,
            ),
            ArrayLattice::SquareCenter => {
                Point2::new((xy.x / p).round() * p, (xy.y / p).round() * p)
            }
            ArrayLattice::Hexagonal => {
                // lattice vectors a1 = (p, 0), a2 = (p/2, p*sqrt(3)/2)
                let a1 = Vector2::new(p, 0.0);
                let a2 = Vector2::new(0.5 * p, 0.5 * 3.0_f64.sqrt() * p);
                let v = (xy.y / a2.y).floor();
                let u = ((xy.x - v * a2.x) / a1.x).floor();
                let candidates = [(u, v), (u + 1.0, v), (u, v + 1.0), (u + 1.0, v + 1.0)];
                candidates
                    .iter()
                    .map(|(i, j)| Point2::from(a1 * *i + a2 * *j))
                    .min_by(|c1, c2| {
                        (xy - c1)
                            .norm_squared()
                            .total_cmp(&(xy - c2).norm_squared())
                    })
                    .unwrap_or_else(Point2::origin)
            }
        }
    }
    fn local(&self, xy: &Point2<f64>) -> Point2<f64> {
        Point2::from(xy - self.tile_center(xy))
    }
}
impl Curve for Array {
    fn sagitta(&self, xy: &Point2<f64>) -> f64 {
        self.curve.sagitta(&self.local(xy))
    }
    fn derivative(&self, xy: &Point2<f64>) -> Vector2<f64> {
        self.curve.derivative(&self.local(xy))
    }
    fn name(&self) -> String {
        "array".into()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{curve::Sphere, millimeter};
    use approx::assert_abs_diff_eq;
    use nalgebra::point;
    use std::sync::Arc;

    fn lens() -> CurveRef {
        Arc::new(Sphere::new(millimeter!(10.0)).unwrap())
    }
    #[test]
    fn new() {
        assert!(Array::new(lens(), millimeter!(0.0), ArrayLattice::Square).is_err());
        assert!(Array::new(lens(), millimeter!(-1.0), ArrayLattice::Square).is_err());
        assert!(Array::new(lens(), millimeter!(f64::NAN), ArrayLattice::Square).is_err());
        let a = Array::new(lens(), millimeter!(2.0), ArrayLattice::Hexagonal).unwrap();
        assert_eq!(a.pitch(), millimeter!(2.0));
        assert_eq!(a.lattice(), ArrayLattice::Hexagonal);
    }
    #[test]
    fn square_tiles() {
        let a = Array::new(lens(), meter!(1.0), ArrayLattice::Square).unwrap();
        assert_abs_diff_eq!(a.tile_center(&point![0.2, 0.7]), point![0.5, 0.5]);
        assert_abs_diff_eq!(a.tile_center(&point![-0.2, 1.7]), point![-0.5, 1.5]);
        let a = Array::new(lens(), meter!(1.0), ArrayLattice::SquareCenter).unwrap();
        assert_abs_diff_eq!(a.tile_center(&point![0.2, 0.7]), point![0.0, 1.0]);
    }
    #[test]
    fn hexagonal_tiles() {
        let a = Array::new(lens(), meter!(1.0), ArrayLattice::Hexagonal).unwrap();
        assert_abs_diff_eq!(a.tile_center(&point![0.1, 0.1]), point![0.0, 0.0]);
        assert_abs_diff_eq!(a.tile_center(&point![0.9, -0.1]), point![1.0, 0.0]);
        let h = 0.5 * 3.0_f64.sqrt();
        assert_abs_diff_eq!(
            a.tile_center(&point![0.45, h - 0.1]),
            point![0.5, h],
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            a.tile_center(&point![-0.55, h + 0.1]),
            point![-0.5, h],
            epsilon = 1e-12
        );
    }
    #[test]
    fn periodic_sagitta() {
        let a = Array::new(lens(), millimeter!(2.0), ArrayLattice::SquareCenter).unwrap();
        let s = a.sagitta(&point![0.0003, 0.0001]);
        assert_abs_diff_eq!(a.sagitta(&point![0.0023, 0.0001]), s, epsilon = 1e-15);
        assert_abs_diff_eq!(a.sagitta(&point![0.0003, -0.0039]), s, epsilon = 1e-15);
        assert_abs_diff_eq!(a.sagitta(&point![0.0, 0.0]), 0.0);
    }
}

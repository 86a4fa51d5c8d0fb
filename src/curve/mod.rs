//! Module for handling curves (surface sagitta models)
//!
//! A [`Curve`] describes the height (sagitta) of a surface along the local z axis as a function of the
//! (x, y) position. Light is assumed to travel along +z, so the surface normal returned by [`Curve::normal`]
//! points towards -z.
//!
//! Curves with a closed-form ray intersection ([`Sphere`], [`Conic`], [`Parabola`], [`Flat`]) override
//! [`Curve::intersect`]. All others rely on the iterative tangent-plane solver.
use crate::line::Line;
use nalgebra::{vector, Point2, Point3, Vector2, Vector3};
use roots::Roots;
use std::{fmt::Debug, sync::Arc};

mod array;
mod composer;
mod conic;
mod flat;
mod foucault;
mod grid;
mod parabola;
mod polynomial;
mod rotational;
mod sphere;

pub use array::{Array, ArrayLattice};
pub use composer::{Composer, ComposerTerm};
pub use conic::Conic;
pub use flat::Flat;
pub use foucault::{Foucault, FoucaultMode};
pub use grid::Grid;
pub use parabola::Parabola;
pub use polynomial::Polynomial;
pub use rotational::Rotational;
pub use sphere::Sphere;

/// Maximum number of iterations of the generic intersection solver.
pub const MAX_INTERSECT_ITERATIONS: usize = 32;
/// Convergence limit of the generic intersection solver (difference of successive sagittas in meter).
pub const INTERSECT_TOLERANCE: f64 = 1e-10;
/// Step width (in meter) for the numerical derivative by central differences.
pub const DERIVATIVE_STEP: f64 = 1e-6;

/// Trait for all surface curves.
pub trait Curve: Debug + Send + Sync {
    /// Returns the height (along local z) of the curve at the given position.
    ///
    /// The result is `NaN` if the position is outside the domain of the curve.
    fn sagitta(&self, xy: &Point2<f64>) -> f64;
    /// Returns the gradient `(dz/dx, dz/dy)` of the curve at the given position.
    ///
    /// The default implementation uses central differences.
    fn derivative(&self, xy: &Point2<f64>) -> Vector2<f64> {
        let dx = vector![DERIVATIVE_STEP, 0.0];
        let dy = vector![0.0, DERIVATIVE_STEP];
        vector![
            (self.sagitta(&(xy + dx)) - self.sagitta(&(xy - dx))) / (2.0 * DERIVATIVE_STEP),
            (self.sagitta(&(xy + dy)) - self.sagitta(&(xy - dy))) / (2.0 * DERIVATIVE_STEP)
        ]
    }
    /// Returns the unit normal vector of the curve at the given point.
    ///
    /// Only the x and y coordinates of the point are used. The normal points towards -z.
    fn normal(&self, point: &Point3<f64>) -> Vector3<f64> {
        let d = self.derivative(&point.xy());
        vector![d.x, d.y, -1.0].normalize()
    }
    /// Calculate the nearest intersection point of a [`Line`] (in local coordinates) with this curve.
    ///
    /// Only intersections in forward direction of the line are considered. The function returns `None` if
    /// the line does not intersect the curve.
    fn intersect(&self, line: &Line) -> Option<Point3<f64>> {
        intersect_iterative(self, line)
    }
    /// Return the curve type as string (for debugging purposes)
    fn name(&self) -> String;
}

/// Shared reference to a [`Curve`].
pub type CurveRef = Arc<dyn Curve>;

/// Generic ray / curve intersection by iterating over tangent planes.
///
/// The iteration starts with the intersection of the line with the `z = 0` plane. In each step the sagitta
/// at the current position is evaluated and the line is intersected with the tangent plane at this point.
/// The iteration stops if two successive sagittas differ by less than [`INTERSECT_TOLERANCE`] or after
/// [`MAX_INTERSECT_ITERATIONS`] steps.
pub fn intersect_iterative<C: Curve + ?Sized>(curve: &C, line: &Line) -> Option<Point3<f64>> {
    let t = line.intersect_z0_plane()?;
    let mut point = line.point_at(t);
    let mut sag = 0.0;
    for _ in 0..MAX_INTERSECT_ITERATIONS {
        let new_sag = curve.sagitta(&point.xy());
        if !new_sag.is_finite() {
            return None;
        }
        let converged = (new_sag - sag).abs() < INTERSECT_TOLERANCE;
        sag = new_sag;
        if converged {
            break;
        }
        let surface_point = Point3::new(point.x, point.y, new_sag);
        let normal = curve.normal(&surface_point);
        let t = line.intersect_plane(&surface_point, &normal)?;
        point = line.point_at(t);
    }
    let t = (point - line.origin()).dot(&line.direction());
    if t > 0.0 && point.iter().all(|c| c.is_finite()) {
        Some(point)
    } else {
        None
    }
}

/// Convert a radial derivative `dz/dr` into the gradient `(dz/dx, dz/dy)` at the given position.
#[must_use]
pub fn rotational_gradient(dz_dr: f64, xy: &Point2<f64>) -> Vector2<f64> {
    let r = xy.coords.norm();
    if r < f64::EPSILON {
        Vector2::zeros()
    } else {
        xy.coords * (dz_dr / r)
    }
}

/// Select the smallest positive root of a quadratic which fulfills the given branch condition.
fn nearest_forward_root(roots: &Roots<f64>, accept: impl Fn(f64) -> bool) -> Option<f64> {
    let candidates: &[f64] = match roots {
        Roots::No(_) => return None,
        Roots::One(t) => t,
        Roots::Two(t) => t,
        _ => unreachable!(),
    };
    candidates
        .iter()
        .copied()
        .filter(|t| t.is_finite() && *t > 0.0 && accept(*t))
        .min_by(f64::total_cmp)
}

/// Intersect a line with a conic section of revolution `r² - 2·roc·z + sh·z² = 0`.
///
/// Only points on the branch running through the origin (`1 - sh·z/roc >= 0`) are accepted.
fn intersect_conic(roc: f64, sh: f64, line: &Line) -> Option<Point3<f64>> {
    let o = line.origin();
    let d = line.direction();
    let a = sh.mul_add(d.z * d.z, d.x.mul_add(d.x, d.y * d.y));
    let b = 2.0 * (sh * o.z).mul_add(d.z, roc.mul_add(-d.z, o.x.mul_add(d.x, o.y * d.y)));
    let c = sh.mul_add(
        o.z * o.z,
        (2.0 * roc).mul_add(-o.z, o.x.mul_add(o.x, o.y * o.y)),
    );
    let roots = roots::find_roots_quadratic(a, b, c);
    let t = nearest_forward_root(&roots, |t| {
        let z = line.point_at(t).z;
        (sh * z / roc) <= 1.0 + 1e-9
    })?;
    Some(line.point_at(t))
}

#[cfg(test)]
pub(crate) mod test_helper {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::point;

    /// Shoot lines along the negative normal onto the curve and check that the intersection reproduces the
    /// surface point.
    pub fn check_round_trip(curve: &dyn Curve, radius: f64, tolerance: f64) {
        for i in 0..=8 {
            for j in 0..8 {
                let r = radius * f64::from(i) / 8.0;
                let phi = f64::from(j) * std::f64::consts::PI / 4.0;
                let xy = point![r * phi.cos(), r * phi.sin()];
                let p = Point3::new(xy.x, xy.y, curve.sagitta(&xy));
                let n = curve.normal(&p);
                let line = Line::new(p - 0.01 * n, n).unwrap();
                let hit = curve.intersect(&line).unwrap();
                assert_abs_diff_eq!(hit, p, epsilon = tolerance);
            }
        }
    }
}

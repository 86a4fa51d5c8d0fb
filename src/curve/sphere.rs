//! Spherical curve
//!
//! A sphere with its vertex at the origin and its center at `(0, 0, roc)`. A positive radius of curvature leads to a
//! surface "opening" towards +z.
use super::{nearest_forward_root, rotational_gradient, Curve};
use crate::{
    error::{OptError, OptResult},
    line::Line,
    meter,
};
use nalgebra::{Point2, Point3, Vector2};
use roots::find_roots_quadratic;
use uom::si::f64::Length;

#[derive(Debug, Clone)]
/// A spherical curve with a given radius of curvature.
pub struct Sphere {
    roc: f64,
}
impl Sphere {
    /// Create a new [`Sphere`] with the given radius of curvature.
    ///
    /// # Errors
    ///
    /// This function will return an error if the radius of curvature is 0.0 or not finite.
    pub fn new(roc: Length) -> OptResult<Self> {
        Ok(Self {
            roc: check_roc(roc)?,
        })
    }
    /// Returns the radius of curvature of this [`Sphere`].
    #[must_use]
    pub fn roc(&self) -> Length {
        meter!(self.roc)
    }
    /// Sets the radius of curvature of this [`Sphere`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the radius of curvature is 0.0 or not finite.
    pub fn set_roc(&mut self, roc: Length) -> OptResult<()> {
        self.roc = check_roc(roc)?;
        Ok(())
    }
    fn sagitta_r(&self, r: f64) -> f64 {
        let abs_roc = self.roc.abs();
        let sag = abs_roc - abs_roc.mul_add(abs_roc, -r * r).sqrt();
        if self.roc.is_sign_negative() {
            -sag
        } else {
            sag
        }
    }
}
pub(super) fn check_roc(roc: Length) -> OptResult<f64> {
    let roc = roc.value;
    if !roc.is_normal() {
        return Err(OptError::Geometry(
            "radius of curvature must be != 0.0 and finite".into(),
        ));
    }
    Ok(roc)
}
impl Curve for Sphere {
    fn sagitta(&self, xy: &Point2<f64>) -> f64 {
        self.sagitta_r(xy.coords.norm())
    }
    fn derivative(&self, xy: &Point2<f64>) -> Vector2<f64> {
        let r2 = xy.coords.norm_squared();
        let dz_dr = r2.sqrt() / self.roc.mul_add(self.roc, -r2).sqrt();
        let dz_dr = if self.roc.is_sign_negative() {
            -dz_dr
        } else {
            dz_dr
        };
        rotational_gradient(dz_dr, xy)
    }
    fn intersect(&self, line: &Line) -> Option<Point3<f64>> {
        // sphere around center c = (0, 0, roc): |p + t*d - c|^2 = roc^2
        // with oc = p - c and |d| = 1:
        // t^2 + 2*(d.oc)*t + |oc|^2 - roc^2 = 0
        let mut oc = line.origin().coords;
        oc.z -= self.roc;
        let b = 2.0 * line.direction().dot(&oc);
        let c = self.roc.mul_add(-self.roc, oc.norm_squared());
        let roots = find_roots_quadratic(1.0, b, c);
        // only the cap running through the origin (z on the near side of the center)
        let t = nearest_forward_root(&roots, |t| line.point_at(t).z / self.roc <= 1.0)?;
        Some(line.point_at(t))
    }
    fn name(&self) -> String {
        "sphere".into()
    }
}

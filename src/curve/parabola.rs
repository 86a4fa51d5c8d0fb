//! Parabolic curve
//!
//! This module implements a paraboloid of revolution `z = r² / (2 * roc)` with its vertex at the origin.
use super::{intersect_conic, rotational_gradient, sphere::check_roc, Curve};
use crate::{error::OptResult, line::Line, meter};
use nalgebra::{Point2, Point3, Vector2};
use uom::si::f64::Length;

#[derive(Clone, Debug)]
/// A parabolic curve with a given radius of curvature at its vertex.
///
/// **Note**: A positive radius of curvature leads to a parabolic surface with its "opening" towards the positive z axis.
/// The focal length of the corresponding mirror is `roc / 2`.
pub struct Parabola {
    roc: f64,
}
impl Parabola {
    /// Create a new [`Parabola`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the radius of curvature is 0.0 or not finite.
    pub fn new(roc: Length) -> OptResult<Self> {
        Ok(Self {
            roc: check_roc(roc)?,
        })
    }
    /// Returns the vertex radius of curvature of this [`Parabola`].
    #[must_use]
    pub fn roc(&self) -> Length {
        meter!(self.roc)
    }
}
impl Curve for Parabola {
    fn sagitta(&self, xy: &Point2<f64>) -> f64 {
        xy.coords.norm_squared() / (2.0 * self.roc)
    }
    fn derivative(&self, xy: &Point2<f64>) -> Vector2<f64> {
        rotational_gradient(xy.coords.norm() / self.roc, xy)
    }
    fn intersect(&self, line: &Line) -> Option<Point3<f64>> {
        // parabola: x^2 + y^2 - 2*roc*z = 0 (conic with sh = 0)
        intersect_conic(self.roc, 0.0, line)
    }
    fn name(&self) -> String {
        "parabola".into()
    }
}

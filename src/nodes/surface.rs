//! Curve + aperture shape pair describing a physical boundary
use crate::{curve::CurveRef, line::Line, shape::ShapeRef};
use nalgebra::{Point2, Point3, Vector3};

/// A surface `z = sagitta(x, y)` limited by an aperture shape, given in the local frame of its element.
#[derive(Debug, Clone)]
pub struct Surface {
    curve: CurveRef,
    shape: ShapeRef,
}
impl Surface {
    /// Creates a new [`Surface`].
    #[must_use]
    pub fn new(curve: CurveRef, shape: ShapeRef) -> Self {
        Self { curve, shape }
    }
    /// Returns the curve of this [`Surface`].
    #[must_use]
    pub const fn curve(&self) -> &CurveRef {
        &self.curve
    }
    /// Returns the aperture shape of this [`Surface`].
    #[must_use]
    pub const fn shape(&self) -> &ShapeRef {
        &self.shape
    }
    /// Intersect a line (in the local frame) with this [`Surface`].
    ///
    /// Returns the intercept point and the unit surface normal. Intercepts outside the aperture shape are rejected
    /// unless `unobstructed` is set.
    #[must_use]
    pub fn intersect(&self, line: &Line, unobstructed: bool) -> Option<(Point3<f64>, Vector3<f64>)> {
        let point = self.curve.intersect(line)?;
        if !unobstructed && !self.shape.inside(&Point2::new(point.x, point.y)) {
            return None;
        }
        Some((point, self.curve.normal(&point)))
    }
}

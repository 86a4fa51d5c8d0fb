//! Aperture stop
use crate::{
    error::{OptError, OptResult},
    line::Line,
    meter,
    shape::ShapeRef,
};
use nalgebra::{Point2, Point3, Vector3};
use uom::si::f64::Length;

/// A flat aperture stop.
///
/// The stop transmits light through its aperture shape and blocks the annulus between the shape and the external
/// radius. Light passing beyond the external radius does not hit the stop at all.
#[derive(Debug, Clone)]
pub struct Stop {
    shape: ShapeRef,
    external_radius: f64,
    intercept_reemit: bool,
}
impl Stop {
    /// Creates a new [`Stop`] with the given aperture shape.
    ///
    /// The external radius is set to twice the maximum radius of the shape.
    #[must_use]
    pub fn new(shape: ShapeRef) -> Self {
        let external_radius = 2.0 * shape.max_radius();
        Self {
            shape,
            external_radius,
            intercept_reemit: false,
        }
    }
    /// Returns the aperture shape of this [`Stop`].
    #[must_use]
    pub const fn shape(&self) -> &ShapeRef {
        &self.shape
    }
    /// Returns the external radius of this [`Stop`].
    #[must_use]
    pub fn external_radius(&self) -> Length {
        meter!(self.external_radius)
    }
    /// Set the external radius of this [`Stop`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the radius is smaller than the maximum radius of the aperture shape or
    /// is NaN.
    pub fn set_external_radius(&mut self, radius: Length) -> OptResult<()> {
        if radius.value.is_nan() || radius.value < self.shape.max_radius() {
            return Err(OptError::Geometry(
                "external radius must be >= the maximum radius of the aperture".into(),
            ));
        }
        self.external_radius = radius.value;
        Ok(())
    }
    /// Returns `true` if rays passing the aperture are intercepted (and re-emitted) in non-sequential traces.
    #[must_use]
    pub const fn intercept_reemit(&self) -> bool {
        self.intercept_reemit
    }
    /// Intercept and re-emit rays passing the aperture in non-sequential traces.
    pub fn set_intercept_reemit(&mut self, intercept_reemit: bool) {
        self.intercept_reemit = intercept_reemit;
    }
    /// Returns `true` if the given point passes through the aperture.
    ///
    /// The annulus outside the aperture always blocks, also in unobstructed traces.
    #[must_use]
    pub fn transmits(&self, point: &Point3<f64>) -> bool {
        self.shape.inside(&Point2::new(point.x, point.y))
    }
    pub(super) fn intercept(
        &self,
        line: &Line,
        unobstructed: bool,
        sequential: bool,
    ) -> Option<(Point3<f64>, Vector3<f64>)> {
        let t = line.intersect_z0_plane()?;
        if t <= 0.0 {
            return None;
        }
        let mut point = line.point_at(t);
        point.z = 0.0;
        if point.coords.xy().norm() > self.external_radius {
            return None;
        }
        if !sequential
            && !self.intercept_reemit
            && !unobstructed
            && self.transmits(&point)
        {
            return None;
        }
        Some((point, -Vector3::z()))
    }
}

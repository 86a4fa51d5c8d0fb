//! Annular aperture
use super::{disk::check_radius, Shape};
use crate::{
    error::{OptError, OptResult},
    meter,
};
use nalgebra::{Point2, Vector2};
use uom::si::f64::Length;

#[derive(Debug, Clone)]
/// An annular aperture (a disk with a central circular hole).
pub struct Ring {
    radius: f64,
    hole_radius: f64,
}
impl Ring {
    /// Create a new [`Ring`] with the given outer radius and hole radius.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///  - the outer radius is not positive or not finite
    ///  - the hole radius is negative or not smaller than the outer radius
    pub fn new(radius: Length, hole_radius: Length) -> OptResult<Self> {
        let radius = check_radius(radius, "radius")?;
        let hole = hole_radius.value;
        if !hole.is_finite() || hole.is_sign_negative() || hole >= radius {
            return Err(OptError::Geometry(
                "hole radius must be >= 0.0 and smaller than the outer radius".into(),
            ));
        }
        Ok(Self {
            radius,
            hole_radius: hole,
        })
    }
    /// Returns the outer radius of this [`Ring`].
    #[must_use]
    pub fn radius(&self) -> Length {
        meter!(self.radius)
    }
    /// Returns the hole radius of this [`Ring`].
    #[must_use]
    pub fn hole_radius(&self) -> Length {
        meter!(self.hole_radius)
    }
}
impl Shape for Ring {
    fn inside(&self, xy: &Point2<f64>) -> bool {
        let r2 = xy.coords.norm_squared();
        r2 <= self.radius * self.radius && r2 >= self.hole_radius * self.hole_radius
    }
    fn max_radius(&self) -> f64 {
        self.radius
    }
    fn min_radius(&self) -> f64 {
        self.radius
    }
    fn outer_radius(&self, _direction: &Vector2<f64>) -> f64 {
        self.radius
    }
    fn bounding_box(&self) -> (Point2<f64>, Point2<f64>) {
        (
            Point2::new(-self.radius, -self.radius),
            Point2::new(self.radius, self.radius),
        )
    }
    fn name(&self) -> String {
        "ring".into()
    }
}

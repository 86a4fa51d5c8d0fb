//! Rectangular aperture
use super::{disk::check_radius, unit_direction, Shape};
use crate::{error::OptResult, meter};
use nalgebra::{Point2, Vector2};
use uom::si::f64::Length;

#[derive(Debug, Clone)]
/// A rectangular aperture centered at the origin.
pub struct Rectangle {
    half_width: f64,
    half_height: f64,
}
impl Rectangle {
    /// Create a new [`Rectangle`] with the given (full) width (along x) and height (along y).
    ///
    /// # Errors
    ///
    /// This function will return an error if width or height is not positive or not finite.
    pub fn new(width: Length, height: Length) -> OptResult<Self> {
        Ok(Self {
            half_width: check_radius(width, "width")? / 2.0,
            half_height: check_radius(height, "height")? / 2.0,
        })
    }
    /// Returns the width of this [`Rectangle`].
    #[must_use]
    pub fn width(&self) -> Length {
        meter!(2.0 * self.half_width)
    }
    /// Returns the height of this [`Rectangle`].
    #[must_use]
    pub fn height(&self) -> Length {
        meter!(2.0 * self.half_height)
    }
}
impl Shape for Rectangle {
    fn inside(&self, xy: &Point2<f64>) -> bool {
        xy.x.abs() <= self.half_width && xy.y.abs() <= self.half_height
    }
    fn max_radius(&self) -> f64 {
        self.half_width.hypot(self.half_height)
    }
    fn min_radius(&self) -> f64 {
        self.half_width.min(self.half_height)
    }
    fn outer_radius(&self, direction: &Vector2<f64>) -> f64 {
        let d = unit_direction(direction);
        let tx = if d.x == 0.0 {
            f64::INFINITY
        } else {
            self.half_width / d.x.abs()
        };
        let ty = if d.y == 0.0 {
            f64::INFINITY
        } else {
            self.half_height / d.y.abs()
        };
        tx.min(ty)
    }
    fn bounding_box(&self) -> (Point2<f64>, Point2<f64>) {
        (
            Point2::new(-self.half_width, -self.half_height),
            Point2::new(self.half_width, self.half_height),
        )
    }
    fn name(&self) -> String {
        "rectangle".into()
    }
}

//! Elliptical apertures
use super::{disk::check_radius, unit_direction, Shape};
use crate::{
    error::{OptError, OptResult},
    meter,
};
use nalgebra::{Point2, Vector2};
use uom::si::f64::Length;

/// Distance from the origin to an axis-aligned ellipse with the given semi axes in the given (unit) direction.
fn ellipse_radius(semi_x: f64, semi_y: f64, direction: &Vector2<f64>) -> f64 {
    let d = unit_direction(direction);
    1.0 / ((d.x / semi_x).powi(2) + (d.y / semi_y).powi(2)).sqrt()
}
fn inside_ellipse(semi_x: f64, semi_y: f64, xy: &Point2<f64>) -> bool {
    (xy.x / semi_x).powi(2) + (xy.y / semi_y).powi(2) <= 1.0
}

#[derive(Debug, Clone)]
/// An elliptical aperture centered at the origin with its axes aligned to x and y.
pub struct Ellipse {
    semi_x: f64,
    semi_y: f64,
}
impl Ellipse {
    /// Create a new [`Ellipse`] with the given semi axes.
    ///
    /// # Errors
    ///
    /// This function will return an error if any semi axis is not positive or not finite.
    pub fn new(semi_x: Length, semi_y: Length) -> OptResult<Self> {
        Ok(Self {
            semi_x: check_radius(semi_x, "semi axis x")?,
            semi_y: check_radius(semi_y, "semi axis y")?,
        })
    }
    /// Returns the semi axes `(x, y)` of this [`Ellipse`].
    #[must_use]
    pub fn semi_axes(&self) -> (Length, Length) {
        (meter!(self.semi_x), meter!(self.semi_y))
    }
}
impl Shape for Ellipse {
    fn inside(&self, xy: &Point2<f64>) -> bool {
        inside_ellipse(self.semi_x, self.semi_y, xy)
    }
    fn max_radius(&self) -> f64 {
        self.semi_x.max(self.semi_y)
    }
    fn min_radius(&self) -> f64 {
        self.semi_x.min(self.semi_y)
    }
    fn outer_radius(&self, direction: &Vector2<f64>) -> f64 {
        ellipse_radius(self.semi_x, self.semi_y, direction)
    }
    fn bounding_box(&self) -> (Point2<f64>, Point2<f64>) {
        (
            Point2::new(-self.semi_x, -self.semi_y),
            Point2::new(self.semi_x, self.semi_y),
        )
    }
    fn name(&self) -> String {
        "ellipse".into()
    }
}

#[derive(Debug, Clone)]
/// An elliptical aperture with a central elliptical hole.
pub struct EllipticalRing {
    outer: Ellipse,
    hole: Ellipse,
}
impl EllipticalRing {
    /// Create a new [`EllipticalRing`] from the semi axes of the outer contour and of the hole.
    ///
    /// # Errors
    ///
    /// This function will return an error if any semi axis is not positive or not finite or if the hole is not
    /// fully enclosed by the outer contour.
    pub fn new(
        semi_x: Length,
        semi_y: Length,
        hole_semi_x: Length,
        hole_semi_y: Length,
    ) -> OptResult<Self> {
        let outer = Ellipse::new(semi_x, semi_y)?;
        let hole = Ellipse::new(hole_semi_x, hole_semi_y)?;
        if hole.semi_x >= outer.semi_x || hole.semi_y >= outer.semi_y {
            return Err(OptError::Geometry(
                "hole must be smaller than the outer contour".into(),
            ));
        }
        Ok(Self { outer, hole })
    }
    /// Returns the outer contour of this [`EllipticalRing`].
    #[must_use]
    pub const fn outer(&self) -> &Ellipse {
        &self.outer
    }
    /// Returns the hole of this [`EllipticalRing`].
    #[must_use]
    pub const fn hole(&self) -> &Ellipse {
        &self.hole
    }
}
impl Shape for EllipticalRing {
    fn inside(&self, xy: &Point2<f64>) -> bool {
        self.outer.inside(xy)
            && (xy.x / self.hole.semi_x).powi(2) + (xy.y / self.hole.semi_y).powi(2) >= 1.0
    }
    fn max_radius(&self) -> f64 {
        self.outer.max_radius()
    }
    fn min_radius(&self) -> f64 {
        self.outer.min_radius()
    }
    fn outer_radius(&self, direction: &Vector2<f64>) -> f64 {
        self.outer.outer_radius(direction)
    }
    fn bounding_box(&self) -> (Point2<f64>, Point2<f64>) {
        self.outer.bounding_box()
    }
    fn name(&self) -> String {
        "elliptical ring".into()
    }
}

//! Circular aperture
use super::Shape;
use crate::{
    error::{OptError, OptResult},
    meter,
};
use nalgebra::{Point2, Vector2};
use uom::si::f64::Length;

#[derive(Debug, Clone)]
/// A circular aperture centered at the origin.
pub struct Disk {
    radius: f64,
}
impl Disk {
    /// Create a new [`Disk`] with the given radius.
    ///
    /// # Errors
    ///
    /// This function will return an error if the radius is not positive or not finite.
    pub fn new(radius: Length) -> OptResult<Self> {
        Ok(Self {
            radius: check_radius(radius, "radius")?,
        })
    }
    /// Returns the radius of this [`Disk`].
    #[must_use]
    pub fn radius(&self) -> Length {
        meter!(self.radius)
    }
}
/// Validate a radius (or other length) which must be positive and finite and return its value in meter.
pub(super) fn check_radius(radius: Length, name: &str) -> OptResult<f64> {
    if !radius.is_normal() || radius.is_sign_negative() {
        return Err(OptError::Geometry(format!(
            "{name} must be > 0.0 and finite"
        )));
    }
    Ok(radius.value)
}
impl Shape for Disk {
    fn inside(&self, xy: &Point2<f64>) -> bool {
        xy.coords.norm_squared() <= self.radius * self.radius
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
        "disk".into()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        distribution::{Distribution, Pattern},
        millimeter,
        shape::test_helper::check_patterns,
    };
    use nalgebra::{point, vector};

    #[test]
    fn new() {
        assert!(Disk::new(millimeter!(0.0)).is_err());
        assert!(Disk::new(millimeter!(-1.0)).is_err());
        assert!(Disk::new(millimeter!(f64::NAN)).is_err());
        assert!(Disk::new(millimeter!(f64::INFINITY)).is_err());
        assert_eq!(Disk::new(millimeter!(5.0)).unwrap().radius(), millimeter!(5.0));
    }
    #[test]
    fn inside() {
        let d = Disk::new(meter!(1.0)).unwrap();
        assert!(d.inside(&point![0.0, 0.0]));
        assert!(d.inside(&point![0.0, 1.0]));
        assert!(d.inside(&point![0.7, -0.7]));
        assert!(!d.inside(&point![0.8, 0.8]));
    }
    #[test]
    fn radii() {
        let d = Disk::new(meter!(2.0)).unwrap();
        assert_eq!(d.max_radius(), 2.0);
        assert_eq!(d.min_radius(), 2.0);
        assert_eq!(d.outer_radius(&vector![1.0, 1.0]), 2.0);
        assert_eq!(d.bounding_box(), (point![-2.0, -2.0], point![2.0, 2.0]));
    }
    #[test]
    fn hexapolar_pattern() {
        let d = Disk::new(meter!(1.0)).unwrap();
        let dist = Distribution::new(Pattern::HexaPolar, 3).unwrap();
        let points = d.pattern(&dist, false).unwrap();
        assert_eq!(points.len(), 37);
        assert_eq!(points[0], Point2::origin());
    }
    #[test]
    fn patterns() {
        check_patterns(&Disk::new(millimeter!(10.0)).unwrap());
    }
}

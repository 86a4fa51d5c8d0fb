//! Unbounded aperture
use super::Shape;
use nalgebra::{Point2, Vector2};

/// A shape without any boundary. Every point is inside.
///
/// Since the shape has no finite extent, no ray distribution pattern can be generated for it.
#[derive(Debug, Default, Clone, Copy)]
pub struct Infinite;

impl Shape for Infinite {
    fn inside(&self, _xy: &Point2<f64>) -> bool {
        true
    }
    fn max_radius(&self) -> f64 {
        f64::INFINITY
    }
    fn min_radius(&self) -> f64 {
        f64::INFINITY
    }
    fn outer_radius(&self, _direction: &Vector2<f64>) -> f64 {
        f64::INFINITY
    }
    fn bounding_box(&self) -> (Point2<f64>, Point2<f64>) {
        (
            Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
            Point2::new(f64::INFINITY, f64::INFINITY),
        )
    }
    fn name(&self) -> String {
        "infinite".into()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{distribution::Distribution, error::OptError};
    use assert_matches::assert_matches;
    use nalgebra::point;

    #[test]
    fn inside() {
        assert!(Infinite.inside(&point![1e30, -1e30]));
        assert_eq!(Infinite.max_radius(), f64::INFINITY);
        assert_eq!(Infinite.min_radius(), f64::INFINITY);
    }
    #[test]
    fn pattern_not_supported() {
        assert_matches!(
            Infinite.pattern(&Distribution::default(), false),
            Err(OptError::Config(_))
        );
        assert_matches!(
            Infinite.pattern(&Distribution::default(), true),
            Err(OptError::Config(_))
        );
    }
}

//! Module for handling aperture shapes
//!
//! A [`Shape`] describes the 2D boundary of a surface in its local XY plane. It is used to decide whether a ray
//! intercept lies within the clear aperture and to generate ray distribution patterns confined to the aperture.
//! All lengths are given in meter.
use crate::{
    distribution::Distribution,
    error::{OptError, OptResult},
};
use nalgebra::{Point2, Vector2};
use std::{fmt::Debug, sync::Arc};

mod composer;
mod disk;
mod ellipse;
mod infinite;
mod polygon;
mod rectangle;
mod ring;

pub use composer::{Composer, ShapeOperation};
pub use disk::Disk;
pub use ellipse::{Ellipse, EllipticalRing};
pub use infinite::Infinite;
pub use polygon::{Polygon, RegularPolygon};
pub use rectangle::Rectangle;
pub use ring::Ring;

/// Trait for aperture shapes.
pub trait Shape: Debug + Send + Sync {
    /// Returns `true` if the given point lies within the shape (border included).
    fn inside(&self, xy: &Point2<f64>) -> bool;
    /// Returns the radius of the smallest circle around the origin containing the whole shape.
    fn max_radius(&self) -> f64;
    /// Returns the radius of the largest circle around the origin enclosed by the outer contour of the shape.
    fn min_radius(&self) -> f64;
    /// Returns the distance from the origin to the outer contour in the given direction.
    fn outer_radius(&self, direction: &Vector2<f64>) -> f64;
    /// Returns the bounding box of the shape as `(lower left, upper right)` corners.
    fn bounding_box(&self) -> (Point2<f64>, Point2<f64>);
    /// Generate the points of the given [`Distribution`] confined to this shape.
    ///
    /// The unit pattern is scaled to the bounding box of the shape (multiplied by the scaling factor of the
    /// distribution). Points outside the shape are dropped unless `unobstructed` is set.
    ///
    /// # Errors
    ///
    /// This function will return an error if the shape has no finite extent.
    fn pattern(&self, distribution: &Distribution, unobstructed: bool) -> OptResult<Vec<Point2<f64>>> {
        let (lower, upper) = self.bounding_box();
        let half_x = lower.x.abs().max(upper.x.abs());
        let half_y = lower.y.abs().max(upper.y.abs());
        if !half_x.is_finite() || !half_y.is_finite() {
            return Err(OptError::Config(format!(
                "pattern {} not supported for shape {}",
                distribution.pattern(),
                self.name()
            )));
        }
        let scale = Vector2::new(half_x, half_y) * distribution.scaling();
        Ok(distribution
            .unit_points()
            .into_iter()
            .map(|p| Point2::new(p.x * scale.x, p.y * scale.y))
            .filter(|p| unobstructed || self.inside(p))
            .collect())
    }
    /// Return the shape type as string (for debugging purposes)
    fn name(&self) -> String;
}

/// Shared reference to a [`Shape`].
pub type ShapeRef = Arc<dyn Shape>;

/// Returns the unit vector of the given direction or the x axis for a zero direction.
fn unit_direction(direction: &Vector2<f64>) -> Vector2<f64> {
    direction
        .try_normalize(f64::EPSILON)
        .unwrap_or_else(Vector2::x)
}

/// Even-odd (crossing number) test of a point against a closed polygon.
fn inside_polygon(vertices: &[Point2<f64>], p: &Point2<f64>) -> bool {
    let mut inside = false;
    let n = vertices.len();
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
    }
    inside || on_polygon_border(vertices, p)
}

fn on_polygon_border(vertices: &[Point2<f64>], p: &Point2<f64>) -> bool {
    let n = vertices.len();
    (0..n).any(|i| distance_to_segment(&vertices[i], &vertices[(i + 1) % n], p) < 1e-12)
}

fn distance_to_segment(a: &Point2<f64>, b: &Point2<f64>, p: &Point2<f64>) -> f64 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 < f64::EPSILON * f64::EPSILON {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

/// Largest distance from the origin along `direction` at which the ray crosses a polygon edge.
fn polygon_outer_radius(vertices: &[Point2<f64>], direction: &Vector2<f64>) -> f64 {
    let d = unit_direction(direction);
    let n = vertices.len();
    (0..n)
        .filter_map(|i| {
            let a = vertices[i].coords;
            let e = vertices[(i + 1) % n].coords - a;
            // solve t*d = a + s*e for t >= 0 and 0 <= s <= 1
            let denom = d.perp(&e);
            if denom.abs() < f64::EPSILON {
                return None;
            }
            let t = a.perp(&e) / denom;
            let s = a.perp(&d) / denom;
            ((0.0..=1.0).contains(&s) && t >= 0.0).then_some(t)
        })
        .fold(0.0, f64::max)
}

#[cfg(test)]
pub(crate) mod test_helper {
    use super::*;
    use crate::distribution::Pattern;
    use strum::IntoEnumIterator;

    /// Check the pattern invariants of a shape: the origin comes first (if it is inside) and all points are
    /// contained in the shape.
    pub fn check_patterns(shape: &dyn Shape) {
        for pattern in Pattern::iter() {
            let dist = Distribution::new(pattern, 4).unwrap().with_seed(1);
            let points = shape.pattern(&dist, false).unwrap();
            assert!(!points.is_empty(), "pattern {pattern} empty for {}", shape.name());
            assert!(points.iter().all(|p| shape.inside(p)));
            if pattern != Pattern::Random && shape.inside(&Point2::origin()) {
                assert_eq!(points[0], Point2::origin(), "pattern {pattern}");
            }
            let unobstructed = shape.pattern(&dist, true).unwrap();
            if pattern != Pattern::Random {
                assert_eq!(unobstructed[0], Point2::origin());
                assert_eq!(unobstructed.len(), dist.unit_points().len());
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::{point, vector};

    fn square() -> Vec<Point2<f64>> {
        vec![
            point![-1.0, -1.0],
            point![1.0, -1.0],
            point![1.0, 1.0],
            point![-1.0, 1.0],
        ]
    }
    #[test]
    fn polygon_test() {
        let s = square();
        assert!(inside_polygon(&s, &point![0.0, 0.0]));
        assert!(inside_polygon(&s, &point![0.99, -0.99]));
        assert!(inside_polygon(&s, &point![1.0, 0.5]));
        assert!(!inside_polygon(&s, &point![1.01, 0.0]));
        assert!(!inside_polygon(&s, &point![0.0, -2.0]));
    }
    #[test]
    fn polygon_concave() {
        // "U" shape with a notch from above
        let u = vec![
            point![-2.0, -1.0],
            point![2.0, -1.0],
            point![2.0, 1.0],
            point![1.0, 1.0],
            point![1.0, 0.0],
            point![-1.0, 0.0],
            point![-1.0, 1.0],
            point![-2.0, 1.0],
        ];
        assert!(inside_polygon(&u, &point![0.0, -0.5]));
        assert!(!inside_polygon(&u, &point![0.0, 0.5]));
        assert!(inside_polygon(&u, &point![1.5, 0.5]));
    }
    #[test]
    fn outer_radius() {
        let s = square();
        assert_abs_diff_eq!(polygon_outer_radius(&s, &vector![1.0, 0.0]), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            polygon_outer_radius(&s, &vector![1.0, 1.0]),
            2.0_f64.sqrt(),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(polygon_outer_radius(&s, &vector![0.0, -3.0]), 1.0, epsilon = 1e-12);
    }
    #[test]
    fn zero_direction() {
        assert_eq!(unit_direction(&Vector2::zeros()), Vector2::x());
    }
}

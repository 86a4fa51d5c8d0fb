//! Polygonal apertures
use super::{
    disk::check_radius, distance_to_segment, inside_polygon, polygon_outer_radius, Shape,
};
use crate::{
    error::{OptError, OptResult},
    meter,
    utils::usize_to_f64,
};
use nalgebra::{Point2, Vector2};
use std::f64::consts::PI;
use uom::si::f64::{Angle, Length};

#[derive(Debug, Clone)]
/// An arbitrary (simple) polygon given by its vertices.
///
/// The order of the vertices must follow the outline of the polygon. The polygon is closed implicitly. Concave
/// polygons are supported (even-odd rule).
pub struct Polygon {
    vertices: Vec<Point2<f64>>,
}
impl Polygon {
    /// Create a new [`Polygon`] from a list of vertices (in meter).
    ///
    /// # Errors
    ///
    /// This function will return an error if less than three vertices are given or any coordinate is not finite.
    pub fn new(vertices: Vec<Point2<f64>>) -> OptResult<Self> {
        if vertices.len() < 3 {
            return Err(OptError::Geometry("less than 3 vertices given".into()));
        }
        if vertices.iter().any(|v| !v.x.is_finite() || !v.y.is_finite()) {
            return Err(OptError::Geometry(
                "polygon vertices must be finite".into(),
            ));
        }
        Ok(Self { vertices })
    }
    /// Returns the vertices of this [`Polygon`].
    #[must_use]
    pub fn vertices(&self) -> &[Point2<f64>] {
        &self.vertices
    }
}
fn vertices_max_radius(vertices: &[Point2<f64>]) -> f64 {
    vertices
        .iter()
        .map(|v| v.coords.norm())
        .fold(0.0, f64::max)
}
fn vertices_min_radius(vertices: &[Point2<f64>]) -> f64 {
    let origin = Point2::origin();
    if !inside_polygon(vertices, &origin) {
        return 0.0;
    }
    let n = vertices.len();
    (0..n)
        .map(|i| distance_to_segment(&vertices[i], &vertices[(i + 1) % n], &origin))
        .fold(f64::INFINITY, f64::min)
}
fn vertices_bounding_box(vertices: &[Point2<f64>]) -> (Point2<f64>, Point2<f64>) {
    vertices.iter().fold(
        (
            Point2::new(f64::INFINITY, f64::INFINITY),
            Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        ),
        |(lo, hi), v| {
            (
                Point2::new(lo.x.min(v.x), lo.y.min(v.y)),
                Point2::new(hi.x.max(v.x), hi.y.max(v.y)),
            )
        },
    )
}
impl Shape for Polygon {
    fn inside(&self, xy: &Point2<f64>) -> bool {
        inside_polygon(&self.vertices, xy)
    }
    fn max_radius(&self) -> f64 {
        vertices_max_radius(&self.vertices)
    }
    fn min_radius(&self) -> f64 {
        vertices_min_radius(&self.vertices)
    }
    fn outer_radius(&self, direction: &Vector2<f64>) -> f64 {
        polygon_outer_radius(&self.vertices, direction)
    }
    fn bounding_box(&self) -> (Point2<f64>, Point2<f64>) {
        vertices_bounding_box(&self.vertices)
    }
    fn name(&self) -> String {
        "polygon".into()
    }
}

#[derive(Debug, Clone)]
/// A regular polygon centered at the origin.
pub struct RegularPolygon {
    radius: f64,
    edges: usize,
    rotation: f64,
    vertices: Vec<Point2<f64>>,
}
impl RegularPolygon {
    /// Create a new [`RegularPolygon`] with the given circumscribed radius, number of edges and rotation.
    ///
    /// With zero rotation the first vertex lies on the positive x axis.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///  - the radius is not positive or not finite
    ///  - less than three edges are given
    ///  - the rotation angle is not finite
    pub fn new(radius: Length, edges: usize, rotation: Angle) -> OptResult<Self> {
        let radius = check_radius(radius, "radius")?;
        if edges < 3 {
            return Err(OptError::Geometry(
                "regular polygon needs at least 3 edges".into(),
            ));
        }
        if !rotation.is_finite() {
            return Err(OptError::Geometry("rotation angle must be finite".into()));
        }
        let rotation = rotation.value;
        let vertices = (0..edges)
            .map(|i| {
                let (sin, cos) = (2.0 * PI * usize_to_f64(i) / usize_to_f64(edges) + rotation).sin_cos();
                Point2::new(radius * cos, radius * sin)
            })
            .collect();
        Ok(Self {
            radius,
            edges,
            rotation,
            vertices,
        })
    }
    /// Returns the circumscribed radius of this [`RegularPolygon`].
    #[must_use]
    pub fn radius(&self) -> Length {
        meter!(self.radius)
    }
    /// Returns the number of edges of this [`RegularPolygon`].
    #[must_use]
    pub const fn edges(&self) -> usize {
        self.edges
    }
    /// Returns the rotation angle (in radian) of this [`RegularPolygon`].
    #[must_use]
    pub const fn rotation(&self) -> f64 {
        self.rotation
    }
}
impl Shape for RegularPolygon {
    fn inside(&self, xy: &Point2<f64>) -> bool {
        inside_polygon(&self.vertices, xy)
    }
    fn max_radius(&self) -> f64 {
        self.radius
    }
    fn min_radius(&self) -> f64 {
        self.radius * (PI / usize_to_f64(self.edges)).cos()
    }
    fn outer_radius(&self, direction: &Vector2<f64>) -> f64 {
        polygon_outer_radius(&self.vertices, direction)
    }
    fn bounding_box(&self) -> (Point2<f64>, Point2<f64>) {
        vertices_bounding_box(&self.vertices)
    }
    fn name(&self) -> String {
        "regular polygon".into()
    }
}

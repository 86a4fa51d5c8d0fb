#![warn(missing_docs)]
//! Module for handling lines (point + direction pairs)
//!
//! A [`Line`] is the geometric skeleton of a light ray. It is also used for generic line / plane intersections.
use crate::{
    error::{OptError, OptResult},
    utils::geom_transformation::Transform,
};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A line defined by an origin and a (unit length) direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    origin: Point3<f64>,
    direction: Vector3<f64>,
}
impl Line {
    /// Create a new [`Line`].
    ///
    /// The given direction vector is normalized.
    ///
    /// # Errors
    ///
    /// This function returns an error if
    ///  - the origin contains non-finite components
    ///  - the direction vector has zero length or non-finite components
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> OptResult<Self> {
        if origin.iter().any(|c| !c.is_finite()) {
            return Err(OptError::Geometry("line origin must be finite".into()));
        }
        if direction.iter().any(|c| !c.is_finite()) {
            return Err(OptError::Geometry("line direction must be finite".into()));
        }
        if direction.norm() < f64::EPSILON {
            return Err(OptError::Geometry(
                "line direction must have a non-zero length".into(),
            ));
        }
        Ok(Self {
            origin,
            direction: direction.normalize(),
        })
    }
    /// Create a [`Line`] from an origin and a direction which is already known to be unit length.
    ///
    /// Used internally for transformed lines where the normalization would be redundant.
    #[must_use]
    pub(crate) fn from_unit(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        debug_assert!((direction.norm() - 1.0).abs() < 1e-9);
        Self { origin, direction }
    }
    /// Returns the origin of this [`Line`].
    #[must_use]
    pub const fn origin(&self) -> Point3<f64> {
        self.origin
    }
    /// Returns the (unit length) direction of this [`Line`].
    #[must_use]
    pub const fn direction(&self) -> Vector3<f64> {
        self.direction
    }
    /// Returns the point at the parametric distance `t` along this [`Line`].
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }
    /// Intersect this [`Line`] with a plane given by a point and a normal vector.
    ///
    /// Returns the parametric distance `t` of the intersection point or `None` if the line is parallel to
    /// the plane. Negative distances (intersection behind the origin) are returned as well.
    #[must_use]
    pub fn intersect_plane(&self, point: &Point3<f64>, normal: &Vector3<f64>) -> Option<f64> {
        let denom = self.direction.dot(normal);
        if denom.abs() < f64::EPSILON {
            return None;
        }
        let t = (point - self.origin).dot(normal) / denom;
        t.is_finite().then_some(t)
    }
    /// Intersect this [`Line`] with the `z = 0` plane.
    ///
    /// Returns `None` if the line is parallel to the plane.
    #[must_use]
    pub fn intersect_z0_plane(&self) -> Option<f64> {
        if self.direction.z == 0.0 {
            return None;
        }
        Some(-self.origin.z / self.direction.z)
    }
    /// Returns this [`Line`] expressed in another coordinate system.
    #[must_use]
    pub fn transformed(&self, transform: &Transform) -> Self {
        transform.apply_line(self)
    }
}

//! Rigid coordinate transformations
//!
//! A [`Transform`] places an element relative to its parent container. It consists of a 3x3 rotation matrix and a
//! translation vector. Scaling or shearing is not supported.
#![warn(missing_docs)]
use crate::{
    error::{OptError, OptResult},
    line::Line,
};
use approx::{AbsDiffEq, RelativeEq};
use nalgebra::{Isometry3, Matrix3, Point3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use uom::si::{
    angle::radian,
    f64::{Angle, Length},
    length::meter,
};

/// A rigid transformation (rotation followed by a translation).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    iso: Isometry3<f64>,
}
impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
impl Transform {
    /// Create a new [`Transform`] from a translation and a rotation given as angles around the x, y and z axes.
    ///
    /// The rotations are applied in the order x, y, z.
    ///
    /// # Errors
    ///
    /// This function returns an error if any of the given values is not finite.
    pub fn new(translation: Point3<Length>, rotation: Point3<Angle>) -> OptResult<Self> {
        if translation.iter().any(|c| !c.is_finite()) {
            return Err(OptError::Geometry("translation must be finite".into()));
        }
        if rotation.iter().any(|c| !c.is_finite()) {
            return Err(OptError::Geometry("rotation angles must be finite".into()));
        }
        let trans = Translation3::new(
            translation.x.get::<meter>(),
            translation.y.get::<meter>(),
            translation.z.get::<meter>(),
        );
        let rot = UnitQuaternion::from_euler_angles(
            rotation.x.get::<radian>(),
            rotation.y.get::<radian>(),
            rotation.z.get::<radian>(),
        );
        Ok(Self {
            iso: Isometry3::from_parts(trans, rot),
        })
    }
    /// Create a pure translation along the (local) z axis.
    ///
    /// # Errors
    ///
    /// This function returns an error if the given position is not finite.
    pub fn new_along_z(z: Length) -> OptResult<Self> {
        if !z.is_finite() {
            return Err(OptError::Geometry("z position must be finite".into()));
        }
        Ok(Self::from_translation(Vector3::new(0.0, 0.0, z.get::<meter>())))
    }
    /// The identity transformation.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            iso: Isometry3::identity(),
        }
    }
    /// Create a pure translation from a vector given in base units (meter).
    #[must_use]
    pub fn from_translation(translation: Vector3<f64>) -> Self {
        Self {
            iso: Isometry3::translation(translation.x, translation.y, translation.z),
        }
    }
    /// Returns the translation part of this [`Transform`] in base units (meter).
    #[must_use]
    pub fn translation(&self) -> Vector3<f64> {
        self.iso.translation.vector
    }
    /// Returns the linear (rotation) part of this [`Transform`] as 3x3 matrix.
    #[must_use]
    pub fn linear(&self) -> Matrix3<f64> {
        self.iso.rotation.to_rotation_matrix().into_inner()
    }
    /// Returns the transformation that first applies `self` and then `next`.
    #[must_use]
    pub fn then(&self, next: &Self) -> Self {
        Self {
            iso: next.iso * self.iso,
        }
    }
    /// Returns the inverse of this [`Transform`].
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            iso: self.iso.inverse(),
        }
    }
    /// Transform a point.
    #[must_use]
    pub fn apply_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.iso.transform_point(point)
    }
    /// Transform a direction vector. The translation part is ignored.
    #[must_use]
    pub fn apply_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.iso.transform_vector(vector)
    }
    /// Transform a [`Line`] (origin and direction).
    #[must_use]
    pub fn apply_line(&self, line: &Line) -> Line {
        Line::from_unit(
            self.apply_point(&line.origin()),
            self.apply_vector(&line.direction()),
        )
    }
    /// Inverse transform a point.
    #[must_use]
    pub fn inverse_apply_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.iso.inverse_transform_point(point)
    }
    /// Inverse transform a direction vector.
    #[must_use]
    pub fn inverse_apply_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.iso.inverse_transform_vector(vector)
    }
}
impl AbsDiffEq for Transform {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.linear().abs_diff_eq(&other.linear(), epsilon)
            && self
                .translation()
                .abs_diff_eq(&other.translation(), epsilon)
    }
}
impl RelativeEq for Transform {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.linear()
            .relative_eq(&other.linear(), epsilon, max_relative)
            && self
                .translation()
                .relative_eq(&other.translation(), epsilon, max_relative)
    }
}

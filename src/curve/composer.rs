//! Composition of curves
//!
//! A [`Composer`] sums the sagittas of several sub-curves. Each sub-curve (a [`ComposerTerm`]) may be shifted and rotated
//! in the XY plane, scaled in x / y and scaled / offset along z.
use super::{Curve, CurveRef};
use crate::error::{OptError, OptResult};
use nalgebra::{Point2, Rotation2, Vector2};

#[derive(Debug, Clone)]
/// A single term of a [`Composer`] curve.
pub struct ComposerTerm {
    curve: CurveRef,
    offset: Vector2<f64>,
    rotation: Rotation2<f64>,
    scale: Vector2<f64>,
    z_scale: f64,
    z_offset: f64,
}
impl ComposerTerm {
    /// Create a new [`ComposerTerm`] without any transformation.
    #[must_use]
    pub fn new(curve: CurveRef) -> Self {
        Self {
            curve,
            offset: Vector2::zeros(),
            rotation: Rotation2::identity(),
            scale: Vector2::new(1.0, 1.0),
            z_scale: 1.0,
            z_offset: 0.0,
        }
    }
    /// Shift the sub-curve by the given offset (in meter) in the XY plane.
    ///
    /// # Errors
    ///
    /// This function will return an error if the offset is not finite.
    pub fn with_offset(mut self, offset: Vector2<f64>) -> OptResult<Self> {
        if offset.iter().any(|v| !v.is_finite()) {
            return Err(OptError::Geometry("offset must be finite".into()));
        }
        self.offset = offset;
        Ok(self)
    }
    /// Rotate the sub-curve by the given angle (in radian) around the z axis.
    ///
    /// # Errors
    ///
    /// This function will return an error if the angle is not finite.
    pub fn with_rotation(mut self, angle: f64) -> OptResult<Self> {
        if !angle.is_finite() {
            return Err(OptError::Geometry("rotation angle must be finite".into()));
        }
        self.rotation = Rotation2::new(angle);
        Ok(self)
    }
    /// Stretch the sub-curve in x and y by the given factors.
    ///
    /// # Errors
    ///
    /// This function will return an error if any factor is zero or not finite.
    pub fn with_scale(mut self, scale: Vector2<f64>) -> OptResult<Self> {
        if !scale.iter().all(|v| v.is_normal()) {
            return Err(OptError::Geometry(
                "scale factors must be != 0.0 and finite".into(),
            ));
        }
        self.scale = scale;
        Ok(self)
    }
    /// Scale the sagitta of the sub-curve and add a constant z offset.
    ///
    /// # Errors
    ///
    /// This function will return an error if any value is not finite.
    pub fn with_z(mut self, z_scale: f64, z_offset: f64) -> OptResult<Self> {
        if !z_scale.is_finite() || !z_offset.is_finite() {
            return Err(OptError::Geometry(
                "z scale and z offset must be finite".into(),
            ));
        }
        self.z_scale = z_scale;
        self.z_offset = z_offset;
        Ok(self)
    }
    /// Map a position into the frame of the sub-curve.
    fn local(&self, xy: &Point2<f64>) -> Point2<f64> {
        let q = self.rotation.inverse() * (xy - self.offset);
        Point2::new(q.x / self.scale.x, q.y / self.scale.y)
    }
    fn sagitta(&self, xy: &Point2<f64>) -> f64 {
        self.z_scale
            .mul_add(self.curve.sagitta(&self.local(xy)), self.z_offset)
    }
    fn derivative(&self, xy: &Point2<f64>) -> Vector2<f64> {
        let g = self.curve.derivative(&self.local(xy));
        self.rotation * Vector2::new(g.x / self.scale.x, g.y / self.scale.y) * self.z_scale
    }
}

#[derive(Debug, Clone, Default)]
/// A curve consisting of the sum of several (transformed) sub-curves.
pub struct Composer {
    terms: Vec<ComposerTerm>,
}
impl Composer {
    /// Create a new (empty) [`Composer`]. An empty composer behaves like a flat curve.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Add a term to this [`Composer`].
    pub fn add(&mut self, term: ComposerTerm) {
        self.terms.push(term);
    }
    /// Returns the number of terms of this [`Composer`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }
    /// Returns `true` if this [`Composer`] has no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
impl Curve for Composer {
    fn sagitta(&self, xy: &Point2<f64>) -> f64 {
        self.terms.iter().map(|t| t.sagitta(xy)).sum()
    }
    fn derivative(&self, xy: &Point2<f64>) -> Vector2<f64> {
        self.terms.iter().map(|t| t.derivative(xy)).sum()
    }
    fn name(&self) -> String {
        "composer".into()
    }
}

//! Polynomial curve
//!
//! Rotationally symmetric polynomial `z(r) = Σ cᵢ·rⁱ` for `i` in `first_term..first_term + n`. Coefficients are given
//! in base units (meter), i.e. `cᵢ` has the unit `m^(1-i)`.
use super::{rotational_gradient, Curve};
use crate::{
    error::{OptError, OptResult},
    utils::usize_to_f64,
};
use nalgebra::{Point2, Vector2};

#[derive(Debug, Clone)]
/// A rotationally symmetric polynomial curve.
pub struct Polynomial {
    first_term: usize,
    coefficients: Vec<f64>,
}
impl Polynomial {
    /// Create a new [`Polynomial`] with the given exponent of the first term and the list of coefficients.
    ///
    /// # Errors
    ///
    /// This function will return an error if the coefficient list is empty or contains non-finite values.
    pub fn new(first_term: usize, coefficients: Vec<f64>) -> OptResult<Self> {
        if coefficients.is_empty() {
            return Err(OptError::Geometry(
                "polynomial needs at least one coefficient".into(),
            ));
        }
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(OptError::Geometry(
                "polynomial coefficients must be finite".into(),
            ));
        }
        Ok(Self {
            first_term,
            coefficients,
        })
    }
    /// Returns the exponent of the first term of this [`Polynomial`].
    #[must_use]
    pub const fn first_term(&self) -> usize {
        self.first_term
    }
    /// Returns the coefficients of this [`Polynomial`].
    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }
    /// Sets the coefficient of the term with the given exponent.
    ///
    /// # Errors
    ///
    /// This function will return an error if the exponent is outside the term range of this polynomial or if
    /// the value is not finite.
    pub fn set_coefficient(&mut self, exponent: usize, value: f64) -> OptResult<()> {
        if !value.is_finite() {
            return Err(OptError::Geometry(
                "polynomial coefficients must be finite".into(),
            ));
        }
        let index = exponent
            .checked_sub(self.first_term)
            .filter(|i| *i < self.coefficients.len())
            .ok_or_else(|| OptError::Geometry(format!("no polynomial term with exponent {exponent}")))?;
        self.coefficients[index] = value;
        Ok(())
    }
    fn sagitta_r(&self, r: f64) -> f64 {
        let horner = self
            .coefficients
            .iter()
            .rev()
            .fold(0.0_f64, |acc, c| acc.mul_add(r, *c));
        horner * r.powi(exponent(self.first_term))
    }
    fn derivative_r(&self, r: f64) -> f64 {
        // d/dr Σ c_k r^(f+k) = Σ (f+k) c_k r^(f+k-1), a constant term drops out
        let horner = self
            .coefficients
            .iter()
            .enumerate()
            .rev()
            .map(|(k, c)| (self.first_term + k, *c))
            .filter(|(e, _)| *e > 0)
            .fold(0.0_f64, |acc, (e, c)| acc.mul_add(r, usize_to_f64(e) * c));
        horner * r.powi(exponent(self.first_term.max(1) - 1))
    }
}
fn exponent(e: usize) -> i32 {
    i32::try_from(e).unwrap_or(i32::MAX)
}
impl Curve for Polynomial {
    fn sagitta(&self, xy: &Point2<f64>) -> f64 {
        self.sagitta_r(xy.coords.norm())
    }
    fn derivative(&self, xy: &Point2<f64>) -> Vector2<f64> {
        rotational_gradient(self.derivative_r(xy.coords.norm()), xy)
    }
    fn name(&self) -> String {
        "polynomial".into()
    }
}

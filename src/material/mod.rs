//! Optical materials
//!
//! A [`Material`] provides the refractive index and the absorption of a medium and decides how a surface between two
//! media interacts with light. Materials are immutable and usually shared between several surfaces (e.g. the glass
//! of a lens) using a [`MaterialRef`].
#![warn(missing_docs)]
use crate::error::{OptError, OptResult};
use std::{fmt::Debug, sync::Arc};
use uom::si::f64::Length;

mod mirror;
mod solid;

pub use mirror::{Absorber, Mirror};
pub use solid::Solid;

/// Trait for all optical materials.
pub trait Material: Debug + Send + Sync {
    /// Returns the refractive index of this material for the given wavelength.
    ///
    /// # Errors
    ///
    /// This function will return an error if the refractive index model is not defined for the given wavelength.
    fn refractive_index(&self, wavelength: Length) -> OptResult<f64>;
    /// Returns the fraction of light transmitted along the given path length (in meter) through this material.
    ///
    /// Non-absorbing materials always return 1.0.
    fn internal_transmittance(&self, _wavelength: Length, _path_length: f64) -> f64 {
        1.0
    }
    /// Returns `true` if no light can pass into this material.
    fn is_opaque(&self) -> bool {
        false
    }
    /// Returns `true` if this material reflects light hitting its surface.
    fn is_reflecting(&self) -> bool {
        false
    }
    /// Returns the fraction of light reflected at normal incidence when coming from the `incident` material.
    ///
    /// # Errors
    ///
    /// This function will return an error if a refractive index could not be determined.
    fn normal_reflectance(&self, incident: &dyn Material, wavelength: Length) -> OptResult<f64> {
        let n1 = incident.refractive_index(wavelength)?;
        let n2 = self.refractive_index(wavelength)?;
        Ok(((n1 - n2) / (n1 + n2)).powi(2))
    }
    /// Returns the fraction of light transmitted at normal incidence when coming from the `incident` material.
    ///
    /// # Errors
    ///
    /// This function will return an error if a refractive index could not be determined.
    fn normal_transmittance(&self, incident: &dyn Material, wavelength: Length) -> OptResult<f64> {
        if self.is_opaque() {
            return Ok(0.0);
        }
        Ok(1.0 - self.normal_reflectance(incident, wavelength)?)
    }
    /// Return the material type as string (for debugging purposes)
    fn name(&self) -> String;
}

/// Shared reference to a [`Material`].
pub type MaterialRef = Arc<dyn Material>;

/// Check the value of a fraction (reflectance, transmittance).
pub(crate) fn check_fraction(value: f64, name: &str) -> OptResult<f64> {
    if !(0.0..=1.0).contains(&value) {
        return Err(OptError::Material(format!(
            "{name} must be within the range [0.0, 1.0]"
        )));
    }
    Ok(value)
}

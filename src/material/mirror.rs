//! Opaque materials
use super::{check_fraction, Material};
use crate::error::OptResult;
use uom::si::f64::Length;

/// A reflecting, opaque material.
#[derive(Debug, Clone, PartialEq)]
pub struct Mirror {
    reflectance: f64,
}
impl Mirror {
    /// Create a new [`Mirror`] with the given reflectance.
    ///
    /// # Errors
    ///
    /// This function will return an error if the reflectance is not within the range `[0.0, 1.0]`.
    pub fn new(reflectance: f64) -> OptResult<Self> {
        Ok(Self {
            reflectance: check_fraction(reflectance, "reflectance")?,
        })
    }
    /// Returns the reflectance of this [`Mirror`].
    #[must_use]
    pub const fn reflectance(&self) -> f64 {
        self.reflectance
    }
}
impl Default for Mirror {
    /// Create a perfect mirror (reflectance 1.0).
    fn default() -> Self {
        Self { reflectance: 1.0 }
    }
}
impl Material for Mirror {
    fn refractive_index(&self, _wavelength: Length) -> OptResult<f64> {
        Ok(1.0)
    }
    fn is_opaque(&self) -> bool {
        true
    }
    fn is_reflecting(&self) -> bool {
        true
    }
    fn normal_reflectance(&self, _incident: &dyn Material, _wavelength: Length) -> OptResult<f64> {
        Ok(self.reflectance)
    }
    fn name(&self) -> String {
        "mirror".into()
    }
}

/// An opaque material absorbing all light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Absorber;

impl Material for Absorber {
    fn refractive_index(&self, _wavelength: Length) -> OptResult<f64> {
        Ok(1.0)
    }
    fn internal_transmittance(&self, _wavelength: Length, _path_length: f64) -> f64 {
        0.0
    }
    fn is_opaque(&self) -> bool {
        true
    }
    fn normal_reflectance(&self, _incident: &dyn Material, _wavelength: Length) -> OptResult<f64> {
        Ok(0.0)
    }
    fn name(&self) -> String {
        "absorber".into()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{material::Solid, nanometer};

    #[test]
    fn mirror() {
        assert!(Mirror::new(1.1).is_err());
        assert!(Mirror::new(-0.1).is_err());
        let m = Mirror::new(0.9).unwrap();
        assert_eq!(m.reflectance(), 0.9);
        assert!(m.is_opaque());
        assert!(m.is_reflecting());
        let w = nanometer!(633.0);
        assert_eq!(m.normal_reflectance(&Solid::vacuum(), w).unwrap(), 0.9);
        assert_eq!(m.normal_transmittance(&Solid::vacuum(), w).unwrap(), 0.0);
        assert_eq!(Mirror::default().reflectance(), 1.0);
    }
    #[test]
    fn absorber() {
        let a = Absorber;
        let w = nanometer!(633.0);
        assert!(a.is_opaque());
        assert!(!a.is_reflecting());
        assert_eq!(a.normal_reflectance(&Solid::vacuum(), w).unwrap(), 0.0);
        assert_eq!(a.normal_transmittance(&Solid::vacuum(), w).unwrap(), 0.0);
        assert_eq!(a.name(), "absorber");
    }
}

//! Transparent (possibly absorbing) media such as glasses or air
use super::Material;
use crate::{
    error::{OptError, OptResult},
    refractive_index::{
        refr_index_air, refr_index_vacuum, RefrIndexConst, RefractiveIndexType,
    },
};
use serde::{Deserialize, Serialize};
use uom::si::f64::Length;

/// A transparent medium described by a refractive index model and an (optional) absorption coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Solid {
    refractive_index: RefractiveIndexType,
    /// absorption coefficient in 1/m
    absorption: f64,
}
impl Solid {
    /// Create a new non-absorbing [`Solid`] with the given refractive index model.
    #[must_use]
    pub const fn new(refractive_index: RefractiveIndexType) -> Self {
        Self {
            refractive_index,
            absorption: 0.0,
        }
    }
    /// Create a new non-absorbing [`Solid`] with a constant refractive index.
    ///
    /// # Errors
    ///
    /// This function will return an error if the refractive index is < 1.0 or not finite.
    pub fn with_index(refractive_index: f64) -> OptResult<Self> {
        Ok(Self::new(RefractiveIndexType::Const(RefrIndexConst::new(
            refractive_index,
        )?)))
    }
    /// Returns vacuum (constant refractive index of 1.0).
    #[must_use]
    pub const fn vacuum() -> Self {
        Self::new(RefractiveIndexType::Const(refr_index_vacuum()))
    }
    /// Returns air at standard conditions (constant refractive index).
    #[must_use]
    pub const fn air() -> Self {
        Self::new(RefractiveIndexType::Const(refr_index_air()))
    }
    /// Set the absorption coefficient (in 1/m) following the Beer-Lambert law.
    ///
    /// # Errors
    ///
    /// This function will return an error if the coefficient is negative or not finite.
    pub fn with_absorption(mut self, absorption: f64) -> OptResult<Self> {
        if !absorption.is_finite() || absorption.is_sign_negative() {
            return Err(OptError::Material(
                "absorption coefficient must be >= 0.0 and finite".into(),
            ));
        }
        self.absorption = absorption;
        Ok(self)
    }
    /// Returns the refractive index model of this [`Solid`].
    #[must_use]
    pub const fn refractive_index_model(&self) -> &RefractiveIndexType {
        &self.refractive_index
    }
    /// Returns the absorption coefficient (in 1/m) of this [`Solid`].
    #[must_use]
    pub const fn absorption(&self) -> f64 {
        self.absorption
    }
}
impl Material for Solid {
    fn refractive_index(&self, wavelength: Length) -> OptResult<f64> {
        self.refractive_index.get_refractive_index(wavelength)
    }
    fn internal_transmittance(&self, _wavelength: Length, path_length: f64) -> f64 {
        (-self.absorption * path_length.abs()).exp()
    }
    fn name(&self) -> String {
        "solid".into()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{nanometer, refractive_index::RefrIndexSellmeier1};
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    #[test]
    fn default() {
        let s = Solid::default();
        assert_matches!(s.refractive_index_model(), RefractiveIndexType::Sellmeier1(_));
        assert_eq!(s.absorption(), 0.0);
        assert!(!s.is_opaque());
        assert!(!s.is_reflecting());
    }
    #[test]
    fn with_index() {
        assert!(Solid::with_index(0.5).is_err());
        let s = Solid::with_index(1.5).unwrap();
        assert_eq!(s.refractive_index(nanometer!(500.0)).unwrap(), 1.5);
    }
    #[test]
    fn vacuum_and_air() {
        assert_eq!(Solid::vacuum().refractive_index(nanometer!(500.0)).unwrap(), 1.0);
        assert!(Solid::air().refractive_index(nanometer!(500.0)).unwrap() > 1.0);
    }
    #[test]
    fn sellmeier() {
        let s = Solid::new(RefractiveIndexType::Sellmeier1(RefrIndexSellmeier1::default()));
        assert_abs_diff_eq!(
            s.refractive_index(nanometer!(587.5618)).unwrap(),
            1.5168,
            epsilon = 1e-4
        );
    }
    #[test]
    fn beer_lambert() {
        assert!(Solid::vacuum().with_absorption(-1.0).is_err());
        assert!(Solid::vacuum().with_absorption(f64::INFINITY).is_err());
        let s = Solid::vacuum().with_absorption(10.0).unwrap();
        assert_eq!(s.internal_transmittance(nanometer!(500.0), 0.0), 1.0);
        assert_abs_diff_eq!(
            s.internal_transmittance(nanometer!(500.0), 0.1),
            (-1.0_f64).exp(),
            epsilon = 1e-15
        );
        assert_eq!(
            Solid::vacuum().internal_transmittance(nanometer!(500.0), 100.0),
            1.0
        );
    }
}

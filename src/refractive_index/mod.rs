//! Module for handling the refractive index of an optical material.
#![warn(missing_docs)]
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};
use uom::si::f64::Length;

pub mod refr_index_const;
pub mod refr_index_sellmeier1;

pub use refr_index_const::{refr_index_air, refr_index_vacuum, RefrIndexConst};
pub use refr_index_sellmeier1::RefrIndexSellmeier1;

use crate::error::{OptError, OptResult};

/// Available models for the calculation of refractive index
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, EnumIter)]
pub enum RefractiveIndexType {
    /// Trivial model returning a wavelength-independant constant
    Const(RefrIndexConst),
    /// Sellmeier 1 model
    Sellmeier1(RefrIndexSellmeier1),
}

impl Default for RefractiveIndexType {
    fn default() -> Self {
        Self::Sellmeier1(RefrIndexSellmeier1::default())
    }
}

impl RefractiveIndexType {
    /// Get the refractive index value of the [`RefractiveIndexType`] for the given wavelength.
    ///
    /// # Errors
    ///
    /// This function returns an error if the the refractive index could not be calculated e.g.:
    ///   - the given wavelength is not positive or not finite.
    ///   - the model would calculate a value below 1.0, NaN or infinity
    pub fn get_refractive_index(&self, wavelength: Length) -> OptResult<f64> {
        if !wavelength.is_normal() || wavelength.is_sign_negative() {
            return Err(OptError::Material(
                "wavelength must be > 0.0 and finite".into(),
            ));
        }
        let refr_index = match self {
            Self::Const(refr_index_const) => refr_index_const.get_refractive_index(wavelength)?,
            Self::Sellmeier1(refr_index_sellmeier1) => {
                refr_index_sellmeier1.get_refractive_index(wavelength)?
            }
        };
        if refr_index < 1.0 || !refr_index.is_finite() {
            return Err(OptError::Material(
                "refractive index calculated by model is <1.0 or not finite".into(),
            ));
        }
        Ok(refr_index)
    }

    /// Creates a default instance of a refractive index type by name.
    ///
    /// Returns `None` if the name is unknown.
    #[must_use]
    pub fn default_from_name(name: &str) -> Option<Self> {
        Self::iter().find(|ref_ind_type| format!("{ref_ind_type}") == name)
    }
}

impl Display for RefractiveIndexType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Const(_) => write!(f, "Constant"),
            Self::Sellmeier1(_) => write!(f, "Sellmeier equation"),
        }
    }
}
/// All refractive index models must implement this trait.
pub trait RefractiveIndex {
    /// Get the refractive index value of the current model for the given wavelength.
    ///
    /// # Errors
    ///
    /// This function returns an error if the the refractive index could not be calculated e.g.:
    ///   - the given wavelength is outside defined limits.
    ///   - the model would calculate a value below 1.0, NaN or infinity
    fn get_refractive_index(&self, wavelength: Length) -> OptResult<f64>;
    /// Create a corresponding [`RefractiveIndexType`] value.
    fn to_enum(&self) -> RefractiveIndexType;
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::nanometer;
    use assert_matches::assert_matches;

    #[test]
    fn default() {
        assert_matches!(
            RefractiveIndexType::default(),
            RefractiveIndexType::Sellmeier1(_)
        );
    }
    #[test]
    fn display() {
        assert_eq!(
            format!("{}", RefractiveIndexType::Const(refr_index_vacuum())),
            "Constant"
        );
        assert_eq!(
            format!("{}", RefractiveIndexType::default()),
            "Sellmeier equation"
        );
    }
    #[test]
    fn default_from_name() {
        assert_matches!(
            RefractiveIndexType::default_from_name("Constant"),
            Some(RefractiveIndexType::Const(_))
        );
        assert!(RefractiveIndexType::default_from_name("Schott").is_none());
    }
    #[test]
    fn get_refractive_index() {
        let r = RefractiveIndexType::Const(RefrIndexConst::new(1.5).unwrap());
        assert_eq!(r.get_refractive_index(nanometer!(1000.0)).unwrap(), 1.5);
        assert!(r.get_refractive_index(nanometer!(0.0)).is_err());
        assert!(r.get_refractive_index(nanometer!(-500.0)).is_err());
        assert!(r.get_refractive_index(nanometer!(f64::NAN)).is_err());
    }
    #[test]
    fn get_refractive_index_invalid_model_value() {
        // pole of the Sellmeier equation
        let r = RefractiveIndexType::Sellmeier1(RefrIndexSellmeier1::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).unwrap());
        assert!(r.get_refractive_index(nanometer!(500.0)).is_err());
    }
}

//! Constant (wavelength independent) refractive index
use super::{RefractiveIndex, RefractiveIndexType};
use crate::error::{OptError, OptResult};
use serde::{Deserialize, Serialize};
use uom::si::f64::Length;

/// Trivial model returning a wavelength-independant constant
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RefrIndexConst {
    refractive_index: f64,
}
impl RefrIndexConst {
    /// Create a new [`RefrIndexConst`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the given refractive index is < 1.0 or not finite.
    pub fn new(refractive_index: f64) -> OptResult<Self> {
        if refractive_index < 1.0 || !refractive_index.is_finite() {
            return Err(OptError::Material(
                "refractive index must be >=1.0 and finite".into(),
            ));
        }
        Ok(Self { refractive_index })
    }
}
impl Default for RefrIndexConst {
    fn default() -> Self {
        refr_index_vacuum()
    }
}
/// Returns the refractive index of vacuum (1.0).
#[must_use]
pub const fn refr_index_vacuum() -> RefrIndexConst {
    RefrIndexConst {
        refractive_index: 1.0,
    }
}
/// Returns a constant refractive index model of air at standard conditions.
#[must_use]
pub const fn refr_index_air() -> RefrIndexConst {
    RefrIndexConst {
        refractive_index: 1.000_293,
    }
}
impl RefractiveIndex for RefrIndexConst {
    fn get_refractive_index(&self, _wavelength: Length) -> OptResult<f64> {
        Ok(self.refractive_index)
    }
    fn to_enum(&self) -> RefractiveIndexType {
        RefractiveIndexType::Const(self.clone())
    }
}

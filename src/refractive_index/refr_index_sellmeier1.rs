//! Sellmeier (type 1) dispersion formula
use super::{RefractiveIndex, RefractiveIndexType};
use crate::error::{OptError, OptResult};
use serde::{Deserialize, Serialize};
use uom::si::{f64::Length, length::micrometer};

/// Sellmeier 1 model
///
/// `n² = 1 + k1·λ²/(λ² - l1) + k2·λ²/(λ² - l2) + k3·λ²/(λ² - l3)` with `λ` in micrometer.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct RefrIndexSellmeier1 {
    k1: f64,
    k2: f64,
    k3: f64,
    l1: f64,
    l2: f64,
    l3: f64,
}
impl RefrIndexSellmeier1 {
    /// Create a new [`RefrIndexSellmeier1`] model with the given coefficients.
    ///
    /// # Errors
    ///
    /// This function will return an error if any coefficient is not finite.
    pub fn new(k1: f64, k2: f64, k3: f64, l1: f64, l2: f64, l3: f64) -> OptResult<Self> {
        if [k1, k2, k3, l1, l2, l3].iter().any(|c| !c.is_finite()) {
            return Err(OptError::Material(
                "Sellmeier coefficients must be finite".into(),
            ));
        }
        Ok(Self {
            k1,
            k2,
            k3,
            l1,
            l2,
            l3,
        })
    }
}
impl Default for RefrIndexSellmeier1 {
    /// Coefficients of Schott N-BK7.
    fn default() -> Self {
        Self {
            k1: 1.039_612_12,
            k2: 0.231_792_344,
            k3: 1.010_469_45,
            l1: 0.006_000_698_67,
            l2: 0.020_017_914_4,
            l3: 103.560_653,
        }
    }
}
impl RefractiveIndex for RefrIndexSellmeier1 {
    fn get_refractive_index(&self, wavelength: Length) -> OptResult<f64> {
        let lambda = wavelength.get::<micrometer>();
        let l_sq = lambda * lambda;
        let n_sq = 1.0
            + self.k1 * l_sq / (l_sq - self.l1)
            + self.k2 * l_sq / (l_sq - self.l2)
            + self.k3 * l_sq / (l_sq - self.l3);
        if n_sq.is_sign_negative() {
            return Err(OptError::Material(format!(
                "Sellmeier model not defined at {lambda} µm"
            )));
        }
        Ok(n_sq.sqrt())
    }
    fn to_enum(&self) -> RefractiveIndexType {
        RefractiveIndexType::Sellmeier1(self.clone())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::nanometer;
    use approx::assert_abs_diff_eq;

    #[test]
    fn new() {
        assert!(RefrIndexSellmeier1::new(f64::NAN, 0.0, 0.0, 0.0, 0.0, 0.0).is_err());
        assert!(RefrIndexSellmeier1::new(1.0, 0.0, 0.0, 0.01, 0.0, 0.0).is_ok());
    }
    #[test]
    fn nbk7() {
        let r = RefrIndexSellmeier1::default();
        assert_abs_diff_eq!(
            r.get_refractive_index(nanometer!(587.5618)).unwrap(),
            1.5168,
            epsilon = 1e-4
        );
        assert_abs_diff_eq!(
            r.get_refractive_index(nanometer!(1064.0)).unwrap(),
            1.5066,
            epsilon = 1e-4
        );
    }
    #[test]
    fn dispersion() {
        let r = RefrIndexSellmeier1::default();
        assert!(
            r.get_refractive_index(nanometer!(450.0)).unwrap()
                > r.get_refractive_index(nanometer!(650.0)).unwrap()
        );
    }
}

//! Curve reconstructed from Foucault test measurements
//!
//! In a Foucault (knife-edge) test the mirror is divided into zones. For every zone the knife-edge position at which
//! the zone "nulls" is recorded as offset relative to the nominal radius of curvature. The zone slope follows from
//! the local radius of curvature `R` as `r / sqrt(R² - r²)` and is integrated (trapezoidal rule) into a sampled
//! radial profile.
use super::{Curve, Rotational};
use crate::{
    error::{OptError, OptResult},
    meter,
};
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uom::si::f64::Length;

/// Setup of the Foucault test.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, Display, EnumString,
)]
pub enum FoucaultMode {
    /// Light source moves together with the knife edge. The measured offset is the change of the local radius of
    /// curvature.
    #[default]
    MovingSource,
    /// Light source is fixed. The measured offset is twice the change of the local radius of curvature.
    FixedSource,
}

#[derive(Debug, Clone)]
/// A rotationally symmetric curve reconstructed from Foucault knife-edge readings.
pub struct Foucault {
    roc: f64,
    mode: FoucaultMode,
    readings: Vec<(f64, f64)>,
    profile: Rotational,
}
impl Foucault {
    /// Create a new [`Foucault`] curve.
    ///
    /// `readings` is a list of `(zone radius, knife offset)` pairs (in meter) with strictly increasing zone radii.
    /// The offsets are relative to the nominal radius of curvature `roc`. If the first zone does not start at the
    /// center, a reading with zero offset is assumed there.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///  - the radius of curvature is 0.0 or not finite
    ///  - no reading is given or any value is not finite
    ///  - the zone radii are negative or not strictly increasing
    ///  - a zone radius exceeds the local radius of curvature
    pub fn new(roc: Length, mode: FoucaultMode, readings: &[(f64, f64)]) -> OptResult<Self> {
        let roc_m = roc.value;
        if !roc_m.is_normal() {
            return Err(OptError::Geometry(
                "radius of curvature must be != 0.0 and finite".into(),
            ));
        }
        if readings.is_empty() {
            return Err(OptError::Geometry(
                "Foucault curve needs at least one zone reading".into(),
            ));
        }
        if readings
            .iter()
            .any(|(r, o)| !r.is_finite() || !o.is_finite() || r.is_sign_negative())
        {
            return Err(OptError::Geometry(
                "zone readings must be finite and zone radii must be >= 0.0".into(),
            ));
        }
        let mut zones = Vec::with_capacity(readings.len() + 1);
        if readings[0].0 > 0.0 {
            zones.push((0.0, 0.0));
        }
        zones.extend_from_slice(readings);
        let sign = roc_m.signum();
        let slopes = zones
            .iter()
            .map(|(r, offset)| {
                let local_roc = match mode {
                    FoucaultMode::MovingSource => roc_m.abs() + offset,
                    FoucaultMode::FixedSource => roc_m.abs() + offset / 2.0,
                };
                let denom = local_roc.mul_add(local_roc, -r * r);
                if local_roc <= 0.0 || denom <= 0.0 {
                    Err(OptError::Geometry(format!(
                        "zone radius {r} exceeds the local radius of curvature"
                    )))
                } else {
                    Ok(sign * r / denom.sqrt())
                }
            })
            .collect::<OptResult<Vec<f64>>>()?;
        let mut samples = Vec::with_capacity(zones.len());
        let mut z = 0.0;
        samples.push((zones[0].0, z));
        for i in 1..zones.len() {
            z += 0.5 * (slopes[i] + slopes[i - 1]) * (zones[i].0 - zones[i - 1].0);
            samples.push((zones[i].0, z));
        }
        let profile = if samples.len() == 1 {
            // a single central reading describes a flat mirror within the measured area
            Rotational::new(&[(0.0, 0.0), (f64::EPSILON, 0.0)])?
        } else {
            Rotational::new(&samples)?
        };
        Ok(Self {
            roc: roc_m,
            mode,
            readings: readings.to_vec(),
            profile,
        })
    }
    /// Returns the nominal radius of curvature of this [`Foucault`] curve.
    #[must_use]
    pub fn roc(&self) -> Length {
        meter!(self.roc)
    }
    /// Returns the test setup of this [`Foucault`] curve.
    #[must_use]
    pub const fn mode(&self) -> FoucaultMode {
        self.mode
    }
    /// Returns the zone readings of this [`Foucault`] curve.
    #[must_use]
    pub fn readings(&self) -> &[(f64, f64)] {
        &self.readings
    }
    /// Returns the reconstructed radial profile.
    #[must_use]
    pub const fn profile(&self) -> &Rotational {
        &self.profile
    }
}
impl Curve for Foucault {
    fn sagitta(&self, xy: &Point2<f64>) -> f64 {
        self.profile.sagitta(xy)
    }
    fn derivative(&self, xy: &Point2<f64>) -> Vector2<f64> {
        self.profile.derivative(xy)
    }
    fn name(&self) -> String {
        "foucault".into()
    }
}

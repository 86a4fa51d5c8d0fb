//! Configuration of a ray trace
use crate::{
    distribution::Distribution,
    error::{OptError, OptResult},
    millimeter,
    nodes::ElementId,
    system::Sequence,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{Display, EnumIter, EnumString};
use uom::si::f64::Length;

/// Propagation mode of a ray trace.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, Display, EnumString,
)]
pub enum TraceMode {
    /// Rays pass the elements in the order of a [`Sequence`]. Only the next element of the sequence is tested.
    ///
    /// If no explicit sequence is configured, it is derived from the z positions of the elements.
    Sequential,
    /// Rays hit the nearest enabled element.
    #[default]
    NonSequential,
}

/// Physical interaction rules applied at optical surfaces.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, Display, EnumString,
)]
pub enum IntensityMode {
    /// Refraction (or total internal reflection) only. Intensities are not attenuated.
    #[default]
    Simple,
    /// Transmitted and reflected rays are spawned with intensities following the Fresnel equations at normal
    /// incidence. Absorption inside materials is considered.
    Intensity,
    /// Like [`IntensityMode::Intensity`] but using the angle dependent Fresnel equations and tracking the
    /// polarization of the rays.
    Polarized,
}

/// Configuration data for a ray trace.
///
/// The config contains the following info
///   - trace mode (see [`TraceMode`]) and an optional explicit [`Sequence`]
///   - default ray distribution and per element overrides
///   - unobstructed flag (ignore aperture shapes)
///   - intensity threshold below which rays are discarded
///   - length after which a ray not hitting anything is considered lost
///   - maximum number of interactions per ray path
///   - intensity mode (see [`IntensityMode`])
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceParams {
    mode: TraceMode,
    sequence: Option<Sequence>,
    default_distribution: Distribution,
    distributions: BTreeMap<ElementId, Distribution>,
    unobstructed: bool,
    intensity_threshold: f64,
    lost_ray_length: Length,
    max_bounces: usize,
    intensity_mode: IntensityMode,
}
impl Default for TraceParams {
    /// Create a default config for a ray trace with the following parameters:
    ///   - mode: [`TraceMode::NonSequential`], no explicit sequence
    ///   - default distribution: [`Distribution::default`]
    ///   - unobstructed: `false`
    ///   - intensity threshold: `0.0` (only rays with zero intensity are discarded)
    ///   - lost ray length: `1000 mm`
    ///   - maximum number of bounces: `50`
    ///   - intensity mode: [`IntensityMode::Simple`]
    fn default() -> Self {
        Self {
            mode: TraceMode::default(),
            sequence: None,
            default_distribution: Distribution::default(),
            distributions: BTreeMap::new(),
            unobstructed: false,
            intensity_threshold: 0.0,
            lost_ray_length: millimeter!(1000.0),
            max_bounces: 50,
            intensity_mode: IntensityMode::default(),
        }
    }
}
impl TraceParams {
    /// Load a [`TraceParams`] from a YAML string. Missing fields are set to their default values.
    ///
    /// # Errors
    ///
    /// This function will return an error if the string could not be parsed or contains invalid values.
    pub fn from_yaml(yaml: &str) -> OptResult<Self> {
        let params: Self = serde_yaml::from_str(yaml)
            .map_err(|e| OptError::Config(format!("parsing of trace parameters failed: {e}")))?;
        params.validate()?;
        Ok(params)
    }
    /// Serialize this [`TraceParams`] to a YAML string.
    ///
    /// # Errors
    ///
    /// This function will return an error if the serialization fails.
    pub fn to_yaml(&self) -> OptResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| OptError::Config(format!("serialization of trace parameters failed: {e}")))
    }
    fn validate(&self) -> OptResult<()> {
        check_threshold(self.intensity_threshold)?;
        check_lost_ray_length(self.lost_ray_length)?;
        for d in std::iter::once(&self.default_distribution).chain(self.distributions.values()) {
            if d.radial_density() == 0 || !d.scaling().is_normal() || d.scaling().is_sign_negative() {
                return Err(OptError::Config(
                    "distributions need a radial density > 0 and a scaling > 0.0".into(),
                ));
            }
        }
        Ok(())
    }
    /// Returns the trace mode of this config.
    #[must_use]
    pub const fn mode(&self) -> TraceMode {
        self.mode
    }
    /// Sets the trace mode of this config.
    pub fn set_mode(&mut self, mode: TraceMode) {
        self.mode = mode;
    }
    /// Returns the explicit sequence of this config.
    #[must_use]
    pub const fn sequence(&self) -> Option<&Sequence> {
        self.sequence.as_ref()
    }
    /// Switch to sequential mode using the given sequence.
    pub fn set_sequence(&mut self, sequence: Sequence) {
        self.mode = TraceMode::Sequential;
        self.sequence = Some(sequence);
    }
    /// Returns the default ray distribution.
    #[must_use]
    pub const fn default_distribution(&self) -> &Distribution {
        &self.default_distribution
    }
    /// Sets the default ray distribution.
    pub fn set_default_distribution(&mut self, distribution: Distribution) {
        self.default_distribution = distribution;
    }
    /// Use a specific ray distribution when aiming at the given element.
    pub fn set_distribution(&mut self, id: ElementId, distribution: Distribution) {
        self.distributions.insert(id, distribution);
    }
    /// Returns the ray distribution used when aiming at the given element.
    #[must_use]
    pub fn distribution_for(&self, id: ElementId) -> &Distribution {
        self.distributions
            .get(&id)
            .unwrap_or(&self.default_distribution)
    }
    /// Returns `true` if aperture shapes are ignored.
    #[must_use]
    pub const fn unobstructed(&self) -> bool {
        self.unobstructed
    }
    /// Ignore (or respect) aperture shapes during the trace.
    ///
    /// This applies to the apertures of surfaces and to the ray pattern on the entrance pupil. In non-sequential
    /// traces, stops then intercept and re-emit the rays passing their aperture. The blocking annulus of a stop is
    /// never ignored.
    pub fn set_unobstructed(&mut self, unobstructed: bool) {
        self.unobstructed = unobstructed;
    }
    /// Returns the intensity threshold. Only rays with an intensity above this value are propagated.
    #[must_use]
    pub const fn intensity_threshold(&self) -> f64 {
        self.intensity_threshold
    }
    /// Sets the intensity threshold. Only rays with an intensity above this value are propagated.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given threshold is negative or not finite.
    pub fn set_intensity_threshold(&mut self, threshold: f64) -> OptResult<()> {
        self.intensity_threshold = check_threshold(threshold)?;
        Ok(())
    }
    /// Returns the length after which a ray not hitting any element is considered lost.
    ///
    /// Elements farther away than this length along the ray are not hit.
    #[must_use]
    pub const fn lost_ray_length(&self) -> Length {
        self.lost_ray_length
    }
    /// Sets the length after which a ray not hitting any element is considered lost.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given length is not positive or not finite.
    pub fn set_lost_ray_length(&mut self, length: Length) -> OptResult<()> {
        self.lost_ray_length = check_lost_ray_length(length)?;
        Ok(())
    }
    /// Returns the maximum number of interactions along a ray path.
    #[must_use]
    pub const fn max_bounces(&self) -> usize {
        self.max_bounces
    }
    /// Sets the maximum number of interactions along a ray path.
    pub fn set_max_bounces(&mut self, max_bounces: usize) {
        self.max_bounces = max_bounces;
    }
    /// Returns the intensity mode of this config.
    #[must_use]
    pub const fn intensity_mode(&self) -> IntensityMode {
        self.intensity_mode
    }
    /// Sets the intensity mode of this config.
    pub fn set_intensity_mode(&mut self, intensity_mode: IntensityMode) {
        self.intensity_mode = intensity_mode;
    }
}
fn check_threshold(threshold: f64) -> OptResult<f64> {
    if !threshold.is_finite() || threshold.is_sign_negative() {
        return Err(OptError::Config(
            "intensity threshold must be >= 0.0 and finite".into(),
        ));
    }
    Ok(threshold)
}
fn check_lost_ray_length(length: Length) -> OptResult<Length> {
    if !length.is_normal() || length.is_sign_negative() {
        return Err(OptError::Config(
            "lost ray length must be > 0.0 and finite".into(),
        ));
    }
    Ok(length)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::distribution::Pattern;
    use assert_matches::assert_matches;
    use std::str::FromStr;

    #[test]
    fn default() {
        let p = TraceParams::default();
        assert_eq!(p.mode(), TraceMode::NonSequential);
        assert!(p.sequence().is_none());
        assert_eq!(p.default_distribution(), &Distribution::default());
        assert!(!p.unobstructed());
        assert_eq!(p.intensity_threshold(), 0.0);
        assert_eq!(p.lost_ray_length(), millimeter!(1000.0));
        assert_eq!(p.max_bounces(), 50);
        assert_eq!(p.intensity_mode(), IntensityMode::Simple);
    }
    #[test]
    fn set_intensity_threshold() {
        let mut p = TraceParams::default();
        assert!(p.set_intensity_threshold(-0.1).is_err());
        assert!(p.set_intensity_threshold(f64::NAN).is_err());
        assert!(p.set_intensity_threshold(f64::INFINITY).is_err());
        p.set_intensity_threshold(0.01).unwrap();
        assert_eq!(p.intensity_threshold(), 0.01);
    }
    #[test]
    fn set_lost_ray_length() {
        let mut p = TraceParams::default();
        assert!(p.set_lost_ray_length(millimeter!(0.0)).is_err());
        assert!(p.set_lost_ray_length(millimeter!(-1.0)).is_err());
        assert!(p.set_lost_ray_length(millimeter!(f64::INFINITY)).is_err());
        p.set_lost_ray_length(millimeter!(10.0)).unwrap();
        assert_eq!(p.lost_ray_length(), millimeter!(10.0));
    }
    #[test]
    fn set_sequence() {
        let mut p = TraceParams::default();
        p.set_sequence(Sequence::new(vec![ElementId(0), ElementId(1)]));
        assert_eq!(p.mode(), TraceMode::Sequential);
        assert_eq!(p.sequence().unwrap().len(), 2);
    }
    #[test]
    fn distribution_for() {
        let mut p = TraceParams::default();
        let cross = Distribution::new(Pattern::Cross, 3).unwrap();
        p.set_distribution(ElementId(2), cross.clone());
        assert_eq!(p.distribution_for(ElementId(2)), &cross);
        assert_eq!(p.distribution_for(ElementId(1)), &Distribution::default());
    }
    #[test]
    fn modes_from_str() {
        assert_eq!(TraceMode::from_str("Sequential").unwrap(), TraceMode::Sequential);
        assert_eq!(
            IntensityMode::from_str("Polarized").unwrap(),
            IntensityMode::Polarized
        );
        assert!(IntensityMode::from_str("Coherent").is_err());
        assert_eq!(format!("{}", TraceMode::NonSequential), "NonSequential");
    }
    #[test]
    fn from_yaml() {
        let p = TraceParams::from_yaml(
            "mode: Sequential\nsequence:\n  elements: [0, 2, 3]\nmax_bounces: 7\nintensity_mode: Intensity\ndistributions:\n  2:\n    pattern: Cross\n    radial_density: 4\n",
        )
        .unwrap();
        assert_eq!(p.mode(), TraceMode::Sequential);
        assert_eq!(p.sequence().unwrap().next_after(ElementId(0)), Some(ElementId(2)));
        assert_eq!(p.max_bounces(), 7);
        assert_eq!(p.intensity_mode(), IntensityMode::Intensity);
        assert_eq!(p.distribution_for(ElementId(2)).pattern(), Pattern::Cross);
        assert_eq!(p.distribution_for(ElementId(2)).scaling(), 0.999);
        assert_eq!(p.lost_ray_length(), millimeter!(1000.0));
    }
    #[test]
    fn from_yaml_invalid() {
        assert_matches!(TraceParams::from_yaml("mode: Sideways"), Err(OptError::Config(_)));
        assert_matches!(
            TraceParams::from_yaml("intensity_threshold: -1.0"),
            Err(OptError::Config(_))
        );
        assert_matches!(
            TraceParams::from_yaml("default_distribution:\n  radial_density: 0\n"),
            Err(OptError::Config(_))
        );
    }
    #[test]
    fn yaml_round_trip() {
        let mut p = TraceParams::default();
        p.set_unobstructed(true);
        p.set_distribution(ElementId(4), Distribution::new(Pattern::Square, 2).unwrap());
        let back = TraceParams::from_yaml(&p.to_yaml().unwrap()).unwrap();
        assert_eq!(p, back);
    }
}

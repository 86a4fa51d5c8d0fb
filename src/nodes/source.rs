//! Light sources
//!
//! A [`Source`] emits the initial rays of a trace. Point and disk sources aim their rays at the sampling points of a
//! target element (the next element of a sequence or the entrance pupil of the system), ray list sources emit a fixed
//! set of lines.
use super::ElementId;
use crate::{
    distribution::Distribution,
    error::{OptError, OptResult},
    line::Line,
    meter, nanometer,
    ray::{Ray, RayId},
    shape::{Disk, Shape},
    system::System,
    trace::{TraceParams, TraceResult},
};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use uom::si::f64::Length;

/// A single line of the emission spectrum of a [`Source`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralLine {
    wavelength: Length,
    intensity: f64,
}
impl SpectralLine {
    /// Creates a new [`SpectralLine`].
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///  - the wavelength is <= 0.0 or not finite
    ///  - the intensity is < 0.0 or not finite
    pub fn new(wavelength: Length, intensity: f64) -> OptResult<Self> {
        if !wavelength.is_normal() || wavelength.is_sign_negative() {
            return Err(OptError::Config("wavelength must be > 0.0 and finite".into()));
        }
        if !intensity.is_finite() || intensity.is_sign_negative() {
            return Err(OptError::Config(
                "intensity must be >= 0.0 and finite".into(),
            ));
        }
        Ok(Self {
            wavelength,
            intensity,
        })
    }
    /// Returns the wavelength of this [`SpectralLine`].
    #[must_use]
    pub const fn wavelength(&self) -> Length {
        self.wavelength
    }
    /// Returns the intensity of this [`SpectralLine`].
    #[must_use]
    pub const fn intensity(&self) -> f64 {
        self.intensity
    }
}
impl Default for SpectralLine {
    /// The helium d line (587.56 nm) with unit intensity.
    fn default() -> Self {
        Self {
            wavelength: nanometer!(587.56),
            intensity: 1.0,
        }
    }
}

/// Emission geometry of a [`Source`].
#[derive(Debug, Clone)]
pub enum SourceKind {
    /// Point source at infinity. All rays are parallel to the given direction and start on the `z = 0` plane of the
    /// source.
    PointInfinity {
        /// propagation direction (unit length, in the source frame)
        direction: Vector3<f64>,
    },
    /// Point source located at the origin of the source frame.
    Point,
    /// Extended source: a disk in the XY plane of the source. Every sampling point of the disk acts as a point source.
    Disk {
        /// radius of the emitting disk in meter
        radius: f64,
        /// sampling of the emitting disk
        distribution: Distribution,
    },
    /// Explicit list of lines (in the source frame).
    Rays(Vec<Line>),
}

/// A light source.
#[derive(Debug, Clone)]
pub struct Source {
    kind: SourceKind,
    spectrum: Vec<SpectralLine>,
    polarization: Option<Vector3<f64>>,
}
impl Default for Source {
    /// A collimated source emitting along the z axis with the default spectral line.
    fn default() -> Self {
        Self {
            kind: SourceKind::PointInfinity {
                direction: Vector3::z(),
            },
            spectrum: vec![SpectralLine::default()],
            polarization: None,
        }
    }
}
impl Source {
    /// Creates a new point source at infinity emitting parallel rays along `direction`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the direction is not finite or has no z component.
    pub fn point_at_infinity(direction: Vector3<f64>) -> OptResult<Self> {
        if direction.iter().any(|c| !c.is_finite()) || direction.z == 0.0 {
            return Err(OptError::Config(
                "direction of a source at infinity must be finite and have a z component".into(),
            ));
        }
        Ok(Self {
            kind: SourceKind::PointInfinity {
                direction: direction.normalize(),
            },
            ..Self::default()
        })
    }
    /// Creates a new point source at the origin of its frame.
    #[must_use]
    pub fn point() -> Self {
        Self {
            kind: SourceKind::Point,
            ..Self::default()
        }
    }
    /// Creates a new extended disk source with the given radius and sampling.
    ///
    /// # Errors
    ///
    /// This function will return an error if the radius is not positive or not finite.
    pub fn disk(radius: Length, distribution: Distribution) -> OptResult<Self> {
        if !radius.is_normal() || radius.is_sign_negative() {
            return Err(OptError::Config(
                "radius of a disk source must be > 0.0 and finite".into(),
            ));
        }
        Ok(Self {
            kind: SourceKind::Disk {
                radius: radius.value,
                distribution,
            },
            ..Self::default()
        })
    }
    /// Creates a new source emitting the given lines.
    #[must_use]
    pub fn rays(lines: Vec<Line>) -> Self {
        Self {
            kind: SourceKind::Rays(lines),
            ..Self::default()
        }
    }
    /// Set the emission spectrum of this [`Source`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the spectrum is empty.
    pub fn with_spectrum(mut self, spectrum: Vec<SpectralLine>) -> OptResult<Self> {
        if spectrum.is_empty() {
            return Err(OptError::Config(
                "spectrum must contain at least one line".into(),
            ));
        }
        self.spectrum = spectrum;
        Ok(self)
    }
    /// Emit linearly polarized light with the given field direction (in the source frame).
    ///
    /// # Errors
    ///
    /// This function will return an error if the vector has a zero length or is not finite.
    pub fn with_polarization(mut self, field: Vector3<f64>) -> OptResult<Self> {
        if field.iter().any(|c| !c.is_finite()) || field.norm() < f64::EPSILON {
            return Err(OptError::Config(
                "polarization vector must be finite and non-zero".into(),
            ));
        }
        self.polarization = Some(field.normalize());
        Ok(self)
    }
    /// Returns the emission geometry of this [`Source`].
    #[must_use]
    pub const fn kind(&self) -> &SourceKind {
        &self.kind
    }
    /// Returns the emission spectrum of this [`Source`].
    #[must_use]
    pub fn spectrum(&self) -> &[SpectralLine] {
        &self.spectrum
    }
    /// Returns the polarization of this [`Source`] (`None` if unpolarized).
    #[must_use]
    pub const fn polarization(&self) -> Option<Vector3<f64>> {
        self.polarization
    }
    /// Returns `true` if this [`Source`] aims its rays at a target element.
    #[must_use]
    pub const fn needs_target(&self) -> bool {
        !matches!(self.kind, SourceKind::Rays(_))
    }
    /// Returns the radius of the emitting disk of an extended source.
    #[must_use]
    pub fn disk_radius(&self) -> Option<Length> {
        match &self.kind {
            SourceKind::Disk { radius, .. } => Some(meter!(*radius)),
            _ => None,
        }
    }
    /// Generate the initial rays of this [`Source`] (with id `id`) aimed at `target` and add them to `result`.
    ///
    /// All wavelengths of the spectrum are registered in the result. Returns the ids of the generated rays.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///  - a target is needed but not given or has no aperture
    ///  - the pattern is not supported by the aperture shape of the target
    ///  - a ray could not be constructed (e.g. a target point coincides with a point source)
    pub fn generate_rays(
        &self,
        id: ElementId,
        system: &System,
        params: &TraceParams,
        target: Option<ElementId>,
        result: &mut TraceResult,
    ) -> OptResult<Vec<RayId>> {
        for line in &self.spectrum {
            result.add_ray_wavelen(line.wavelength);
        }
        let targets = if self.needs_target() {
            self.target_points(id, system, params, target)?
        } else {
            Vec::new()
        };
        let lines = self.emitted_lines(&targets)?;
        let environment = system.environment();
        let mut ids = Vec::with_capacity(lines.len() * self.spectrum.len());
        for line in lines {
            for spectral_line in &self.spectrum {
                let mut ray = Ray::new(
                    id,
                    line,
                    spectral_line.wavelength,
                    spectral_line.intensity,
                    environment.clone(),
                )?;
                if let Some(field) = self.polarization {
                    ray.set_polarization(field)?;
                }
                ids.push(result.add_root_ray(ray));
            }
        }
        Ok(ids)
    }
    /// Lines (in the source frame) emitted towards the given target points.
    fn emitted_lines(&self, targets: &[Point3<f64>]) -> OptResult<Vec<Line>> {
        match &self.kind {
            SourceKind::PointInfinity { direction } => targets
                .iter()
                .map(|p| Line::new(p - direction * (p.z / direction.z), *direction))
                .collect(),
            SourceKind::Point => targets
                .iter()
                .map(|p| Line::new(Point3::origin(), p.coords))
                .collect(),
            SourceKind::Disk {
                radius,
                distribution,
            } => {
                let emitters = Disk::new(meter!(*radius))?.pattern(distribution, false)?;
                let mut lines = Vec::with_capacity(emitters.len() * targets.len());
                for e in &emitters {
                    let e = Point3::new(e.x, e.y, 0.0);
                    for p in targets {
                        lines.push(Line::new(e, p - e)?);
                    }
                }
                Ok(lines)
            }
            SourceKind::Rays(lines) => Ok(lines.clone()),
        }
    }
    /// Sampling points on the target aperture expressed in the source frame.
    fn target_points(
        &self,
        id: ElementId,
        system: &System,
        params: &TraceParams,
        target: Option<ElementId>,
    ) -> OptResult<Vec<Point3<f64>>> {
        let target = target.ok_or_else(|| {
            OptError::Config(format!("source {id} has no target to aim its rays at"))
        })?;
        let kind = system.element(target)?.kind();
        let shape = kind.aperture().ok_or_else(|| {
            OptError::Config(format!("target {target} of source {id} has no aperture"))
        })?;
        let pattern = shape.pattern(params.distribution_for(target), params.unobstructed())?;
        let to_source = system.transform(target, id)?;
        Ok(pattern
            .iter()
            .map(|xy| to_source.apply_point(&Point3::new(xy.x, xy.y, kind.sagitta(xy))))
            .collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        distribution::Pattern,
        millimeter,
        nodes::{Element, Stop},
        utils::geom_transformation::Transform,
    };
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use std::sync::Arc;

    fn system_with_stop(source: Source) -> (System, ElementId, ElementId) {
        let mut s = System::new();
        let src = s.add(Element::new("source", source));
        let stop = s.add(
            Element::new(
                "stop",
                Stop::new(Arc::new(Disk::new(millimeter!(10.0)).unwrap())),
            )
            .with_transform(Transform::new_along_z(millimeter!(100.0)).unwrap()),
        );
        (s, src, stop)
    }
    #[test]
    fn spectral_line() {
        assert!(SpectralLine::new(nanometer!(0.0), 1.0).is_err());
        assert!(SpectralLine::new(nanometer!(500.0), -1.0).is_err());
        let l = SpectralLine::new(nanometer!(500.0), 0.5).unwrap();
        assert_eq!(l.wavelength(), nanometer!(500.0));
        assert_eq!(l.intensity(), 0.5);
        assert_eq!(SpectralLine::default().wavelength(), nanometer!(587.56));
    }
    #[test]
    fn constructors() {
        assert!(Source::point_at_infinity(Vector3::x()).is_err());
        assert!(Source::point_at_infinity(Vector3::new(0.0, 0.0, f64::NAN)).is_err());
        assert!(Source::disk(millimeter!(0.0), Distribution::default()).is_err());
        let s = Source::disk(millimeter!(1.0), Distribution::default()).unwrap();
        assert_eq!(s.disk_radius(), Some(millimeter!(1.0)));
        assert!(s.needs_target());
        assert!(!Source::rays(vec![]).needs_target());
        assert!(Source::point().with_spectrum(vec![]).is_err());
        assert!(Source::point().with_polarization(Vector3::zeros()).is_err());
        assert_matches!(Source::default().kind(), SourceKind::PointInfinity { .. });
        assert_eq!(Source::default().spectrum().len(), 1);
    }
    #[test]
    fn generate_collimated() {
        let (system, src, stop) = system_with_stop(Source::default());
        let mut params = TraceParams::default();
        params.set_distribution(stop, Distribution::new(Pattern::Cross, 3).unwrap());
        let mut result = TraceResult::new();
        let ids = Source::default()
            .generate_rays(src, &system, &params, Some(stop), &mut result)
            .unwrap();
        assert_eq!(ids.len(), 13);
        assert_eq!(result.wavelengths(), &[nanometer!(587.56)]);
        for id in ids {
            let ray = result.ray(id).unwrap();
            assert_abs_diff_eq!(ray.line().origin().z, 0.0);
            assert_abs_diff_eq!(ray.line().direction(), Vector3::z());
            assert_eq!(ray.creator(), src);
        }
    }
    #[test]
    fn generate_point() {
        let source = Source::point()
            .with_spectrum(vec![
                SpectralLine::new(nanometer!(500.0), 1.0).unwrap(),
                SpectralLine::new(nanometer!(600.0), 1.0).unwrap(),
            ])
            .unwrap();
        let (system, src, stop) = system_with_stop(source.clone());
        let mut params = TraceParams::default();
        params.set_distribution(stop, Distribution::new(Pattern::Meridional, 2).unwrap());
        let mut result = TraceResult::new();
        let ids = source
            .generate_rays(src, &system, &params, Some(stop), &mut result)
            .unwrap();
        assert_eq!(ids.len(), 10);
        assert_eq!(result.wavelengths().len(), 2);
        let first = result.ray(ids[0]).unwrap();
        assert_eq!(first.line().origin(), Point3::origin());
        assert_abs_diff_eq!(first.line().direction(), Vector3::z());
    }
    #[test]
    fn generate_without_target() {
        let (system, src, _) = system_with_stop(Source::default());
        let mut result = TraceResult::new();
        assert!(Source::default()
            .generate_rays(src, &system, &TraceParams::default(), None, &mut result)
            .is_err());
        let line = Line::new(Point3::origin(), Vector3::z()).unwrap();
        let ids = Source::rays(vec![line, line])
            .generate_rays(src, &system, &TraceParams::default(), None, &mut result)
            .unwrap();
        assert_eq!(ids.len(), 2);
    }
    #[test]
    fn generate_target_without_aperture() {
        let mut system = System::new();
        let src = system.add(Element::new("source", Source::default()));
        let group = system.add(Element::group("group"));
        let mut result = TraceResult::new();
        assert!(Source::default()
            .generate_rays(src, &system, &TraceParams::default(), Some(group), &mut result)
            .is_err());
    }
}

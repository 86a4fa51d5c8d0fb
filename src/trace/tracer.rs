//! Ray propagation through a system
//!
//! The [`Tracer`] emits the rays of all enabled sources and propagates them through a [`System`] until they are
//! absorbed, lost, discarded or reach the bounce limit. Rays are processed depth first: the children spawned at an
//! intercept are put in front of the work list.
use super::{IntensityMode, TraceMode, TraceParams, TraceResult};
use crate::{
    error::{OptError, OptResult},
    line::Line,
    material::MaterialRef,
    nodes::{ElementId, ElementKind, OpticalSurface},
    ray::{fresnel_split, reflect_direction, reflect_field, refract_direction, Ray, RayId},
    system::{Sequence, System},
    utils::geom_transformation::Transform,
};
use log::{debug, info, warn};
use nalgebra::{Point3, Vector3};
use std::collections::VecDeque;

/// Intercepts closer than this distance (in meter) to the ray origin are ignored.
const MIN_DISTANCE: f64 = 1e-12;

/// Intercept of a ray with an element, expressed in the local frame of the element.
#[derive(Debug, Clone, Copy)]
struct Hit {
    element: ElementId,
    point: Point3<f64>,
    normal: Vector3<f64>,
    distance: f64,
    /// incoming ray direction
    direction: Vector3<f64>,
    /// transform from the frame of the creator of the ray into the frame of the element
    transform: Transform,
    /// position of the element in the sequence (sequential traces only)
    step: Option<usize>,
}

/// Ray tracer for an optical [`System`].
#[derive(Debug)]
pub struct Tracer<'a> {
    system: &'a System,
    params: TraceParams,
}
impl<'a> Tracer<'a> {
    /// Creates a new [`Tracer`] for the given system using default [`TraceParams`].
    #[must_use]
    pub fn new(system: &'a System) -> Self {
        Self {
            system,
            params: TraceParams::default(),
        }
    }
    /// Creates a new [`Tracer`] for the given system using the given parameters.
    #[must_use]
    pub const fn with_params(system: &'a System, params: TraceParams) -> Self {
        Self { system, params }
    }
    /// Returns the parameters of this [`Tracer`].
    #[must_use]
    pub const fn params(&self) -> &TraceParams {
        &self.params
    }
    /// Returns the parameters of this [`Tracer`] for modification.
    pub fn params_mut(&mut self) -> &mut TraceParams {
        &mut self.params
    }
    /// Trace the system and return a new [`TraceResult`].
    ///
    /// The intercepted rays of all image elements are saved in the result.
    ///
    /// # Errors
    ///
    /// This function will return an error on the first configuration problem encountered (see
    /// [`Tracer::trace_into`]).
    pub fn trace(&self) -> OptResult<TraceResult> {
        let mut result = TraceResult::new();
        for (id, element) in self.system.iter() {
            if matches!(element.kind(), ElementKind::Image(_)) {
                result.set_intercepted_save_state(id, true);
            }
        }
        self.trace_into(&mut result)?;
        Ok(result)
    }
    /// Trace the system into an existing [`TraceResult`]. The result is cleared first.
    ///
    /// If the trace fails, the result is left empty.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the result has been used with another system
    ///   - a source has no target (no entrance pupil, or no following element in a sequence)
    ///   - a ray distribution is not supported by the aperture of a target
    ///   - a ray creator is not part of the sequence in sequential mode
    ///   - a material model fails for a ray wavelength
    pub fn trace_into(&self, result: &mut TraceResult) -> OptResult<()> {
        result.prepare(self.system.uid())?;
        let outcome = self.run(result);
        if outcome.is_err() {
            result.clear();
        }
        outcome
    }
    fn run(&self, result: &mut TraceResult) -> OptResult<()> {
        let sequence = match self.params.mode() {
            TraceMode::Sequential => Some(match self.params.sequence() {
                Some(seq) => {
                    for id in seq.iter() {
                        let kind = self.system.element(*id)?.kind();
                        if !kind.is_interceptable() && !matches!(kind, ElementKind::Source(_)) {
                            warn!("{id} ({}) in sequence cannot be hit by rays", kind.name());
                        }
                    }
                    seq.clone()
                }
                None => {
                    let seq = Sequence::from_system(self.system)?;
                    info!("using sequence derived from element positions: {seq:?}");
                    seq
                }
            }),
            TraceMode::NonSequential => None,
        };
        info!(
            "start {} trace ({} mode) of {} elements",
            self.params.mode(),
            self.params.intensity_mode(),
            self.system.len()
        );
        let mut work_list = VecDeque::new();
        for (id, element) in self.system.iter() {
            let ElementKind::Source(source) = element.kind() else {
                continue;
            };
            if !element.is_enabled() {
                continue;
            }
            let target = if source.needs_target() {
                match &sequence {
                    Some(seq) => Some(seq.next_after(id).ok_or_else(|| {
                        OptError::Config(format!("{id} has no following element in the sequence"))
                    })?),
                    None => Some(self.system.entrance_pupil()?),
                }
            } else {
                None
            };
            let rays = source.generate_rays(id, self.system, &self.params, target, result)?;
            debug!("{id} emitted {} rays", rays.len());
            work_list.extend(rays);
        }
        let root_count = work_list.len();
        while let Some(ray_id) = work_list.pop_front() {
            let children = self.propagate(ray_id, sequence.as_ref(), result)?;
            for child in children.into_iter().rev() {
                work_list.push_front(child);
            }
        }
        info!(
            "trace finished: {root_count} source rays, {} rays total, {} lost",
            result.rays().len(),
            result.lost_count()
        );
        if result.bounce_limit_count() > 0 {
            warn!(
                "{} rays reached the bounce limit of {}",
                result.bounce_limit_count(),
                self.params.max_bounces()
            );
        }
        Ok(())
    }
    /// Propagate a single ray to its next intercept and return the ids of the spawned rays.
    fn propagate(
        &self,
        ray_id: RayId,
        sequence: Option<&Sequence>,
        result: &mut TraceResult,
    ) -> OptResult<Vec<RayId>> {
        let ray = result.ray(ray_id)?.clone();
        if ray.generation() >= self.params.max_bounces() {
            debug!("{ray_id} reached the bounce limit");
            result.count_bounce_limit();
            return Ok(Vec::new());
        }
        let hit = match sequence {
            Some(seq) => self.next_sequential(seq, &ray)?,
            None => self.next_non_sequential(&ray)?,
        };
        let Some(hit) = hit else {
            debug!("{ray_id} lost");
            result.mark_lost(ray_id, self.params.lost_ray_length().value)?;
            return Ok(Vec::new());
        };
        result.record_intercept(ray_id, hit.element, hit.point, hit.distance)?;
        let intensity = match self.params.intensity_mode() {
            IntensityMode::Simple => ray.intensity(),
            IntensityMode::Intensity | IntensityMode::Polarized => {
                ray.intensity()
                    * ray
                        .material()
                        .internal_transmittance(ray.wavelength(), hit.distance)
            }
        };
        if intensity <= self.params.intensity_threshold() {
            debug!("{ray_id} discarded at {}", hit.element);
            return Ok(Vec::new());
        }
        let children = match self.system.element(hit.element)?.kind() {
            ElementKind::OpticalSurface(surface) => {
                self.interact_surface(surface, &hit, &ray, intensity)?
            }
            ElementKind::Stop(stop) => {
                if stop.transmits(&hit.point) {
                    let mut child = spawn(&ray, &hit, hit.direction, intensity);
                    child.set_field(self.field_at(&ray, &hit));
                    vec![child]
                } else {
                    Vec::new()
                }
            }
            ElementKind::Image(_) | ElementKind::Group | ElementKind::Source(_) => Vec::new(),
        };
        children
            .into_iter()
            .filter(|c| c.intensity() > self.params.intensity_threshold())
            .map(|c| result.add_child(ray_id, c))
            .collect()
    }
    /// Find the nearest element hit by the ray (non-sequential mode).
    ///
    /// All enabled elements except the creator of the ray are tested. On equal distances the element with the lower id
    /// wins.
    fn next_non_sequential(&self, ray: &Ray) -> OptResult<Option<Hit>> {
        let mut nearest: Option<Hit> = None;
        for (id, element) in self.system.iter() {
            if id == ray.creator() || !element.is_enabled() || !element.kind().is_interceptable() {
                continue;
            }
            if let Some(hit) = self.hit(ray, id, element.kind(), false)? {
                if nearest.is_none_or(|n| hit.distance < n.distance) {
                    nearest = Some(hit);
                }
            }
        }
        Ok(nearest)
    }
    /// Test the next enabled element of the sequence (sequential mode).
    ///
    /// Rays spawned during the trace continue after the sequence step of their creator, so elements may appear more
    /// than once. Source rays start after the first occurrence of their source.
    fn next_sequential(&self, sequence: &Sequence, ray: &Ray) -> OptResult<Option<Hit>> {
        let step = match ray.sequence_step() {
            Some(step) => step,
            None => sequence.position(ray.creator()).ok_or_else(|| {
                OptError::Trace(format!(
                    "creator {} of ray is not part of the sequence",
                    ray.creator()
                ))
            })?,
        };
        for (offset, id) in sequence.following_step(step).iter().enumerate() {
            let element = self.system.element(*id)?;
            if !element.is_enabled() || !element.kind().is_interceptable() {
                continue;
            }
            let hit = self.hit(ray, *id, element.kind(), true)?;
            return Ok(hit.map(|hit| Hit {
                step: Some(step + 1 + offset),
                ..hit
            }));
        }
        Ok(None)
    }
    fn hit(
        &self,
        ray: &Ray,
        id: ElementId,
        kind: &ElementKind,
        sequential: bool,
    ) -> OptResult<Option<Hit>> {
        let transform = self.system.transform(ray.creator(), id)?;
        let line = transform.apply_line(ray.line());
        let Some((point, normal)) = kind.intercept(&line, self.params.unobstructed(), sequential)
        else {
            return Ok(None);
        };
        let distance = (point - line.origin()).dot(&line.direction());
        if distance > self.params.lost_ray_length().value {
            debug!("{id} beyond the lost ray length");
            return Ok(None);
        }
        Ok((distance > MIN_DISTANCE).then_some(Hit {
            element: id,
            point,
            normal,
            distance,
            direction: line.direction(),
            transform,
            step: None,
        }))
    }
    /// Field direction of the ray in the frame of the hit element. Polarization is only tracked in
    /// [`IntensityMode::Polarized`].
    fn field_at(&self, ray: &Ray, hit: &Hit) -> Option<Vector3<f64>> {
        match self.params.intensity_mode() {
            IntensityMode::Polarized => ray.polarization().map(|f| hit.transform.apply_vector(&f)),
            IntensityMode::Simple | IntensityMode::Intensity => None,
        }
    }
    /// Apply the interaction rules of an optical surface.
    fn interact_surface(
        &self,
        surface: &OpticalSurface,
        hit: &Hit,
        ray: &Ray,
        intensity: f64,
    ) -> OptResult<Vec<Ray>> {
        let d = hit.direction;
        let normal = hit.normal;
        let (from, to) = surface.media(&d, &normal);
        let wavelength = ray.wavelength();
        let mode = self.params.intensity_mode();
        let field = self.field_at(ray, hit);
        let reflected_field = field.map(|f| reflect_field(&f, &normal));
        let reflected = |intensity: f64, field: Option<Vector3<f64>>| {
            let mut child = spawn(ray, hit, reflect_direction(&d, &normal), intensity);
            child.set_material(from.clone());
            child.set_field(field);
            child
        };
        if to.is_reflecting() {
            let reflectance = match mode {
                IntensityMode::Simple => 1.0,
                IntensityMode::Intensity | IntensityMode::Polarized => {
                    to.normal_reflectance(from.as_ref(), wavelength)?
                }
            };
            return Ok(vec![reflected(intensity * reflectance, reflected_field)]);
        }
        if to.is_opaque() {
            return Ok(Vec::new());
        }
        let n1 = from.refractive_index(wavelength)?;
        let n2 = to.refractive_index(wavelength)?;
        let Some(t_dir) = refract_direction(&d, &normal, n1 / n2) else {
            debug!("total internal reflection at {}", hit.element);
            return Ok(vec![reflected(intensity, reflected_field)]);
        };
        let transmitted = |intensity: f64, field: Option<Vector3<f64>>| {
            let mut child = spawn(ray, hit, t_dir, intensity);
            child.set_material(MaterialRef::clone(to));
            child.set_field(field);
            child
        };
        match mode {
            IntensityMode::Simple => Ok(vec![transmitted(intensity, None)]),
            IntensityMode::Intensity => {
                let reflectance = to.normal_reflectance(from.as_ref(), wavelength)?;
                Ok(vec![
                    transmitted(intensity * (1.0 - reflectance), None),
                    reflected(intensity * reflectance, None),
                ])
            }
            IntensityMode::Polarized => {
                let Some(split) = fresnel_split(&d, &normal, field.as_ref(), n1, n2) else {
                    return Ok(vec![reflected(intensity, reflected_field)]);
                };
                Ok(vec![
                    transmitted(intensity * split.transmittance, split.transmitted_field),
                    reflected(intensity * split.reflectance, split.reflected_field),
                ])
            }
        }
    }
}

/// Spawn a child ray starting at the intercept with the given direction (in the frame of the hit element).
fn spawn(ray: &Ray, hit: &Hit, direction: Vector3<f64>, intensity: f64) -> Ray {
    let mut child = ray.spawn(hit.element, Line::from_unit(hit.point, direction.normalize()));
    child.set_intensity(intensity);
    child.set_sequence_step(hit.step);
    child
}

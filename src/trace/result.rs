//! Result of a ray trace
//!
//! A [`TraceResult`] owns all rays of one trace in an arena. For elements flagged for saving it additionally keeps
//! the lists of intercepted and generated rays.
use crate::{
    error::{OptError, OptResult},
    nodes::ElementId,
    ray::{Ray, RayId},
    utils::usize_to_f64,
};
use nalgebra::Point3;
use std::collections::{BTreeMap, BTreeSet};
use uom::si::f64::Length;

/// Rays and per-element statistics of a ray trace.
#[derive(Debug, Clone, Default)]
pub struct TraceResult {
    system_uid: Option<u64>,
    rays: Vec<Ray>,
    root_rays: Vec<RayId>,
    save_intercepted: BTreeSet<ElementId>,
    save_generated: BTreeSet<ElementId>,
    intercepted: BTreeMap<ElementId, Vec<RayId>>,
    generated: BTreeMap<ElementId, Vec<RayId>>,
    wavelengths: Vec<Length>,
    bounce_limit_count: usize,
    lost_count: usize,
}
impl TraceResult {
    /// Creates a new (empty) [`TraceResult`] not saving any per-element lists.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Enable or disable saving of the rays intercepted by the given element.
    pub fn set_intercepted_save_state(&mut self, id: ElementId, save: bool) {
        if save {
            self.save_intercepted.insert(id);
            self.intercepted.entry(id).or_default();
        } else {
            self.save_intercepted.remove(&id);
            self.intercepted.remove(&id);
        }
    }
    /// Enable or disable saving of the rays generated by the given element.
    pub fn set_generated_save_state(&mut self, id: ElementId, save: bool) {
        if save {
            self.save_generated.insert(id);
            self.generated.entry(id).or_default();
        } else {
            self.save_generated.remove(&id);
            self.generated.remove(&id);
        }
    }
    /// Remove all rays and statistics. Save states and the binding to a system are kept.
    pub fn clear(&mut self) {
        self.rays.clear();
        self.root_rays.clear();
        self.wavelengths.clear();
        self.bounce_limit_count = 0;
        self.lost_count = 0;
        self.intercepted = self.save_intercepted.iter().map(|id| (*id, Vec::new())).collect();
        self.generated = self.save_generated.iter().map(|id| (*id, Vec::new())).collect();
    }
    /// Bind this result to a system (on first use) and clear it.
    ///
    /// # Errors
    ///
    /// This function will return an error if the result is already bound to another system.
    pub(crate) fn prepare(&mut self, system_uid: u64) -> OptResult<()> {
        match self.system_uid {
            Some(uid) if uid != system_uid => {
                return Err(OptError::Trace(
                    "trace result is already used with another system".into(),
                ))
            }
            _ => self.system_uid = Some(system_uid),
        }
        self.clear();
        Ok(())
    }
    /// Returns the identity of the system this result is bound to.
    #[must_use]
    pub const fn system_uid(&self) -> Option<u64> {
        self.system_uid
    }
    /// Returns the ray with the given id.
    ///
    /// # Errors
    ///
    /// This function will return an error if the id does not exist.
    pub fn ray(&self, id: RayId) -> OptResult<&Ray> {
        self.rays
            .get(id.0)
            .ok_or_else(|| OptError::Trace(format!("{id} does not exist")))
    }
    fn ray_mut(&mut self, id: RayId) -> OptResult<&mut Ray> {
        self.rays
            .get_mut(id.0)
            .ok_or_else(|| OptError::Trace(format!("{id} does not exist")))
    }
    /// Returns all rays of the trace.
    #[must_use]
    pub fn rays(&self) -> &[Ray] {
        &self.rays
    }
    /// Returns the rays emitted by sources.
    #[must_use]
    pub fn root_rays(&self) -> &[RayId] {
        &self.root_rays
    }
    /// Returns the rays which hit the given element.
    ///
    /// # Errors
    ///
    /// This function will return an error if intercepted rays are not saved for this element.
    pub fn intercepted(&self, id: ElementId) -> OptResult<&[RayId]> {
        self.intercepted
            .get(&id)
            .map(Vec::as_slice)
            .ok_or_else(|| OptError::Trace(format!("intercepted rays of {id} are not saved")))
    }
    /// Returns the rays generated by the given element.
    ///
    /// # Errors
    ///
    /// This function will return an error if generated rays are not saved for this element.
    pub fn generated(&self, id: ElementId) -> OptResult<&[RayId]> {
        self.generated
            .get(&id)
            .map(Vec::as_slice)
            .ok_or_else(|| OptError::Trace(format!("generated rays of {id} are not saved")))
    }
    /// Register a wavelength used during the trace.
    pub fn add_ray_wavelen(&mut self, wavelength: Length) {
        if !self.wavelengths.contains(&wavelength) {
            self.wavelengths.push(wavelength);
        }
    }
    /// Returns all wavelengths used during the trace (in registration order).
    #[must_use]
    pub fn wavelengths(&self) -> &[Length] {
        &self.wavelengths
    }
    /// Returns the number of rays which were not propagated because the bounce limit was reached.
    #[must_use]
    pub const fn bounce_limit_count(&self) -> usize {
        self.bounce_limit_count
    }
    pub(crate) fn count_bounce_limit(&mut self) {
        self.bounce_limit_count += 1;
    }
    /// Returns the number of rays which left the system without hitting any element.
    #[must_use]
    pub const fn lost_count(&self) -> usize {
        self.lost_count
    }
    fn push(&mut self, ray: Ray) -> RayId {
        let id = RayId(self.rays.len());
        if let Some(list) = self.generated.get_mut(&ray.creator()) {
            list.push(id);
        }
        self.rays.push(ray);
        id
    }
    /// Add a ray emitted by a source.
    pub(crate) fn add_root_ray(&mut self, ray: Ray) -> RayId {
        let id = self.push(ray);
        self.root_rays.push(id);
        id
    }
    /// Add a ray spawned at the intercept of `parent`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the parent does not exist.
    pub(crate) fn add_child(&mut self, parent: RayId, mut ray: Ray) -> OptResult<RayId> {
        self.ray(parent)?;
        ray.set_parent(parent);
        let id = self.push(ray);
        self.ray_mut(parent)?.add_child(id);
        Ok(id)
    }
    /// Record the intercept of a ray with an element.
    ///
    /// # Errors
    ///
    /// This function will return an error if the ray does not exist.
    pub(crate) fn record_intercept(
        &mut self,
        id: RayId,
        element: ElementId,
        point: Point3<f64>,
        length: f64,
    ) -> OptResult<()> {
        self.ray_mut(id)?.set_intercept(element, point, length);
        if let Some(list) = self.intercepted.get_mut(&element) {
            list.push(id);
        }
        Ok(())
    }
    /// Mark a ray as lost.
    ///
    /// # Errors
    ///
    /// This function will return an error if the ray does not exist.
    pub(crate) fn mark_lost(&mut self, id: RayId, length: f64) -> OptResult<()> {
        self.ray_mut(id)?.set_lost(length);
        self.lost_count += 1;
        Ok(())
    }
    fn intercept_points(&self, id: ElementId) -> OptResult<Vec<Point3<f64>>> {
        self.intercepted(id)?
            .iter()
            .map(|ray_id| {
                self.ray(*ray_id)?
                    .intercept()
                    .map(|i| i.point)
                    .ok_or_else(|| OptError::Trace(format!("{ray_id} has no intercept")))
            })
            .collect()
    }
    /// Returns the centroid of the intercept points (in the local frame of the element).
    ///
    /// Returns `None` if no ray hit the element.
    ///
    /// # Errors
    ///
    /// This function will return an error if intercepted rays are not saved for this element.
    pub fn intercepted_centroid(&self, id: ElementId) -> OptResult<Option<Point3<f64>>> {
        let points = self.intercept_points(id)?;
        if points.is_empty() {
            return Ok(None);
        }
        let sum = points.iter().fold(Point3::origin().coords, |acc, p| acc + p.coords);
        Ok(Some(Point3::from(sum / usize_to_f64(points.len()))))
    }
    /// Returns the bounding box `(min, max)` of the intercept points (in the local frame of the element).
    ///
    /// Returns `None` if no ray hit the element.
    ///
    /// # Errors
    ///
    /// This function will return an error if intercepted rays are not saved for this element.
    pub fn intercepted_window(&self, id: ElementId) -> OptResult<Option<(Point3<f64>, Point3<f64>)>> {
        let points = self.intercept_points(id)?;
        let Some(first) = points.first() else {
            return Ok(None);
        };
        Ok(Some(points.iter().fold((*first, *first), |(min, max), p| {
            (min.inf(p), max.sup(p))
        })))
    }
}

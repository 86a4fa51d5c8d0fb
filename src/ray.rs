#![warn(missing_docs)]
//! Module for handling optical rays
//!
//! A [`Ray`] is a straight segment of light emitted by a source or spawned by a surface interaction. All rays of a
//! trace live in the arena of a [`TraceResult`](crate::trace::TraceResult) and are linked by [`RayId`]s forming a
//! ray tree. The line of a ray is given in the local frame of the element which created it.
//!
//! The free functions of this module implement the physics at an interface between two media: the law of reflection,
//! Snell's law in vector form and the Fresnel equations.
use crate::{
    error::{OptError, OptResult},
    line::Line,
    material::MaterialRef,
    nodes::ElementId,
};
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uom::si::f64::Length;

/// Index of a [`Ray`] in the arena of a trace result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RayId(pub(crate) usize);

impl RayId {
    /// Returns the arena index of this [`RayId`].
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0
    }
}
impl Display for RayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ray #{}", self.0)
    }
}

/// Location where a ray hit an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intercept {
    /// the element hit by the ray
    pub element: ElementId,
    /// intercept point in the local frame of the element
    pub point: Point3<f64>,
}

///Struct that contains all information about an optical ray
#[derive(Debug, Clone)]
pub struct Ray {
    line: Line,
    wavelength: Length,
    intensity: f64,
    /// medium the ray is propagating in
    material: MaterialRef,
    /// direction of the electric field (unit length, perpendicular to the ray). `None` for unpolarized light.
    polarization: Option<Vector3<f64>>,
    creator: ElementId,
    parent: Option<RayId>,
    children: Vec<RayId>,
    intercept: Option<Intercept>,
    /// travelled length until the intercept (or the lost-ray length)
    length: Option<f64>,
    generation: usize,
    /// position of the creator in the sequence of a sequential trace
    sequence_step: Option<usize>,
    lost: bool,
}
impl Ray {
    /// Creates a new [`Ray`].
    ///
    /// The `line` is given in the local frame of the `creator` element.
    ///
    /// # Errors
    /// This function returns an error if
    ///  - the given wavelength is <= 0.0, `NaN` or +inf
    ///  - the given intensity is < 0.0, `NaN` or +inf
    pub fn new(
        creator: ElementId,
        line: Line,
        wavelength: Length,
        intensity: f64,
        material: MaterialRef,
    ) -> OptResult<Self> {
        if !wavelength.is_normal() || wavelength.is_sign_negative() {
            return Err(OptError::Config("wavelength must be > 0.0 and finite".into()));
        }
        if !intensity.is_finite() || intensity.is_sign_negative() {
            return Err(OptError::Config(
                "intensity must be >= 0.0 and finite".into(),
            ));
        }
        Ok(Self {
            line,
            wavelength,
            intensity,
            material,
            polarization: None,
            creator,
            parent: None,
            children: Vec::new(),
            intercept: None,
            length: None,
            generation: 0,
            sequence_step: None,
            lost: false,
        })
    }
    /// Create a child of this [`Ray`] starting at `line` in the frame of `creator`.
    ///
    /// The child inherits the wavelength, the intensity and the medium. Linking into the ray tree is done by the
    /// trace result when the child is added.
    #[must_use]
    pub(crate) fn spawn(&self, creator: ElementId, line: Line) -> Self {
        Self {
            line,
            wavelength: self.wavelength,
            intensity: self.intensity,
            material: self.material.clone(),
            polarization: self.polarization,
            creator,
            parent: None,
            children: Vec::new(),
            intercept: None,
            length: None,
            generation: self.generation + 1,
            sequence_step: None,
            lost: false,
        }
    }
    /// Set the polarization (direction of the electric field) of this [`Ray`].
    ///
    /// The given vector is projected onto the plane perpendicular to the ray direction.
    ///
    /// # Errors
    ///
    /// This function will return an error if the projected vector has a zero length or is not finite.
    pub fn set_polarization(&mut self, field: Vector3<f64>) -> OptResult<()> {
        self.polarization = Some(transverse_unit(&field, &self.line.direction()).ok_or_else(
            || OptError::Config("polarization must not be parallel to the ray direction".into()),
        )?);
        Ok(())
    }
    /// Returns the line of this [`Ray`] in the frame of its creator.
    #[must_use]
    pub const fn line(&self) -> &Line {
        &self.line
    }
    /// Returns the wavelength of this [`Ray`].
    #[must_use]
    pub const fn wavelength(&self) -> Length {
        self.wavelength
    }
    /// Returns the intensity of this [`Ray`].
    #[must_use]
    pub const fn intensity(&self) -> f64 {
        self.intensity
    }
    pub(crate) fn set_intensity(&mut self, intensity: f64) {
        self.intensity = intensity;
    }
    /// Returns the medium this [`Ray`] is propagating in.
    #[must_use]
    pub const fn material(&self) -> &MaterialRef {
        &self.material
    }
    pub(crate) fn set_material(&mut self, material: MaterialRef) {
        self.material = material;
    }
    /// Returns the polarization of this [`Ray`] (`None` if unpolarized).
    #[must_use]
    pub const fn polarization(&self) -> Option<Vector3<f64>> {
        self.polarization
    }
    pub(crate) fn set_field(&mut self, field: Option<Vector3<f64>>) {
        self.polarization = field;
    }
    /// Returns the element which created this [`Ray`].
    #[must_use]
    pub const fn creator(&self) -> ElementId {
        self.creator
    }
    /// Returns the parent of this [`Ray`] (`None` for rays emitted by a source).
    #[must_use]
    pub const fn parent(&self) -> Option<RayId> {
        self.parent
    }
    pub(crate) fn set_parent(&mut self, parent: RayId) {
        self.parent = Some(parent);
    }
    /// Returns the rays spawned at the intercept of this [`Ray`].
    #[must_use]
    pub fn children(&self) -> &[RayId] {
        &self.children
    }
    pub(crate) fn add_child(&mut self, child: RayId) {
        self.children.push(child);
    }
    /// Returns the intercept of this [`Ray`] (`None` if the ray did not hit anything).
    #[must_use]
    pub const fn intercept(&self) -> Option<Intercept> {
        self.intercept
    }
    pub(crate) fn set_intercept(&mut self, element: ElementId, point: Point3<f64>, length: f64) {
        self.intercept = Some(Intercept { element, point });
        self.length = Some(length);
    }
    /// Returns the travelled length (in meter) of this [`Ray`].
    ///
    /// This is the distance to the intercept point, the lost-ray length for lost rays or `None` if the ray has not
    /// been propagated.
    #[must_use]
    pub const fn length(&self) -> Option<f64> {
        self.length
    }
    /// Returns the number of interactions preceding this [`Ray`].
    #[must_use]
    pub const fn generation(&self) -> usize {
        self.generation
    }
    /// Returns the position of the creator of this [`Ray`] within the sequence of a sequential trace.
    ///
    /// This is `None` for source rays and for rays of non-sequential traces.
    #[must_use]
    pub const fn sequence_step(&self) -> Option<usize> {
        self.sequence_step
    }
    pub(crate) fn set_sequence_step(&mut self, step: Option<usize>) {
        self.sequence_step = step;
    }
    /// Returns `true` if this [`Ray`] left the system without hitting any element.
    #[must_use]
    pub const fn is_lost(&self) -> bool {
        self.lost
    }
    pub(crate) fn set_lost(&mut self, length: f64) {
        self.lost = true;
        self.length = Some(length);
    }
}

/// Returns the direction of the reflected ray for a ray with direction `d` hitting a surface with unit normal `n`.
///
/// The orientation of the normal is irrelevant.
#[must_use]
pub fn reflect_direction(d: &Vector3<f64>, n: &Vector3<f64>) -> Vector3<f64> {
    d - n * (2.0 * d.dot(n))
}

/// Returns the direction of the refracted ray using Snell's law in vector form.
///
/// `eta` is the ratio `n1 / n2` of the refractive indices of the incident and the transmitting medium. The normal is
/// oriented along the incident direction internally, so its orientation is irrelevant. Returns `None` for total
/// internal reflection.
#[must_use]
pub fn refract_direction(d: &Vector3<f64>, n: &Vector3<f64>, eta: f64) -> Option<Vector3<f64>> {
    let n = oriented_along(n, d);
    let cos_i = n.dot(d);
    let sin2_t = eta * eta * cos_i.mul_add(-cos_i, 1.0);
    if sin2_t > 1.0 {
        return None;
    }
    let t = d * eta - n * eta.mul_add(cos_i, -(1.0 - sin2_t).sqrt());
    t.try_normalize(f64::EPSILON)
}

/// Reflection and transmission at an interface for a polarized (or unpolarized) ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FresnelSplit {
    /// fraction of the intensity being reflected
    pub reflectance: f64,
    /// fraction of the intensity being transmitted
    pub transmittance: f64,
    /// electric field direction of the reflected ray
    pub reflected_field: Option<Vector3<f64>>,
    /// electric field direction of the transmitted ray
    pub transmitted_field: Option<Vector3<f64>>,
}

/// Evaluate the Fresnel equations for a ray with direction `d` and field direction `field` hitting an interface with
/// normal `n` between media with refractive indices `n1` and `n2`.
///
/// For unpolarized light (`field` is `None`) the reflectance is the average of the s and p reflectances. Returns
/// `None` for total internal reflection.
#[must_use]
pub fn fresnel_split(
    d: &Vector3<f64>,
    n: &Vector3<f64>,
    field: Option<&Vector3<f64>>,
    n1: f64,
    n2: f64,
) -> Option<FresnelSplit> {
    let n = oriented_along(n, d);
    let t_dir = refract_direction(d, &n, n1 / n2)?;
    let r_dir = reflect_direction(d, &n);
    let cos_i = n.dot(d).clamp(0.0, 1.0);
    let cos_t = n.dot(&t_dir).clamp(0.0, 1.0);
    let r_s = n1.mul_add(cos_i, -n2 * cos_t) / n1.mul_add(cos_i, n2 * cos_t);
    let r_p = n2.mul_add(cos_i, -n1 * cos_t) / n2.mul_add(cos_i, n1 * cos_t);
    let (refl_s, refl_p) = (r_s * r_s, r_p * r_p);
    let Some(field) = field.and_then(|f| transverse_unit(f, d)) else {
        let reflectance = 0.5 * (refl_s + refl_p);
        return Some(FresnelSplit {
            reflectance,
            transmittance: 1.0 - reflectance,
            reflected_field: None,
            transmitted_field: None,
        });
    };
    let s = d
        .cross(&n)
        .try_normalize(f64::EPSILON)
        .unwrap_or_else(|| perpendicular(d));
    let (e_s, e_p) = (field.dot(&s), field.dot(&d.cross(&s)));
    let reflectance = refl_s.mul_add(e_s * e_s, refl_p * e_p * e_p);
    let reflected_field = (s * (r_s * e_s) + r_dir.cross(&s) * (r_p * e_p))
        .try_normalize(f64::EPSILON)
        .or(Some(s));
    let transmitted_field = (s * ((1.0 - refl_s).sqrt() * e_s)
        + t_dir.cross(&s) * ((1.0 - refl_p).sqrt() * e_p))
        .try_normalize(f64::EPSILON)
        .or(Some(s));
    Some(FresnelSplit {
        reflectance,
        transmittance: 1.0 - reflectance,
        reflected_field,
        transmitted_field,
    })
}

/// Returns the field direction after a reflection at a surface with normal `n`.
#[must_use]
pub fn reflect_field(field: &Vector3<f64>, n: &Vector3<f64>) -> Vector3<f64> {
    // mirror image of the field vector with the sign of a perfect conductor
    n * (2.0 * field.dot(n)) - field
}

fn oriented_along(n: &Vector3<f64>, d: &Vector3<f64>) -> Vector3<f64> {
    if n.dot(d) < 0.0 {
        -n
    } else {
        *n
    }
}

/// Unit vector perpendicular to `d`.
fn perpendicular(d: &Vector3<f64>) -> Vector3<f64> {
    let helper = if d.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    d.cross(&helper).normalize()
}

/// Component of `v` perpendicular to `d`, normalized.
fn transverse_unit(v: &Vector3<f64>, d: &Vector3<f64>) -> Option<Vector3<f64>> {
    if v.iter().any(|c| !c.is_finite()) {
        return None;
    }
    (v - d * v.dot(d)).try_normalize(f64::EPSILON)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{material::Solid, nanometer};
    use approx::assert_abs_diff_eq;
    use nalgebra::vector;
    use std::sync::Arc;

    fn ray_along_z() -> Ray {
        let line = Line::new(Point3::origin(), Vector3::z()).unwrap();
        Ray::new(ElementId(0), line, nanometer!(1000.0), 1.0, Arc::new(Solid::vacuum())).unwrap()
    }
    #[test]
    fn new() {
        let line = Line::new(Point3::origin(), Vector3::z()).unwrap();
        let vac = Arc::new(Solid::vacuum());
        assert!(Ray::new(ElementId(0), line, nanometer!(0.0), 1.0, vac.clone()).is_err());
        assert!(Ray::new(ElementId(0), line, nanometer!(-10.0), 1.0, vac.clone()).is_err());
        assert!(Ray::new(ElementId(0), line, nanometer!(500.0), -1.0, vac.clone()).is_err());
        assert!(Ray::new(ElementId(0), line, nanometer!(500.0), f64::NAN, vac).is_err());
        let ray = ray_along_z();
        assert_eq!(ray.wavelength(), nanometer!(1000.0));
        assert_eq!(ray.intensity(), 1.0);
        assert_eq!(ray.creator(), ElementId(0));
        assert!(ray.parent().is_none());
        assert!(ray.children().is_empty());
        assert!(ray.intercept().is_none());
        assert!(ray.length().is_none());
        assert!(ray.polarization().is_none());
        assert_eq!(ray.generation(), 0);
        assert!(!ray.is_lost());
    }
    #[test]
    fn spawn() {
        let mut ray = ray_along_z();
        ray.set_polarization(Vector3::x()).unwrap();
        let line = Line::new(Point3::new(0.0, 0.0, 1.0), Vector3::x()).unwrap();
        let child = ray.spawn(ElementId(3), line);
        assert_eq!(child.creator(), ElementId(3));
        assert_eq!(child.generation(), 1);
        assert_eq!(child.wavelength(), ray.wavelength());
        assert_eq!(child.polarization(), Some(Vector3::x()));
    }
    #[test]
    fn set_polarization() {
        let mut ray = ray_along_z();
        assert!(ray.set_polarization(Vector3::z()).is_err());
        assert!(ray.set_polarization(vector![f64::NAN, 0.0, 0.0]).is_err());
        ray.set_polarization(vector![1.0, 0.0, 1.0]).unwrap();
        assert_abs_diff_eq!(ray.polarization().unwrap(), Vector3::x());
    }
    #[test]
    fn lost() {
        let mut ray = ray_along_z();
        ray.set_lost(1.0);
        assert!(ray.is_lost());
        assert_eq!(ray.length(), Some(1.0));
    }
    #[test]
    fn reflection() {
        let d = vector![0.0, 1.0, 1.0].normalize();
        let r = reflect_direction(&d, &vector![0.0, 0.0, -1.0]);
        assert_abs_diff_eq!(r, vector![0.0, 1.0, -1.0].normalize(), epsilon = 1e-15);
        let r = reflect_direction(&d, &vector![0.0, 0.0, 1.0]);
        assert_abs_diff_eq!(r, vector![0.0, 1.0, -1.0].normalize(), epsilon = 1e-15);
    }
    #[test]
    fn refraction_normal_incidence() {
        let t = refract_direction(&Vector3::z(), &vector![0.0, 0.0, -1.0], 1.0 / 1.5).unwrap();
        assert_abs_diff_eq!(t, Vector3::z(), epsilon = 1e-15);
    }
    #[test]
    fn refraction_snell() {
        let angle = 30.0_f64.to_radians();
        let d = vector![0.0, angle.sin(), angle.cos()];
        let t = refract_direction(&d, &vector![0.0, 0.0, -1.0], 1.0 / 1.5).unwrap();
        assert_abs_diff_eq!(t.norm(), 1.0, epsilon = 1e-15);
        assert!(t.z > 0.0);
        assert_abs_diff_eq!(t.y, angle.sin() / 1.5, epsilon = 1e-15);
    }
    #[test]
    fn total_internal_reflection() {
        // critical angle glass (1.5) -> air: 41.81 degree
        let n = vector![0.0, 0.0, 1.0];
        let below = 41.7_f64.to_radians();
        let above = 41.9_f64.to_radians();
        assert!(refract_direction(&vector![0.0, below.sin(), below.cos()], &n, 1.5).is_some());
        assert!(refract_direction(&vector![0.0, above.sin(), above.cos()], &n, 1.5).is_none());
    }
    #[test]
    fn fresnel_normal_incidence() {
        let n = vector![0.0, 0.0, -1.0];
        let split = fresnel_split(&Vector3::z(), &n, None, 1.0, 1.5).unwrap();
        assert_abs_diff_eq!(split.reflectance, 0.04, epsilon = 1e-12);
        assert_abs_diff_eq!(split.reflectance + split.transmittance, 1.0);
        let split = fresnel_split(&Vector3::z(), &n, Some(&Vector3::x()), 1.0, 1.5).unwrap();
        assert_abs_diff_eq!(split.reflectance, 0.04, epsilon = 1e-12);
        assert_abs_diff_eq!(split.transmitted_field.unwrap(), Vector3::x(), epsilon = 1e-12);
    }
    #[test]
    fn fresnel_45_deg_unpolarized() {
        let d = vector![0.0, 1.0, 1.0].normalize();
        let split = fresnel_split(&d, &vector![0.0, 0.0, -1.0], None, 1.0, 1.5).unwrap();
        assert_abs_diff_eq!(split.reflectance, 0.050_239_911_012_235_95, epsilon = 1e-12);
    }
    #[test]
    fn fresnel_brewster() {
        // p polarized light at Brewster's angle is not reflected
        let brewster = 1.5_f64.atan();
        let d = vector![0.0, brewster.sin(), brewster.cos()];
        let n = vector![0.0, 0.0, -1.0];
        let p_field = vector![0.0, brewster.cos(), -brewster.sin()];
        let split = fresnel_split(&d, &n, Some(&p_field), 1.0, 1.5).unwrap();
        assert_abs_diff_eq!(split.reflectance, 0.0, epsilon = 1e-12);
        let split = fresnel_split(&d, &n, Some(&Vector3::x()), 1.0, 1.5).unwrap();
        assert!(split.reflectance > 0.1);
    }
    #[test]
    fn fresnel_tir() {
        let angle = 60.0_f64.to_radians();
        let d = vector![0.0, angle.sin(), angle.cos()];
        assert!(fresnel_split(&d, &Vector3::z(), None, 1.5, 1.0).is_none());
    }
    #[test]
    fn field_reflection() {
        let f = reflect_field(&Vector3::x(), &Vector3::z());
        assert_abs_diff_eq!(f, -Vector3::x());
    }
}

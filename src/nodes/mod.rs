//! This module contains the concrete element types (surfaces, stops, images, sources and groups) of an optical
//! [`System`](crate::system::System).
//!
//! Every [`Element`] carries a name, a placement relative to its parent container and an [`ElementKind`] describing
//! its optical function.
use crate::{
    line::Line,
    shape::ShapeRef,
    utils::geom_transformation::Transform,
};
use nalgebra::{Point2, Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

mod image;
mod optical_surface;
mod source;
mod stop;
mod surface;

pub use image::Image;
pub use optical_surface::OpticalSurface;
pub use source::{SourceKind, SpectralLine, Source};
pub use stop::Stop;
pub use surface::Surface;

/// Identifier of an [`Element`] within a [`System`](crate::system::System).
///
/// Ids are assigned in insertion order by the system and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementId(pub(crate) usize);

impl ElementId {
    /// Returns the index of this [`ElementId`].
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0
    }
}
impl Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "element #{}", self.0)
    }
}

/// The optical function of an [`Element`].
#[derive(Debug, Clone)]
pub enum ElementKind {
    /// Pure container for other elements
    Group,
    /// Refracting or reflecting interface between two materials
    OpticalSurface(OpticalSurface),
    /// Aperture stop
    Stop(Stop),
    /// Image plane recording all ray intercepts
    Image(Image),
    /// Light source
    Source(Source),
}
impl ElementKind {
    /// Returns `true` if rays can hit an element of this kind.
    #[must_use]
    pub const fn is_interceptable(&self) -> bool {
        matches!(self, Self::OpticalSurface(_) | Self::Stop(_) | Self::Image(_))
    }
    /// Returns the aperture shape of this kind (`None` for groups and sources).
    #[must_use]
    pub fn aperture(&self) -> Option<&ShapeRef> {
        match self {
            Self::OpticalSurface(s) => Some(s.surface().shape()),
            Self::Image(i) => Some(i.surface().shape()),
            Self::Stop(s) => Some(s.shape()),
            Self::Group | Self::Source(_) => None,
        }
    }
    /// Returns the surface height at the given position (0.0 for flat or non-surface kinds).
    #[must_use]
    pub fn sagitta(&self, xy: &Point2<f64>) -> f64 {
        match self {
            Self::OpticalSurface(s) => s.surface().curve().sagitta(xy),
            Self::Image(i) => i.surface().curve().sagitta(xy),
            _ => 0.0,
        }
    }
    /// Intersect a line given in the local frame of the element with this kind.
    ///
    /// Returns the intercept point and the surface normal (pointing towards -z). `sequential` selects the stop
    /// polarity: a stop is transparent within its aperture for non-sequential traces.
    #[must_use]
    pub fn intercept(
        &self,
        line: &Line,
        unobstructed: bool,
        sequential: bool,
    ) -> Option<(Point3<f64>, Vector3<f64>)> {
        match self {
            Self::OpticalSurface(s) => s.surface().intersect(line, unobstructed),
            Self::Image(i) => i.surface().intersect(line, unobstructed),
            Self::Stop(s) => s.intercept(line, unobstructed, sequential),
            Self::Group | Self::Source(_) => None,
        }
    }
    /// Returns the kind as string (for debugging purposes)
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::OpticalSurface(_) => "optical surface",
            Self::Stop(_) => "stop",
            Self::Image(_) => "image",
            Self::Source(_) => "source",
        }
    }
}
impl From<OpticalSurface> for ElementKind {
    fn from(s: OpticalSurface) -> Self {
        Self::OpticalSurface(s)
    }
}
impl From<Stop> for ElementKind {
    fn from(s: Stop) -> Self {
        Self::Stop(s)
    }
}
impl From<Image> for ElementKind {
    fn from(i: Image) -> Self {
        Self::Image(i)
    }
}
impl From<Source> for ElementKind {
    fn from(s: Source) -> Self {
        Self::Source(s)
    }
}

/// A node of the scene graph of an optical system.
#[derive(Debug, Clone)]
pub struct Element {
    name: String,
    transform: Transform,
    enabled: bool,
    kind: ElementKind,
}
impl Element {
    /// Creates a new [`Element`] placed at the origin of its container.
    #[must_use]
    pub fn new(name: &str, kind: impl Into<ElementKind>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::identity(),
            enabled: true,
            kind: kind.into(),
        }
    }
    /// Creates a new (empty) group.
    #[must_use]
    pub fn group(name: &str) -> Self {
        Self::new(name, ElementKind::Group)
    }
    /// Set the placement of this [`Element`] relative to its container.
    ///
    /// Use [`System::set_transform`](crate::system::System::set_transform) for elements already added to a system.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
    /// Returns the name of this [`Element`].
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Sets the name of this [`Element`].
    pub fn set_name(&mut self, name: &str) {
        self.name = name.into();
    }
    /// Returns the placement of this [`Element`] relative to its container.
    #[must_use]
    pub const fn transform(&self) -> &Transform {
        &self.transform
    }
    pub(crate) fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }
    /// Returns `true` if this [`Element`] takes part in a ray trace.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }
    /// Enable or disable this [`Element`].
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
    /// Returns the kind of this [`Element`].
    #[must_use]
    pub const fn kind(&self) -> &ElementKind {
        &self.kind
    }
    /// Returns the kind of this [`Element`] for modification.
    pub fn kind_mut(&mut self) -> &mut ElementKind {
        &mut self.kind
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{millimeter, shape::Disk};
    use assert_matches::assert_matches;
    use std::sync::Arc;

    #[test]
    fn element_id() {
        assert_eq!(ElementId(3).index(), 3);
        assert_eq!(format!("{}", ElementId(3)), "element #3");
        assert!(ElementId(1) < ElementId(2));
    }
    #[test]
    fn new() {
        let stop = Stop::new(Arc::new(Disk::new(millimeter!(10.0)).unwrap()));
        let mut e = Element::new("aperture", stop);
        assert_eq!(e.name(), "aperture");
        assert!(e.is_enabled());
        assert_eq!(e.transform(), &Transform::identity());
        assert_matches!(e.kind(), ElementKind::Stop(_));
        e.set_enabled(false);
        assert!(!e.is_enabled());
        e.set_name("pupil");
        assert_eq!(e.name(), "pupil");
    }
    #[test]
    fn group() {
        let g = Element::group("optics")
            .with_transform(Transform::new_along_z(millimeter!(10.0)).unwrap());
        assert_matches!(g.kind(), ElementKind::Group);
        assert!(!g.kind().is_interceptable());
        assert!(g.kind().aperture().is_none());
        assert_eq!(g.kind().name(), "group");
        let line = Line::new(Point3::new(0.0, 0.0, -1.0), Vector3::z()).unwrap();
        assert!(g.kind().intercept(&line, true, true).is_none());
    }
    #[test]
    fn interceptable() {
        let stop = ElementKind::from(Stop::new(Arc::new(Disk::new(millimeter!(10.0)).unwrap())));
        assert!(stop.is_interceptable());
        assert!(stop.aperture().is_some());
        assert!(!ElementKind::from(Source::default()).is_interceptable());
    }
}

//! Interface between two materials
use super::Surface;
use crate::{curve::CurveRef, material::MaterialRef, shape::ShapeRef};
use nalgebra::Vector3;

/// A refracting (or reflecting) surface separating two materials.
///
/// `materials[0]` is located on the -z side (front) of the surface, `materials[1]` on the +z side (back).
#[derive(Debug, Clone)]
pub struct OpticalSurface {
    surface: Surface,
    materials: [MaterialRef; 2],
}
impl OpticalSurface {
    /// Creates a new [`OpticalSurface`] with the `front` material on its -z side and the `back` material on its +z
    /// side.
    #[must_use]
    pub fn new(curve: CurveRef, shape: ShapeRef, front: MaterialRef, back: MaterialRef) -> Self {
        Self {
            surface: Surface::new(curve, shape),
            materials: [front, back],
        }
    }
    /// Returns the geometric surface of this [`OpticalSurface`].
    #[must_use]
    pub const fn surface(&self) -> &Surface {
        &self.surface
    }
    /// Returns the materials (front, back) of this [`OpticalSurface`].
    #[must_use]
    pub const fn materials(&self) -> &[MaterialRef; 2] {
        &self.materials
    }
    /// Replace the materials of this [`OpticalSurface`].
    pub fn set_materials(&mut self, front: MaterialRef, back: MaterialRef) {
        self.materials = [front, back];
    }
    /// Returns the (incident, transmitting) materials for a ray with the given direction hitting the surface with
    /// the given normal.
    ///
    /// A ray travelling against the normal (i.e. towards +z) passes from the front into the back material.
    #[must_use]
    pub fn media(&self, direction: &Vector3<f64>, normal: &Vector3<f64>) -> (&MaterialRef, &MaterialRef) {
        if direction.dot(normal) < 0.0 {
            (&self.materials[0], &self.materials[1])
        } else {
            (&self.materials[1], &self.materials[0])
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        curve::Flat,
        material::{Mirror, Solid},
        millimeter,
        shape::Disk,
    };
    use nalgebra::vector;
    use std::sync::Arc;

    fn surface() -> OpticalSurface {
        OpticalSurface::new(
            Arc::new(Flat),
            Arc::new(Disk::new(millimeter!(10.0)).unwrap()),
            Arc::new(Solid::vacuum()),
            Arc::new(Mirror::default()),
        )
    }
    #[test]
    fn media() {
        let s = surface();
        let n = vector![0.0, 0.0, -1.0];
        let (from, to) = s.media(&Vector3::z(), &n);
        assert_eq!(from.name(), "solid");
        assert_eq!(to.name(), "mirror");
        let (from, to) = s.media(&-Vector3::z(), &n);
        assert_eq!(from.name(), "mirror");
        assert_eq!(to.name(), "solid");
    }
    #[test]
    fn set_materials() {
        let mut s = surface();
        s.set_materials(Arc::new(Solid::vacuum()), Arc::new(Solid::default()));
        assert_eq!(s.materials()[1].name(), "solid");
        assert_eq!(s.surface().curve().name(), "flat");
    }
}

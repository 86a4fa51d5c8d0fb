//! Image plane (detector)
use super::Surface;
use crate::{curve::CurveRef, shape::ShapeRef};

/// An image surface absorbing and recording all incoming rays.
#[derive(Debug, Clone)]
pub struct Image {
    surface: Surface,
}
impl Image {
    /// Creates a new [`Image`].
    #[must_use]
    pub fn new(curve: CurveRef, shape: ShapeRef) -> Self {
        Self {
            surface: Surface::new(curve, shape),
        }
    }
    /// Returns the geometric surface of this [`Image`].
    #[must_use]
    pub const fn surface(&self) -> &Surface {
        &self.surface
    }
}

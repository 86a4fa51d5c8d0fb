//! Composition of shapes
//!
//! A [`Composer`] combines several (shifted) shapes. A point is inside the composed shape if it lies in at least
//! one [`ShapeOperation::Include`] member and in none of the [`ShapeOperation::Exclude`] members.
use super::{unit_direction, Shape, ShapeRef};
use crate::{
    error::{OptError, OptResult},
    utils::usize_to_f64,
};
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use strum::{Display, EnumIter, EnumString};

/// Number of steps used to scan for the outer contour of a [`Composer`].
const CONTOUR_SCAN_STEPS: usize = 1000;
/// Number of directions used to determine the minimum radius of a [`Composer`].
const MIN_RADIUS_DIRECTIONS: usize = 360;

/// The way a member shape contributes to a [`Composer`].
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, Display, EnumString,
)]
pub enum ShapeOperation {
    /// The member adds area to the composed shape.
    #[default]
    Include,
    /// The member removes area from the composed shape.
    Exclude,
}

#[derive(Debug, Clone)]
struct Member {
    shape: ShapeRef,
    offset: Vector2<f64>,
    operation: ShapeOperation,
}
impl Member {
    fn inside(&self, xy: &Point2<f64>) -> bool {
        self.shape.inside(&(xy - self.offset))
    }
}

#[derive(Debug, Clone, Default)]
/// A shape composed of several shifted member shapes.
pub struct Composer {
    members: Vec<Member>,
}
impl Composer {
    /// Create a new (empty) [`Composer`]. An empty composer contains no point.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Add a member shape shifted by the given offset (in meter).
    ///
    /// # Errors
    ///
    /// This function will return an error if the offset is not finite.
    pub fn add(
        &mut self,
        shape: ShapeRef,
        offset: Vector2<f64>,
        operation: ShapeOperation,
    ) -> OptResult<()> {
        if offset.iter().any(|v| !v.is_finite()) {
            return Err(OptError::Geometry("offset must be finite".into()));
        }
        self.members.push(Member {
            shape,
            offset,
            operation,
        });
        Ok(())
    }
    /// Returns the number of members of this [`Composer`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }
    /// Returns `true` if this [`Composer`] has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
    fn includes(&self) -> impl Iterator<Item = &Member> {
        self.members
            .iter()
            .filter(|m| m.operation == ShapeOperation::Include)
    }
}
impl Shape for Composer {
    fn inside(&self, xy: &Point2<f64>) -> bool {
        self.includes().any(|m| m.inside(xy))
            && !self
                .members
                .iter()
                .filter(|m| m.operation == ShapeOperation::Exclude)
                .any(|m| m.inside(xy))
    }
    fn max_radius(&self) -> f64 {
        self.includes()
            .map(|m| m.offset.norm() + m.shape.max_radius())
            .fold(0.0, f64::max)
    }
    fn min_radius(&self) -> f64 {
        (0..MIN_RADIUS_DIRECTIONS)
            .map(|i| {
                let (sin, cos) = (2.0 * PI * usize_to_f64(i) / usize_to_f64(MIN_RADIUS_DIRECTIONS)).sin_cos();
                self.outer_radius(&Vector2::new(cos, sin))
            })
            .fold(f64::INFINITY, f64::min)
    }
    fn outer_radius(&self, direction: &Vector2<f64>) -> f64 {
        let d = unit_direction(direction);
        let max = self.max_radius();
        if !max.is_finite() {
            return max;
        }
        let step = max / usize_to_f64(CONTOUR_SCAN_STEPS);
        // scan inwards for the first point inside the composed shape and refine by bisection
        for i in (0..=CONTOUR_SCAN_STEPS).rev() {
            let r = usize_to_f64(i) * step;
            if self.inside(&Point2::from(d * r)) {
                let (mut inner, mut outer) = (r, r + step);
                for _ in 0..50 {
                    let mid = 0.5 * (inner + outer);
                    if self.inside(&Point2::from(d * mid)) {
                        inner = mid;
                    } else {
                        outer = mid;
                    }
                }
                return inner;
            }
        }
        0.0
    }
    fn bounding_box(&self) -> (Point2<f64>, Point2<f64>) {
        let mut boxes = self.includes().map(|m| {
            let (lo, hi) = m.shape.bounding_box();
            (lo + m.offset, hi + m.offset)
        });
        let Some(first) = boxes.next() else {
            return (Point2::origin(), Point2::origin());
        };
        boxes.fold(first, |(lo, hi), (l, h)| {
            (
                Point2::new(lo.x.min(l.x), lo.y.min(l.y)),
                Point2::new(hi.x.max(h.x), hi.y.max(h.y)),
            )
        })
    }
    fn name(&self) -> String {
        "composer".into()
    }
}

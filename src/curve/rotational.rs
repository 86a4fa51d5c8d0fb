//! Rotationally symmetric curve defined by a sampled radial profile
//!
//! The sagitta between the samples is interpolated by cubic Hermite splines with finite-difference tangents.
//! Outside the sampled range the profile is extrapolated linearly using the tangent at the outermost sample.
use super::{rotational_gradient, Curve};
use crate::error::{OptError, OptResult};
use nalgebra::{Point2, Vector2};

#[derive(Debug, Clone)]
/// A rotationally symmetric curve given by a list of `(r, z)` samples.
pub struct Rotational {
    radii: Vec<f64>,
    heights: Vec<f64>,
    tangents: Vec<f64>,
}
impl Rotational {
    /// Create a new [`Rotational`] curve from a list of `(r, z)` samples (in meter).
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///  - less than two samples are given
    ///  - any value is not finite or any radius is negative
    ///  - the radii are not strictly increasing
    pub fn new(samples: &[(f64, f64)]) -> OptResult<Self> {
        if samples.len() < 2 {
            return Err(OptError::Geometry(
                "rotational curve needs at least two samples".into(),
            ));
        }
        if samples
            .iter()
            .any(|(r, z)| !r.is_finite() || !z.is_finite() || r.is_sign_negative())
        {
            return Err(OptError::Geometry(
                "rotational curve samples must be finite and radii must be >= 0.0".into(),
            ));
        }
        if samples.windows(2).any(|w| w[1].0 <= w[0].0) {
            return Err(OptError::Geometry(
                "rotational curve radii must be strictly increasing".into(),
            ));
        }
        let radii: Vec<f64> = samples.iter().map(|s| s.0).collect();
        let heights: Vec<f64> = samples.iter().map(|s| s.1).collect();
        let last = radii.len() - 1;
        let tangents = (0..=last)
            .map(|i| {
                let (lo, hi) = (i.saturating_sub(1), (i + 1).min(last));
                (heights[hi] - heights[lo]) / (radii[hi] - radii[lo])
            })
            .collect();
        Ok(Self {
            radii,
            heights,
            tangents,
        })
    }
    /// Returns the sampled `(r, z)` profile of this [`Rotational`] curve.
    #[must_use]
    pub fn samples(&self) -> Vec<(f64, f64)> {
        self.radii
            .iter()
            .copied()
            .zip(self.heights.iter().copied())
            .collect()
    }
    /// Find the interval index `k` with `r_k <= r < r_(k+1)` (clamped to the valid range).
    fn interval(&self, r: f64) -> usize {
        let idx = self.radii.partition_point(|ri| *ri <= r);
        idx.saturating_sub(1).min(self.radii.len() - 2)
    }
    /// Returns the sagitta and its radial derivative at the given radius.
    fn evaluate(&self, r: f64) -> (f64, f64) {
        let last = self.radii.len() - 1;
        if r <= self.radii[0] {
            let m = self.tangents[0];
            return (m.mul_add(r - self.radii[0], self.heights[0]), m);
        }
        if r >= self.radii[last] {
            let m = self.tangents[last];
            return (m.mul_add(r - self.radii[last], self.heights[last]), m);
        }
        let k = self.interval(r);
        let h = self.radii[k + 1] - self.radii[k];
        let s = (r - self.radii[k]) / h;
        let (z0, z1) = (self.heights[k], self.heights[k + 1]);
        let (m0, m1) = (self.tangents[k] * h, self.tangents[k + 1] * h);
        let s2 = s * s;
        let s3 = s2 * s;
        let z = (2.0 * s3 - 3.0 * s2 + 1.0) * z0
            + (s3 - 2.0 * s2 + s) * m0
            + (-2.0 * s3 + 3.0 * s2) * z1
            + (s3 - s2) * m1;
        let dz = ((6.0 * s2 - 6.0 * s) * z0
            + (3.0 * s2 - 4.0 * s + 1.0) * m0
            + (-6.0 * s2 + 6.0 * s) * z1
            + (3.0 * s2 - 2.0 * s) * m1)
            / h;
        (z, dz)
    }
}
impl Curve for Rotational {
    fn sagitta(&self, xy: &Point2<f64>) -> f64 {
        self.evaluate(xy.coords.norm()).0
    }
    fn derivative(&self, xy: &Point2<f64>) -> Vector2<f64> {
        rotational_gradient(self.evaluate(xy.coords.norm()).1, xy)
    }
    fn name(&self) -> String {
        "rotational".into()
    }
}

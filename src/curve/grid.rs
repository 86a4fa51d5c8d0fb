//! Curve defined by a sagitta grid
//!
//! The sagitta is sampled on a regular rectangular grid in the local XY plane and bilinearly interpolated. Positions
//! outside the grid are clamped to the grid border.
use super::Curve;
use crate::{
    error::{OptError, OptResult},
    utils::{f64_to_usize, usize_to_f64},
};
use nalgebra::{Point2, Vector2};

#[derive(Debug, Clone)]
/// A curve given by a regular grid of sagitta values.
pub struct Grid {
    origin: Point2<f64>,
    step: Vector2<f64>,
    nx: usize,
    ny: usize,
    values: Vec<f64>,
}
impl Grid {
    /// Create a new [`Grid`] curve.
    ///
    /// `origin` is the position of the first sample, `step` the grid spacing in x and y. The `values` are stored row-wise,
    /// i.e. the sample `(i, j)` at position `origin + (i * step.x, j * step.y)` is found at index `j * nx + i`.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///  - the grid has less than two samples in any direction
    ///  - the number of values does not match the grid size
    ///  - the step width is not positive or not finite
    ///  - any value is not finite
    pub fn new(
        origin: Point2<f64>,
        step: Vector2<f64>,
        nx: usize,
        ny: usize,
        values: Vec<f64>,
    ) -> OptResult<Self> {
        if nx < 2 || ny < 2 {
            return Err(OptError::Geometry(
                "grid needs at least two samples in each direction".into(),
            ));
        }
        if values.len() != nx * ny {
            return Err(OptError::Geometry(format!(
                "grid of size {nx}x{ny} needs {} values but {} were given",
                nx * ny,
                values.len()
            )));
        }
        if !step.iter().all(|s| s.is_normal() && s.is_sign_positive()) {
            return Err(OptError::Geometry(
                "grid step must be positive and finite".into(),
            ));
        }
        if origin.iter().chain(values.iter()).any(|v| !v.is_finite()) {
            return Err(OptError::Geometry(
                "grid origin and values must be finite".into(),
            ));
        }
        Ok(Self {
            origin,
            step,
            nx,
            ny,
            values,
        })
    }
    /// Create a [`Grid`] by sampling another [`Curve`] on a square grid of `n x n` points covering `[-half_width, half_width]`.
    ///
    /// # Errors
    ///
    /// This function will return an error if `n < 2`, the half width is not positive or the sampled curve is not
    /// defined on the whole grid.
    pub fn sample(curve: &dyn Curve, half_width: f64, n: usize) -> OptResult<Self> {
        if n < 2 {
            return Err(OptError::Geometry(
                "grid needs at least two samples in each direction".into(),
            ));
        }
        let step = 2.0 * half_width / usize_to_f64(n - 1);
        let origin = Point2::new(-half_width, -half_width);
        let mut values = Vec::with_capacity(n * n);
        for j in 0..n {
            for i in 0..n {
                let p = origin + Vector2::new(usize_to_f64(i), usize_to_f64(j)) * step;
                values.push(curve.sagitta(&p));
            }
        }
        Self::new(origin, Vector2::new(step, step), n, n, values)
    }
    fn value(&self, i: usize, j: usize) -> f64 {
        self.values[j * self.nx + i]
    }
    /// Returns the cell index and the fractional position within the cell along one axis.
    fn locate(pos: f64, start: f64, step: f64, n: usize) -> (usize, f64) {
        let u = ((pos - start) / step).clamp(0.0, usize_to_f64(n - 1));
        let cell = f64_to_usize(u.floor()).min(n - 2);
        (cell, u - usize_to_f64(cell))
    }
    fn cell(&self, xy: &Point2<f64>) -> (usize, usize, f64, f64) {
        let (i, u) = Self::locate(xy.x, self.origin.x, self.step.x, self.nx);
        let (j, v) = Self::locate(xy.y, self.origin.y, self.step.y, self.ny);
        (i, j, u, v)
    }
}
impl Curve for Grid {
    fn sagitta(&self, xy: &Point2<f64>) -> f64 {
        let (i, j, u, v) = self.cell(xy);
        let z00 = self.value(i, j);
        let z10 = self.value(i + 1, j);
        let z01 = self.value(i, j + 1);
        let z11 = self.value(i + 1, j + 1);
        (1.0 - v) * (1.0 - u).mul_add(z00, u * z10) + v * (1.0 - u).mul_add(z01, u * z11)
    }
    fn derivative(&self, xy: &Point2<f64>) -> Vector2<f64> {
        let (i, j, u, v) = self.cell(xy);
        let z00 = self.value(i, j);
        let z10 = self.value(i + 1, j);
        let z01 = self.value(i, j + 1);
        let z11 = self.value(i + 1, j + 1);
        Vector2::new(
            (1.0 - v).mul_add(z10 - z00, v * (z11 - z01)) / self.step.x,
            (1.0 - u).mul_add(z01 - z00, u * (z11 - z10)) / self.step.y,
        )
    }
    fn name(&self) -> String {
        "grid".into()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{curve::Sphere, line::Line, millimeter};
    use approx::assert_abs_diff_eq;
    use nalgebra::{point, vector, Point3, Vector3};

    fn plane() -> Grid {
        // z = 0.1 x + 0.2 y on [0,2] x [0,2]
        let mut values = Vec::new();
        for j in 0..3 {
            for i in 0..3 {
                values.push(0.1 * f64::from(i) + 0.2 * f64::from(j));
            }
        }
        Grid::new(Point2::origin(), vector![1.0, 1.0], 3, 3, values).unwrap()
    }
    #[test]
    fn new() {
        assert!(Grid::new(Point2::origin(), vector![1.0, 1.0], 1, 2, vec![0.0; 2]).is_err());
        assert!(Grid::new(Point2::origin(), vector![1.0, 1.0], 2, 2, vec![0.0; 3]).is_err());
        assert!(Grid::new(Point2::origin(), vector![0.0, 1.0], 2, 2, vec![0.0; 4]).is_err());
        assert!(Grid::new(Point2::origin(), vector![-1.0, 1.0], 2, 2, vec![0.0; 4]).is_err());
        assert!(Grid::new(Point2::origin(), vector![1.0, 1.0], 2, 2, vec![0.0, 0.0, f64::NAN, 0.0]).is_err());
        assert!(Grid::new(Point2::origin(), vector![1.0, 1.0], 2, 2, vec![0.0; 4]).is_ok());
    }
    #[test]
    fn bilinear() {
        let g = plane();
        assert_abs_diff_eq!(g.sagitta(&point![0.5, 1.5]), 0.05 + 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(g.sagitta(&point![2.0, 2.0]), 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(g.derivative(&point![1.3, 0.2]), vector![0.1, 0.2], epsilon = 1e-12);
    }
    #[test]
    fn clamped() {
        let g = plane();
        assert_abs_diff_eq!(g.sagitta(&point![-1.0, 0.0]), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(g.sagitta(&point![5.0, 5.0]), 0.6, epsilon = 1e-12);
    }
    #[test]
    fn sampled_sphere() {
        let s = Sphere::new(millimeter!(100.0)).unwrap();
        let g = Grid::sample(&s, 0.02, 201).unwrap();
        let xy = point![0.0051, -0.0033];
        assert_abs_diff_eq!(g.sagitta(&xy), s.sagitta(&xy), epsilon = 1e-7);
    }
    #[test]
    fn intersect() {
        let g = plane();
        let line = Line::new(point![1.5, 0.5, -1.0], Vector3::z()).unwrap();
        let p = g.intersect(&line).unwrap();
        assert_abs_diff_eq!(p, Point3::new(1.5, 0.5, 0.25), epsilon = 1e-9);
    }
}

//! Conic curve
//!
//! A conic section of revolution defined by its radius of curvature `roc` and the Schwarzschild (conic) constant `sc`:
//!
//! `z = r² / (roc * (1 + sqrt(1 - sh * r² / roc²)))` with `sh = sc + 1`
//!
//! | sc          | surface            |
//! |-------------|--------------------|
//! | `sc < -1`   | hyperbola          |
//! | `sc = -1`   | parabola           |
//! | `-1 < sc < 0` | prolate ellipsoid |
//! | `sc = 0`    | sphere             |
//! | `sc > 0`    | oblate ellipsoid   |
use super::{intersect_conic, rotational_gradient, sphere::check_roc, Curve};
use crate::{
    error::{OptError, OptResult},
    line::Line,
    meter,
};
use nalgebra::{Point2, Point3, Vector2};
use uom::si::f64::Length;

#[derive(Debug, Clone)]
/// A conic curve with a given radius of curvature and Schwarzschild constant.
pub struct Conic {
    roc: f64,
    sh: f64,
}
impl Conic {
    /// Create a new [`Conic`].
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///  - the radius of curvature is 0.0 or not finite.
    ///  - the Schwarzschild constant is not finite.
    pub fn new(roc: Length, schwarzschild: f64) -> OptResult<Self> {
        Ok(Self {
            roc: check_roc(roc)?,
            sh: check_schwarzschild(schwarzschild)? + 1.0,
        })
    }
    /// Returns the radius of curvature of this [`Conic`].
    #[must_use]
    pub fn roc(&self) -> Length {
        meter!(self.roc)
    }
    /// Sets the radius of curvature of this [`Conic`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the radius of curvature is 0.0 or not finite.
    pub fn set_roc(&mut self, roc: Length) -> OptResult<()> {
        self.roc = check_roc(roc)?;
        Ok(())
    }
    /// Returns the Schwarzschild constant of this [`Conic`].
    #[must_use]
    pub fn schwarzschild(&self) -> f64 {
        self.sh - 1.0
    }
    /// Sets the Schwarzschild constant of this [`Conic`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the given value is not finite.
    pub fn set_schwarzschild(&mut self, schwarzschild: f64) -> OptResult<()> {
        self.sh = check_schwarzschild(schwarzschild)? + 1.0;
        Ok(())
    }
}
fn check_schwarzschild(schwarzschild: f64) -> OptResult<f64> {
    if !schwarzschild.is_finite() {
        return Err(OptError::Geometry(
            "Schwarzschild constant must be finite".into(),
        ));
    }
    Ok(schwarzschild)
}
impl Curve for Conic {
    fn sagitta(&self, xy: &Point2<f64>) -> f64 {
        let r2 = xy.coords.norm_squared();
        r2 / (self.roc * ((1.0 - self.sh * r2 / (self.roc * self.roc)).sqrt() + 1.0))
    }
    fn derivative(&self, xy: &Point2<f64>) -> Vector2<f64> {
        let r2 = xy.coords.norm_squared();
        let dz_dr = r2.sqrt() / (self.roc * (1.0 - self.sh * r2 / (self.roc * self.roc)).sqrt());
        rotational_gradient(dz_dr, xy)
    }
    fn intersect(&self, line: &Line) -> Option<Point3<f64>> {
        intersect_conic(self.roc, self.sh, line)
    }
    fn name(&self) -> String {
        "conic".into()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        curve::{test_helper::check_round_trip, Sphere},
        millimeter,
    };
    use approx::assert_abs_diff_eq;
    use nalgebra::{point, Vector3};

    #[test]
    fn new() {
        assert!(Conic::new(millimeter!(0.0), 0.0).is_err());
        assert!(Conic::new(millimeter!(f64::NAN), 0.0).is_err());
        assert!(Conic::new(millimeter!(100.0), f64::NAN).is_err());
        assert!(Conic::new(millimeter!(100.0), f64::INFINITY).is_err());
        let c = Conic::new(millimeter!(100.0), -0.5).unwrap();
        assert_eq!(c.roc(), millimeter!(100.0));
        assert_eq!(c.schwarzschild(), -0.5);
    }
    #[test]
    fn setters() {
        let mut c = Conic::new(millimeter!(100.0), -0.5).unwrap();
        assert!(c.set_roc(millimeter!(f64::INFINITY)).is_err());
        assert!(c.set_schwarzschild(f64::NAN).is_err());
        c.set_roc(millimeter!(200.0)).unwrap();
        c.set_schwarzschild(-2.0).unwrap();
        assert_eq!(c.roc(), millimeter!(200.0));
        assert_eq!(c.schwarzschild(), -2.0);
    }
    #[test]
    fn zero_schwarzschild_is_sphere() {
        let c = Conic::new(millimeter!(100.0), 0.0).unwrap();
        let s = Sphere::new(millimeter!(100.0)).unwrap();
        for r in [0.0, 0.01, 0.03, 0.05] {
            let xy = point![r, r / 2.0];
            assert_abs_diff_eq!(c.sagitta(&xy), s.sagitta(&xy), epsilon = 1e-12);
            assert_abs_diff_eq!(c.derivative(&xy), s.derivative(&xy), epsilon = 1e-9);
        }
    }
    #[test]
    fn parabolic_sagitta() {
        let c = Conic::new(millimeter!(100.0), -1.0).unwrap();
        assert_abs_diff_eq!(
            c.sagitta(&point![0.02, 0.0]),
            0.02 * 0.02 / 0.2,
            epsilon = 1e-15
        );
    }
    #[test]
    fn numerical_derivative() {
        let c = Conic::new(millimeter!(100.0), -3.0).unwrap();
        let xy = point![0.02, -0.01];
        let dx = 1e-7;
        let numeric = (c.sagitta(&point![xy.x + dx, xy.y]) - c.sagitta(&point![xy.x - dx, xy.y]))
            / (2.0 * dx);
        assert_abs_diff_eq!(c.derivative(&xy).x, numeric, epsilon = 1e-7);
    }
    #[test]
    fn intersect_on_axis() {
        let c = Conic::new(millimeter!(-50.0), 2.0).unwrap();
        let line = Line::new(point![0.0, 0.0, -1.0], Vector3::z()).unwrap();
        assert_abs_diff_eq!(c.intersect(&line).unwrap(), Point3::origin(), epsilon = 1e-12);
    }
    #[test]
    fn round_trip() {
        for sc in [-3.0, -1.0, -0.5, 0.0, 0.7] {
            check_round_trip(&Conic::new(millimeter!(100.0), sc).unwrap(), 0.04, 1e-9);
            check_round_trip(&Conic::new(millimeter!(-100.0), sc).unwrap(), 0.04, 1e-9);
        }
    }
}

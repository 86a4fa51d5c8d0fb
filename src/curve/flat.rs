//! Flat curve (plane at z = 0)
use super::Curve;
use crate::line::Line;
use nalgebra::{Point2, Point3, Vector2, Vector3};

/// A flat curve. The sagitta is zero everywhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct Flat;

impl Curve for Flat {
    fn sagitta(&self, _xy: &Point2<f64>) -> f64 {
        0.0
    }
    fn derivative(&self, _xy: &Point2<f64>) -> Vector2<f64> {
        Vector2::zeros()
    }
    fn normal(&self, _point: &Point3<f64>) -> Vector3<f64> {
        -Vector3::z()
    }
    fn intersect(&self, line: &Line) -> Option<Point3<f64>> {
        let t = line.intersect_z0_plane()?;
        if t < 0.0 {
            return None;
        }
        let mut point = line.point_at(t);
        point.z = 0.0;
        Some(point)
    }
    fn name(&self) -> String {
        "flat".into()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::{point, vector};

    #[test]
    fn sagitta_and_normal() {
        let flat = Flat;
        assert_eq!(flat.sagitta(&point![1.0, -2.0]), 0.0);
        assert_eq!(flat.derivative(&point![1.0, -2.0]), Vector2::zeros());
        assert_eq!(flat.normal(&point![3.0, 1.0, 0.0]), vector![0.0, 0.0, -1.0]);
    }
    #[test]
    fn intersect() {
        let line = Line::new(point![0.0, 1.0, -1.0], vector![0.0, 1.0, 1.0]).unwrap();
        let p = Flat.intersect(&line).unwrap();
        assert_abs_diff_eq!(p, point![0.0, 2.0, 0.0], epsilon = 1e-12);
    }
    #[test]
    fn intersect_parallel_or_behind() {
        let line = Line::new(point![0.0, 0.0, -1.0], Vector3::x()).unwrap();
        assert!(Flat.intersect(&line).is_none());
        let line = Line::new(point![0.0, 0.0, 1.0], Vector3::z()).unwrap();
        assert!(Flat.intersect(&line).is_none());
    }
    #[test]
    fn name() {
        assert_eq!(Flat.name(), "flat");
    }
}

//! Exact NURBS circle.

use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, PI};

use nurbs_core::{NurbsError, Result};
use nurbs_math::{DVec3, Point3};

use super::NurbsCurve;

impl NurbsCurve {
    /// A full circle in the XY plane through `center + (radius, 0, 0)`, as the
    /// 9-point degree-2 NURBS over the bounding square.
    ///
    /// The parameter runs over `[0, 2π]` and coincides with the polar angle
    /// at multiples of `π/2`.
    pub fn circle(center: Point3, radius: f64) -> Result<Self> {
        if !radius.is_finite() || !center.is_finite() {
            return Err(NurbsError::NonFiniteInput("circle"));
        }
        let offsets = [
            (1.0, 0.0),
            (1.0, 1.0),
            (0.0, 1.0),
            (-1.0, 1.0),
            (-1.0, 0.0),
            (-1.0, -1.0),
            (0.0, -1.0),
            (1.0, -1.0),
            (1.0, 0.0),
        ];
        let control_points = offsets
            .iter()
            .map(|&(x, y)| center + radius * DVec3::new(x, y, 0.0))
            .collect();
        let weights = (0..9)
            .map(|i| if i % 2 == 0 { 1.0 } else { FRAC_1_SQRT_2 })
            .collect();
        let knots = vec![
            0.0,
            0.0,
            0.0,
            FRAC_PI_2,
            FRAC_PI_2,
            PI,
            PI,
            3.0 * FRAC_PI_2,
            3.0 * FRAC_PI_2,
            2.0 * PI,
            2.0 * PI,
            2.0 * PI,
        ];
        Self::new(2, knots, control_points, weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Curve;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_circle_cardinal_points() {
        let center = DVec3::new(1.0, -2.0, 0.5);
        let circle = NurbsCurve::circle(center, 2.0).unwrap();
        let expected = [
            (0.0, DVec3::new(2.0, 0.0, 0.0)),
            (FRAC_PI_2, DVec3::new(0.0, 2.0, 0.0)),
            (PI, DVec3::new(-2.0, 0.0, 0.0)),
            (3.0 * FRAC_PI_2, DVec3::new(0.0, -2.0, 0.0)),
            (2.0 * PI, DVec3::new(2.0, 0.0, 0.0)),
        ];
        for (u, offset) in expected {
            let p = circle.point_at(u).unwrap();
            assert_abs_diff_eq!(p, center + offset, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_circle_points_on_circle() {
        let circle = NurbsCurve::circle(DVec3::ZERO, 1.0).unwrap();
        let (t_min, t_max) = circle.domain();
        for i in 0..=40 {
            let t = t_min + (t_max - t_min) * i as f64 / 40.0;
            let p = circle.point_at(t).unwrap();
            let r = (p.x * p.x + p.y * p.y).sqrt();
            assert!(
                (r - 1.0).abs() < 1e-12,
                "NURBS circle point at t={} has radius {}, expected 1.0",
                t,
                r
            );
            assert!(p.z.abs() < 1e-15);
        }
    }

    #[test]
    fn test_circle_tangent_perpendicular() {
        let circle = NurbsCurve::circle(DVec3::ZERO, 3.0).unwrap();
        for i in 0..16 {
            let t = i as f64 * PI / 8.0 + 0.01;
            let p = circle.point_at(t).unwrap();
            let tang = circle.tangent_at(t).unwrap();
            assert!(p.dot(tang).abs() < 1e-9, "Tangent not perpendicular at t={}", t);
            // Counter-clockwise
            assert!(p.cross(tang).z > 0.0);
        }
    }

    #[test]
    fn test_circle_is_closed() {
        let circle = NurbsCurve::circle(DVec3::ZERO, 1.0).unwrap();
        assert!(circle.is_closed());
        assert_eq!(circle.domain(), (0.0, 2.0 * PI));
        assert!(circle.knots().is_clamped(2));
    }
}

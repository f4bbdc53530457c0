//! Parametric derivatives of rational curves and surfaces.
//!
//! Control points are lifted to homogeneous form `(x·w, y·w, z·w, w)`, the
//! polynomial derivatives of that 4D B-spline are taken with
//! [`basis_function_derivatives`], and the Cartesian derivatives are
//! recovered with the quotient rule, lowest total order first.

use nurbs_core::{NurbsError, Result, Tolerance};
use nurbs_math::{binomial, lift, DVec4, Point3, Vector3};

use super::basis::basis_function_derivatives;
use super::knot::find_span;

/// Derivatives of a non-rational B-spline curve up to and including `order`.
pub fn curve_derivatives(
    degree: usize,
    knots: &[f64],
    control_points: &[Point3],
    u: f64,
    order: usize,
) -> Vec<Vector3> {
    let n = control_points.len() - 1;
    let span = find_span(degree, knots, n, u);
    let ders = basis_function_derivatives(span, degree, order, knots, u);

    ders.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .fold(Vector3::ZERO, |acc, (j, &d)| {
                    acc + d * control_points[span - degree + j]
                })
        })
        .collect()
}

/// Derivatives `CK[k]`, `k` in `0..=order`, of the homogeneous curve.
pub fn homogeneous_curve_derivatives(
    degree: usize,
    knots: &[f64],
    control_points: &[Point3],
    weights: &[f64],
    u: f64,
    order: usize,
) -> Vec<DVec4> {
    let n = control_points.len() - 1;
    let span = find_span(degree, knots, n, u);
    let ders = basis_function_derivatives(span, degree, order, knots, u);

    let mut ck = vec![DVec4::ZERO; order + 1];
    for (k, row) in ders.iter().enumerate().take(order.min(degree) + 1) {
        for (j, &d) in row.iter().enumerate() {
            let idx = span - degree + j;
            ck[k] += d * lift(control_points[idx], weights[idx]);
        }
    }
    ck
}

/// Derivatives of a rational curve up to and including `order` at `u`.
///
/// Element 0 is the curve point, element 1 the tangent.
pub fn rational_curve_derivatives(
    degree: usize,
    knots: &[f64],
    control_points: &[Point3],
    weights: &[f64],
    u: f64,
    order: usize,
) -> Result<Vec<Vector3>> {
    let ders = homogeneous_curve_derivatives(degree, knots, control_points, weights, u, order);
    let w0 = ders[0].w;
    if Tolerance::is_degenerate_weight(w0) {
        return Err(NurbsError::DegenerateWeight { u, v: None });
    }

    let mut ck = vec![Vector3::ZERO; order + 1];
    for k in 0..=order {
        let mut v = ders[k].truncate();
        for i in 1..=k {
            v -= binomial(k, i) * ders[i].w * ck[k - i];
        }
        ck[k] = v / w0;
    }
    Ok(ck)
}

/// Derivatives `SKL[k][l]` of the homogeneous surface for `k + l <= order`.
///
/// Entries with `k + l > order` are left at zero, as are orders above the
/// degree in each direction.
#[allow(clippy::too_many_arguments)]
pub fn homogeneous_surface_derivatives(
    degree_u: usize,
    degree_v: usize,
    knots_u: &[f64],
    knots_v: &[f64],
    cols: usize,
    control_points: &[Point3],
    weights: &[f64],
    u: f64,
    v: f64,
    order: usize,
) -> Vec<Vec<DVec4>> {
    let rows = control_points.len() / cols;
    let mut skl = vec![vec![DVec4::ZERO; order + 1]; order + 1];

    let du = order.min(degree_u);
    let dv = order.min(degree_v);

    let span_u = find_span(degree_u, knots_u, rows - 1, u);
    let ders_u = basis_function_derivatives(span_u, degree_u, du, knots_u, u);
    let span_v = find_span(degree_v, knots_v, cols - 1, v);
    let ders_v = basis_function_derivatives(span_v, degree_v, dv, knots_v, v);

    let mut temp = vec![DVec4::ZERO; degree_v + 1];
    for k in 0..=du {
        // Contract along u first, one column of the support at a time.
        for (s, t) in temp.iter_mut().enumerate() {
            *t = DVec4::ZERO;
            let col = span_v - degree_v + s;
            for r in 0..=degree_u {
                let idx = (span_u - degree_u + r) * cols + col;
                *t += ders_u[k][r] * lift(control_points[idx], weights[idx]);
            }
        }
        let dd = (order - k).min(dv);
        for l in 0..=dd {
            skl[k][l] = temp
                .iter()
                .zip(&ders_v[l])
                .fold(DVec4::ZERO, |acc, (&t, &n)| acc + n * t);
        }
    }
    skl
}

/// Cartesian derivatives `SKL[k][l]` of a rational surface for
/// `k + l <= order`.
///
/// `SKL[0][0]` is the surface point, `SKL[1][0]` and `SKL[0][1]` the first
/// partials along `u` and `v`.
#[allow(clippy::too_many_arguments)]
pub fn rational_surface_derivatives(
    degree_u: usize,
    degree_v: usize,
    knots_u: &[f64],
    knots_v: &[f64],
    cols: usize,
    control_points: &[Point3],
    weights: &[f64],
    u: f64,
    v: f64,
    order: usize,
) -> Result<Vec<Vec<Vector3>>> {
    let ders = homogeneous_surface_derivatives(
        degree_u,
        degree_v,
        knots_u,
        knots_v,
        cols,
        control_points,
        weights,
        u,
        v,
        order,
    );
    let w00 = ders[0][0].w;
    if Tolerance::is_degenerate_weight(w00) {
        return Err(NurbsError::DegenerateWeight { u, v: Some(v) });
    }

    let mut skl = vec![vec![Vector3::ZERO; order + 1]; order + 1];
    // Each entry only reads entries of lower total order.
    for total in 0..=order {
        for k in 0..=total {
            let l = total - k;
            let mut val = ders[k][l].truncate();
            for j in 1..=l {
                val -= binomial(l, j) * ders[0][j].w * skl[k][l - j];
            }
            for i in 1..=k {
                val -= binomial(k, i) * ders[i][0].w * skl[k - i][l];
                let mut inner = Vector3::ZERO;
                for j in 1..=l {
                    inner += binomial(l, j) * ders[i][j].w * skl[k - i][l - j];
                }
                val -= binomial(k, i) * inner;
            }
            skl[k][l] = val / w00;
        }
    }
    Ok(skl)
}

/// Outward unit normal `-(Su × Sv) / |Su × Sv|` from the first partials.
pub fn surface_normal(su: Vector3, sv: Vector3, u: f64, v: f64) -> Result<Vector3> {
    let n = su.cross(sv);
    let len = n.length();
    if !len.is_finite() || len < Tolerance::DEGENERATE_WEIGHT {
        return Err(NurbsError::DegenerateNormal { u, v });
    }
    Ok(-n / len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nurbs::rational::{rational_curve_point, rational_surface_point};
    use approx::assert_abs_diff_eq;
    use nurbs_math::DVec3;

    fn quarter_circle() -> (Vec<f64>, Vec<Point3>, Vec<f64>) {
        (
            vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0],
            vec![DVec3::X, DVec3::new(1.0, 1.0, 0.0), DVec3::Y],
            vec![1.0, std::f64::consts::FRAC_1_SQRT_2, 1.0],
        )
    }

    /// Biquadratic patch with a bump and non-uniform weights.
    fn bumpy_patch() -> (Vec<f64>, Vec<Point3>, Vec<f64>) {
        let knots = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let mut cps = Vec::new();
        let mut weights = Vec::new();
        for i in 0..3 {
            for j in 0..3 {
                let z = if i == 1 && j == 1 { 1.5 } else { 0.1 * (i + j) as f64 };
                cps.push(DVec3::new(i as f64, j as f64, z));
                weights.push(1.0 + 0.25 * ((i * 3 + j) % 4) as f64);
            }
        }
        (knots, cps, weights)
    }

    #[test]
    fn test_curve_point_agrees_with_rational_point() {
        let (knots, cps, w) = quarter_circle();
        for s in 0..=10 {
            let u = s as f64 / 10.0;
            let ders = rational_curve_derivatives(2, &knots, &cps, &w, u, 2).unwrap();
            let p = rational_curve_point(2, &knots, &cps, &w, u).unwrap();
            assert_abs_diff_eq!(ders[0], p, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_circle_tangent_is_perpendicular_to_radius() {
        let (knots, cps, w) = quarter_circle();
        for s in 0..=10 {
            let u = s as f64 / 10.0;
            let ders = rational_curve_derivatives(2, &knots, &cps, &w, u, 1).unwrap();
            assert_abs_diff_eq!(ders[0].dot(ders[1]), 0.0, epsilon = 1e-12);
            assert!(ders[1].length() > 0.1);
        }
    }

    #[test]
    fn test_curve_tangent_matches_finite_difference() {
        let (knots, cps, w) = quarter_circle();
        let h = 1e-6;
        let u = 0.3;
        let ders = rational_curve_derivatives(2, &knots, &cps, &w, u, 1).unwrap();
        let fd = (rational_curve_point(2, &knots, &cps, &w, u + h).unwrap()
            - rational_curve_point(2, &knots, &cps, &w, u - h).unwrap())
            / (2.0 * h);
        assert_abs_diff_eq!(ders[1], fd, epsilon = 1e-6);
    }

    #[test]
    fn test_surface_partials_match_finite_difference() {
        let (knots, cps, w) = bumpy_patch();
        let point = |u: f64, v: f64| {
            rational_surface_point(2, 2, &knots, &knots, 3, &cps, &w, u, v).unwrap()
        };
        let h = 1e-6;
        for &(u, v) in &[(0.2, 0.3), (0.5, 0.5), (0.8, 0.1)] {
            let skl =
                rational_surface_derivatives(2, 2, &knots, &knots, 3, &cps, &w, u, v, 1).unwrap();
            assert_abs_diff_eq!(skl[0][0], point(u, v), epsilon = 1e-12);
            let fu = (point(u + h, v) - point(u - h, v)) / (2.0 * h);
            let fv = (point(u, v + h) - point(u, v - h)) / (2.0 * h);
            assert_abs_diff_eq!(skl[1][0], fu, epsilon = 1e-6);
            assert_abs_diff_eq!(skl[0][1], fv, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_surface_mixed_partial_matches_finite_difference() {
        let (knots, cps, w) = bumpy_patch();
        let h = 1e-5;
        let (u, v) = (0.4, 0.6);
        let su = |v: f64| {
            rational_surface_derivatives(2, 2, &knots, &knots, 3, &cps, &w, u, v, 1).unwrap()[1][0]
        };
        let skl = rational_surface_derivatives(2, 2, &knots, &knots, 3, &cps, &w, u, v, 2).unwrap();
        let fd = (su(v + h) - su(v - h)) / (2.0 * h);
        assert_abs_diff_eq!(skl[1][1], fd, epsilon = 1e-5);
    }

    #[test]
    fn test_unit_weights_match_polynomial_derivatives() {
        let (knots, cps, _) = bumpy_patch();
        let ones = vec![1.0; cps.len()];
        let (u, v) = (0.35, 0.7);
        let h = homogeneous_surface_derivatives(2, 2, &knots, &knots, 3, &cps, &ones, u, v, 2);
        let r = rational_surface_derivatives(2, 2, &knots, &knots, 3, &cps, &ones, u, v, 2).unwrap();
        for k in 0..=2 {
            for l in 0..=(2 - k) {
                assert_abs_diff_eq!(h[k][l].w, if k + l == 0 { 1.0 } else { 0.0 }, epsilon = 1e-12);
                assert_abs_diff_eq!(r[k][l], h[k][l].truncate(), epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_orders_above_degree_vanish() {
        let knots = vec![0.0, 0.0, 1.0, 1.0];
        let cps = vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::new(1.0, 1.0, 1.0)];
        let w = vec![1.0, 2.0, 2.0, 1.0];
        let h = homogeneous_surface_derivatives(1, 1, &knots, &knots, 2, &cps, &w, 0.5, 0.5, 2);
        assert_eq!(h[2][0], DVec4::ZERO);
        assert_eq!(h[0][2], DVec4::ZERO);
    }

    #[test]
    fn test_normal_orientation_and_degeneracy() {
        let n = surface_normal(DVec3::X, DVec3::Y, 0.0, 0.0).unwrap();
        assert_abs_diff_eq!(n, -DVec3::Z, epsilon = 1e-15);
        assert_eq!(
            surface_normal(DVec3::X, DVec3::X * 2.0, 0.1, 0.2),
            Err(NurbsError::DegenerateNormal { u: 0.1, v: 0.2 })
        );
    }

    #[test]
    fn test_degenerate_surface_weight() {
        let knots = vec![0.0, 0.0, 1.0, 1.0];
        let cps = vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::ONE];
        let w = vec![0.0; 4];
        let err = rational_surface_derivatives(1, 1, &knots, &knots, 2, &cps, &w, 0.5, 0.5, 1)
            .unwrap_err();
        assert!(err.is_degenerate());
    }
}

//! Point evaluation of polynomial and rational B-spline curves and surfaces.
//!
//! These are pure functions of already validated data: callers guarantee that
//! knot, point, and weight lengths agree and that the parameter lies in the
//! domain.

use nurbs_core::{NurbsError, Result, Tolerance};
use nurbs_math::{DVec3, Point3};

use super::basis::{basis_function, basis_row};

/// Evaluate a non-rational B-spline curve point: `Σ N_i(u) P_i`.
pub fn curve_point(degree: usize, knots: &[f64], control_points: &[Point3], u: f64) -> Point3 {
    control_points
        .iter()
        .enumerate()
        .fold(DVec3::ZERO, |acc, (i, &p)| {
            acc + basis_function(i, degree, u, knots) * p
        })
}

/// Evaluate a rational B-spline (NURBS) curve point at parameter `u`.
///
/// `W = Σ N_i w_i`, `P = Σ N_i w_i P_i / W`. A vanishing `W` is reported as
/// [`NurbsError::DegenerateWeight`].
pub fn rational_curve_point(
    degree: usize,
    knots: &[f64],
    control_points: &[Point3],
    weights: &[f64],
    u: f64,
) -> Result<Point3> {
    let mut point = DVec3::ZERO;
    let mut w = 0.0;

    for (i, (&cp, &wi)) in control_points.iter().zip(weights).enumerate() {
        let nw = basis_function(i, degree, u, knots) * wi;
        point += nw * cp;
        w += nw;
    }

    if Tolerance::is_degenerate_weight(w) {
        return Err(NurbsError::DegenerateWeight { u, v: None });
    }
    Ok(point / w)
}

/// Evaluate a rational tensor-product surface point at `(u, v)`.
///
/// `control_points` and `weights` are row-major grids with `cols` columns;
/// rows run along `u`, columns along `v`.
#[allow(clippy::too_many_arguments)]
pub fn rational_surface_point(
    degree_u: usize,
    degree_v: usize,
    knots_u: &[f64],
    knots_v: &[f64],
    cols: usize,
    control_points: &[Point3],
    weights: &[f64],
    u: f64,
    v: f64,
) -> Result<Point3> {
    let rows = control_points.len() / cols;
    let basis_u = basis_row(rows, degree_u, u, knots_u);
    let basis_v = basis_row(cols, degree_v, v, knots_v);

    let mut point = DVec3::ZERO;
    let mut w = 0.0;

    for (i, &nu) in basis_u.iter().enumerate() {
        if nu == 0.0 {
            continue;
        }
        for (j, &nv) in basis_v.iter().enumerate() {
            let idx = i * cols + j;
            let bw = nu * nv * weights[idx];
            point += bw * control_points[idx];
            w += bw;
        }
    }

    if Tolerance::is_degenerate_weight(w) {
        return Err(NurbsError::DegenerateWeight { u, v: Some(v) });
    }
    Ok(point / w)
}

//! Homogeneous coordinates for rational geometry.

use crate::{HomogeneousPoint, Point3};

/// Lift a weighted point into homogeneous form `(x·w, y·w, z·w, w)`.
#[inline]
pub fn lift(point: Point3, weight: f64) -> HomogeneousPoint {
    (point * weight).extend(weight)
}

/// Project a homogeneous point back to Cartesian space.
///
/// Returns `None` when the weight is exactly zero; callers decide what counts
/// as "too close" to zero.
#[inline]
pub fn project(hp: HomogeneousPoint) -> Option<Point3> {
    if hp.w == 0.0 {
        None
    } else {
        Some(hp.truncate() / hp.w)
    }
}

/// Binomial coefficient `C(n, k)` as a float, for the quotient-rule sums.
#[inline]
pub fn binomial(n: usize, k: usize) -> f64 {
    num_integer::binomial(n, k) as f64
}

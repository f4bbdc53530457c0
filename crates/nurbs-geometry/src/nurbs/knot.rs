//! Knot vectors: validation, span lookup, and uniform construction.

use log::debug;
use nurbs_core::{NurbsError, Result};
use serde::{Deserialize, Serialize};

/// A finite, non-decreasing sequence of parameter values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct KnotVector(Vec<f64>);

impl KnotVector {
    /// Wrap a knot sequence, rejecting NaN/infinite or decreasing values.
    pub fn new(knots: Vec<f64>) -> Result<Self> {
        if knots.iter().any(|k| !k.is_finite()) {
            return Err(NurbsError::NonFiniteInput("knot vector"));
        }
        if let Some(i) = knots.windows(2).position(|w| w[0] > w[1]) {
            return Err(NurbsError::KnotsNotMonotonic {
                index: i,
                previous: knots[i],
                next: knots[i + 1],
            });
        }
        Ok(Self(knots))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of control points this vector supports at `degree`.
    pub fn control_point_count(&self, degree: usize) -> usize {
        self.0.len().saturating_sub(degree + 1)
    }

    /// Check `len == control_points + degree + 1` and that the domain is
    /// non-empty.
    pub fn check(&self, degree: usize, control_points: usize) -> Result<()> {
        if degree >= control_points {
            return Err(NurbsError::InvalidDegree {
                degree,
                control_points,
            });
        }
        let expected = control_points + degree + 1;
        if self.0.len() != expected {
            return Err(NurbsError::KnotCountMismatch {
                expected,
                actual: self.0.len(),
            });
        }
        let (start, end) = self.domain(degree);
        if start >= end {
            return Err(NurbsError::EmptyDomain { start, end });
        }
        Ok(())
    }

    /// Parameter domain `[U[p], U[len-p-1]]`.
    ///
    /// Requires a vector that passed [`check`](Self::check) for `degree`.
    pub(crate) fn domain(&self, degree: usize) -> (f64, f64) {
        let m = self.0.len() - 1;
        (self.0[degree], self.0[m - degree])
    }

    /// Clamp `t` into the domain, rejecting values more than `tolerance`
    /// outside it.
    pub(crate) fn clamp_parameter(&self, degree: usize, t: f64, tolerance: f64) -> Result<f64> {
        let (start, end) = self.domain(degree);
        if !t.is_finite() || t < start - tolerance || t > end + tolerance {
            return Err(NurbsError::ParameterOutOfDomain {
                value: t,
                start,
                end,
            });
        }
        Ok(t.clamp(start, end))
    }

    /// Whether the first and last `degree + 1` knots coincide.
    pub fn is_clamped(&self, degree: usize) -> bool {
        let k = &self.0;
        if k.len() < 2 * (degree + 1) {
            return false;
        }
        let m = k.len() - 1;
        k[..=degree].iter().all(|&x| x == k[0]) && k[m - degree..].iter().all(|&x| x == k[m])
    }
}

impl TryFrom<Vec<f64>> for KnotVector {
    type Error = NurbsError;

    fn try_from(knots: Vec<f64>) -> Result<Self> {
        Self::new(knots)
    }
}

impl From<KnotVector> for Vec<f64> {
    fn from(kv: KnotVector) -> Self {
        kv.0
    }
}

impl AsRef<[f64]> for KnotVector {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

/// Find the knot span index for parameter `t` in the knot vector.
///
/// Returns the index `i` such that `knots[i] <= t < knots[i+1]`, clamped to
/// the first valid span below the domain and the last valid span at or above
/// its end.
///
/// # Arguments
/// * `degree` - Degree of the B-spline
/// * `knots` - The knot vector
/// * `n` - Number of control points minus 1
/// * `t` - Parameter value
pub fn find_span(degree: usize, knots: &[f64], n: usize, t: f64) -> usize {
    // Special case: t at upper boundary
    if t >= knots[n + 1] {
        return n;
    }
    if t <= knots[degree] {
        // Skip over zero-length spans at the start of an unclamped domain.
        let mut span = degree;
        while span < n && knots[span + 1] <= t {
            span += 1;
        }
        return span;
    }

    // Binary search
    let mut low = degree;
    let mut high = n + 1;
    let mut mid = (low + high) / 2;

    while t < knots[mid] || t >= knots[mid + 1] {
        if t < knots[mid] {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }

    mid
}

/// Strategy for producing a knot vector that matches a control point count.
///
/// Structural edits only go through this trait, so a local knot insertion
/// scheme can replace the uniform rebuild without touching callers.
pub trait KnotVectorBuilder {
    /// Build a knot vector for `control_points` points at `degree`.
    fn build(&self, control_points: usize, degree: usize) -> Result<KnotVector>;

    /// Produce the knot vector after one point was added or removed.
    fn rebuild(
        &self,
        existing: &KnotVector,
        degree: usize,
        adding_point: bool,
    ) -> Result<KnotVector> {
        let count = existing.control_point_count(degree);
        let count = if adding_point {
            count + 1
        } else {
            count.checked_sub(1).ok_or(NurbsError::InvalidDegree {
                degree,
                control_points: 0,
            })?
        };
        self.build(count, degree)
    }
}

/// Uniform knots over `[0, 1]`, optionally clamped at both ends.
///
/// Every call rebuilds the whole vector, so changing the point count
/// reparametrizes the entire curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UniformKnotBuilder {
    pub clamped: bool,
}

impl UniformKnotBuilder {
    pub fn clamped() -> Self {
        Self { clamped: true }
    }

    pub fn unclamped() -> Self {
        Self { clamped: false }
    }
}

impl KnotVectorBuilder for UniformKnotBuilder {
    fn build(&self, control_points: usize, degree: usize) -> Result<KnotVector> {
        if degree >= control_points {
            return Err(NurbsError::InvalidDegree {
                degree,
                control_points,
            });
        }
        let n = control_points + degree;
        let mut knots: Vec<f64> = (0..=n).map(|i| i as f64 / n as f64).collect();
        if self.clamped {
            knots[..=degree].fill(0.0);
            knots[n - degree..].fill(1.0);
        }
        debug!(
            "built {} knot vector: {} points, degree {}",
            if self.clamped { "clamped" } else { "uniform" },
            control_points,
            degree
        );
        Ok(KnotVector(knots))
    }
}

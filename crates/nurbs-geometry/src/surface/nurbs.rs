//! Tensor-product NURBS surfaces.

use nurbs_core::traits::{BoundingBox, Validate};
use nurbs_core::{ControlPointHandle, NurbsError, Result, Tolerance};
use nurbs_math::{Aabb3, Point3, Vector3};
use serde::{Deserialize, Serialize};

use super::Surface;
use crate::nurbs::{
    homogeneous_surface_derivatives, rational_surface_derivatives, rational_surface_point,
    surface_normal, KnotVector,
};
use crate::tessellate::{self, TriangleMesh};

/// A NURBS surface over a row-major grid of weighted control points.
///
/// Rows follow `u` (`rows == knots_u.len() - degree_u - 1`), columns follow
/// `v` (`cols == knots_v.len() - degree_v - 1`); entry `(i, j)` lives at
/// index `i * cols + j`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SurfaceData", into = "SurfaceData")]
pub struct NurbsSurface {
    pub(crate) degree_u: usize,
    pub(crate) degree_v: usize,
    pub(crate) knots_u: KnotVector,
    pub(crate) knots_v: KnotVector,
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) control_points: Vec<Point3>,
    pub(crate) weights: Vec<f64>,
}

/// Unvalidated wire form of a [`NurbsSurface`].
#[derive(Serialize, Deserialize)]
struct SurfaceData {
    degree_u: usize,
    degree_v: usize,
    knots_u: Vec<f64>,
    knots_v: Vec<f64>,
    rows: usize,
    cols: usize,
    control_points: Vec<Point3>,
    weights: Vec<f64>,
}

impl TryFrom<SurfaceData> for NurbsSurface {
    type Error = NurbsError;

    fn try_from(d: SurfaceData) -> Result<Self> {
        Self::new(
            d.rows,
            d.cols,
            d.control_points,
            d.weights,
            d.knots_u,
            d.knots_v,
            d.degree_u,
            d.degree_v,
        )
    }
}

impl From<NurbsSurface> for SurfaceData {
    fn from(s: NurbsSurface) -> Self {
        Self {
            degree_u: s.degree_u,
            degree_v: s.degree_v,
            knots_u: s.knots_u.into(),
            knots_v: s.knots_v.into(),
            rows: s.rows,
            cols: s.cols,
            control_points: s.control_points,
            weights: s.weights,
        }
    }
}

impl NurbsSurface {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        rows: usize,
        cols: usize,
        control_points: Vec<Point3>,
        weights: Vec<f64>,
        knots_u: Vec<f64>,
        knots_v: Vec<f64>,
        degree_u: usize,
        degree_v: usize,
    ) -> Result<Self> {
        let surface = Self {
            degree_u,
            degree_v,
            knots_u: KnotVector::new(knots_u)?,
            knots_v: KnotVector::new(knots_v)?,
            rows,
            cols,
            control_points,
            weights,
        };
        surface.validate()?;
        Ok(surface)
    }

    pub fn degrees(&self) -> (usize, usize) {
        (self.degree_u, self.degree_v)
    }

    pub fn knots_u(&self) -> &KnotVector {
        &self.knots_u
    }

    pub fn knots_v(&self) -> &KnotVector {
        &self.knots_v
    }

    /// Grid size as `(rows, cols)`.
    pub fn grid_size(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn control_points(&self) -> &[Point3] {
        &self.control_points
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Handle of grid entry `(row, col)`.
    pub fn handle(&self, row: usize, col: usize) -> Result<ControlPointHandle> {
        if row >= self.rows || col >= self.cols {
            return Err(NurbsError::IndexOutOfRange {
                index: row * self.cols + col,
                count: self.control_points.len(),
            });
        }
        Ok(ControlPointHandle::from_grid(row, col, self.cols))
    }

    pub(crate) fn check_handle(&self, handle: ControlPointHandle) -> Result<usize> {
        let i = handle.index();
        if i >= self.control_points.len() {
            return Err(NurbsError::IndexOutOfRange {
                index: i,
                count: self.control_points.len(),
            });
        }
        Ok(i)
    }

    fn clamp_uv(&self, u: f64, v: f64, tolerance: Tolerance) -> Result<(f64, f64)> {
        let u = self
            .knots_u
            .clamp_parameter(self.degree_u, u, tolerance.linear)?;
        let v = self
            .knots_v
            .clamp_parameter(self.degree_v, v, tolerance.linear)?;
        Ok((u, v))
    }

    /// Cartesian derivatives `SKL[k][l]`, `k + l <= order`, at `(u, v)`.
    pub fn derivatives(&self, u: f64, v: f64, order: usize) -> Result<Vec<Vec<Vector3>>> {
        self.derivatives_within(u, v, order, Tolerance::default())
    }

    /// [`derivatives`](Self::derivatives) with parameters up to
    /// `tolerance.linear` outside either domain clamped onto it.
    pub fn derivatives_within(
        &self,
        u: f64,
        v: f64,
        order: usize,
        tolerance: Tolerance,
    ) -> Result<Vec<Vec<Vector3>>> {
        let (u, v) = self.clamp_uv(u, v, tolerance)?;
        rational_surface_derivatives(
            self.degree_u,
            self.degree_v,
            self.knots_u.as_slice(),
            self.knots_v.as_slice(),
            self.cols,
            &self.control_points,
            &self.weights,
            u,
            v,
            order,
        )
    }

    /// Derivatives of the homogeneous (4D) surface; the `w` components are
    /// the weight function and its derivatives.
    pub fn homogeneous_derivatives(
        &self,
        u: f64,
        v: f64,
        order: usize,
    ) -> Result<Vec<Vec<nurbs_math::HomogeneousPoint>>> {
        let (u, v) = self.clamp_uv(u, v, Tolerance::default())?;
        Ok(homogeneous_surface_derivatives(
            self.degree_u,
            self.degree_v,
            self.knots_u.as_slice(),
            self.knots_v.as_slice(),
            self.cols,
            &self.control_points,
            &self.weights,
            u,
            v,
            order,
        ))
    }

    /// Surface point at `(u, v)` with the given domain tolerance.
    pub fn point_at_within(&self, u: f64, v: f64, tolerance: Tolerance) -> Result<Point3> {
        let (u, v) = self.clamp_uv(u, v, tolerance)?;
        rational_surface_point(
            self.degree_u,
            self.degree_v,
            self.knots_u.as_slice(),
            self.knots_v.as_slice(),
            self.cols,
            &self.control_points,
            &self.weights,
            u,
            v,
        )
    }

    /// Unit normal at `(u, v)` with the given domain tolerance.
    pub fn normal_at_within(&self, u: f64, v: f64, tolerance: Tolerance) -> Result<Vector3> {
        let skl = self.derivatives_within(u, v, 1, tolerance)?;
        surface_normal(skl[1][0], skl[0][1], u, v)
    }

    /// Sample the surface on a `(n+1) × (n+1)` grid with `n = subdivisions`.
    pub fn evaluate_mesh(&self, subdivisions: usize) -> Result<TriangleMesh> {
        tessellate::surface_to_mesh(self, subdivisions)
    }
}

impl Validate for NurbsSurface {
    fn validate(&self) -> Result<()> {
        let expected = self.rows * self.cols;
        if self.control_points.len() != expected {
            return Err(NurbsError::GridSizeMismatch {
                rows: self.rows,
                cols: self.cols,
                expected,
                actual: self.control_points.len(),
            });
        }
        if self.weights.len() != expected {
            return Err(NurbsError::WeightCountMismatch {
                expected,
                actual: self.weights.len(),
            });
        }
        if self.control_points.iter().any(|p| !p.is_finite()) {
            return Err(NurbsError::NonFiniteInput("control points"));
        }
        if self.weights.iter().any(|w| !w.is_finite()) {
            return Err(NurbsError::NonFiniteInput("weights"));
        }
        self.knots_u.check(self.degree_u, self.rows)?;
        self.knots_v.check(self.degree_v, self.cols)
    }
}

impl BoundingBox for NurbsSurface {
    type Point = Point3;

    fn bounding_box(&self) -> (Point3, Point3) {
        let aabb = Aabb3::from_points(&self.control_points)
            .unwrap_or(Aabb3::new(Point3::ZERO, Point3::ZERO));
        (aabb.min, aabb.max)
    }
}

impl Surface for NurbsSurface {
    fn point_at(&self, u: f64, v: f64) -> Result<Point3> {
        self.point_at_within(u, v, Tolerance::default())
    }

    fn partials_at(&self, u: f64, v: f64) -> Result<(Vector3, Vector3)> {
        let skl = self.derivatives(u, v, 1)?;
        Ok((skl[1][0], skl[0][1]))
    }

    fn normal_at(&self, u: f64, v: f64) -> Result<Vector3> {
        self.normal_at_within(u, v, Tolerance::default())
    }

    fn domain_u(&self) -> (f64, f64) {
        self.knots_u.domain(self.degree_u)
    }

    fn domain_v(&self) -> (f64, f64) {
        self.knots_v.domain(self.degree_v)
    }
}

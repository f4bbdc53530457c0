//! Rational B-spline (NURBS) curves.

use nurbs_core::traits::{BoundingBox, Validate};
use nurbs_core::{ControlPointHandle, NurbsError, Result, Tolerance};
use nurbs_math::{lift, Aabb3, HomogeneousPoint, Point3, Vector3};
use serde::{Deserialize, Serialize};

use super::Curve;
use crate::nurbs::{rational_curve_derivatives, rational_curve_point, KnotVector, KnotVectorBuilder};
use crate::tessellate;

/// A 3D position with its rational weight.
///
/// Weight 1 everywhere recovers a plain B-spline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub position: Point3,
    pub weight: f64,
}

impl ControlPoint {
    pub fn new(position: Point3, weight: f64) -> Self {
        Self { position, weight }
    }

    /// `(x·w, y·w, z·w, w)`
    pub fn homogeneous(&self) -> HomogeneousPoint {
        lift(self.position, self.weight)
    }
}

/// A NURBS (Non-Uniform Rational B-Spline) curve.
///
/// The curve exclusively owns its control points, weights and knots; they
/// are only changed through the edit operations in [`crate::editor`], which
/// keep `control_points.len() == weights.len() == knots.len() - degree - 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CurveData", into = "CurveData")]
pub struct NurbsCurve {
    pub(crate) degree: usize,
    pub(crate) knots: KnotVector,
    pub(crate) control_points: Vec<Point3>,
    pub(crate) weights: Vec<f64>,
}

/// Unvalidated wire form of a [`NurbsCurve`].
#[derive(Serialize, Deserialize)]
struct CurveData {
    degree: usize,
    knots: Vec<f64>,
    control_points: Vec<Point3>,
    weights: Vec<f64>,
}

impl TryFrom<CurveData> for NurbsCurve {
    type Error = NurbsError;

    fn try_from(data: CurveData) -> Result<Self> {
        Self::new(data.degree, data.knots, data.control_points, data.weights)
    }
}

impl From<NurbsCurve> for CurveData {
    fn from(curve: NurbsCurve) -> Self {
        Self {
            degree: curve.degree,
            knots: curve.knots.into(),
            control_points: curve.control_points,
            weights: curve.weights,
        }
    }
}

impl NurbsCurve {
    /// Build a curve from a loaded `(points, weights, knots, degree)` set,
    /// rejecting inconsistent lengths.
    pub fn new(
        degree: usize,
        knots: Vec<f64>,
        control_points: Vec<Point3>,
        weights: Vec<f64>,
    ) -> Result<Self> {
        let curve = Self {
            degree,
            knots: KnotVector::new(knots)?,
            control_points,
            weights,
        };
        curve.validate()?;
        Ok(curve)
    }

    /// Build a curve from `(x, y, z, w)` control points.
    pub fn from_control_points(
        degree: usize,
        knots: Vec<f64>,
        control_points: &[ControlPoint],
    ) -> Result<Self> {
        let (points, weights) = control_points
            .iter()
            .map(|cp| (cp.position, cp.weight))
            .unzip();
        Self::new(degree, knots, points, weights)
    }

    /// Build a curve whose knot vector is generated by `builder`.
    pub fn with_builder(
        degree: usize,
        control_points: Vec<Point3>,
        weights: Vec<f64>,
        builder: &impl KnotVectorBuilder,
    ) -> Result<Self> {
        let knots = builder.build(control_points.len(), degree)?;
        let curve = Self {
            degree,
            knots,
            control_points,
            weights,
        };
        curve.validate()?;
        Ok(curve)
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn knots(&self) -> &KnotVector {
        &self.knots
    }

    pub fn control_points(&self) -> &[Point3] {
        &self.control_points
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.control_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.control_points.is_empty()
    }

    /// Smallest point count the degree allows.
    pub fn min_control_points(&self) -> usize {
        self.degree + 1
    }

    pub fn handles(&self) -> impl Iterator<Item = ControlPointHandle> {
        (0..self.len()).map(ControlPointHandle::new)
    }

    pub fn control_point(&self, handle: ControlPointHandle) -> Result<ControlPoint> {
        let i = self.check_handle(handle)?;
        Ok(ControlPoint::new(self.control_points[i], self.weights[i]))
    }

    pub(crate) fn check_handle(&self, handle: ControlPointHandle) -> Result<usize> {
        let i = handle.index();
        if i >= self.len() {
            return Err(NurbsError::IndexOutOfRange {
                index: i,
                count: self.len(),
            });
        }
        Ok(i)
    }

    /// Derivatives of the curve up to and including `order` at `u`.
    pub fn derivatives(&self, u: f64, order: usize) -> Result<Vec<Vector3>> {
        self.derivatives_within(u, order, Tolerance::default())
    }

    /// [`derivatives`](Self::derivatives), clamping any `u` within
    /// `tolerance.linear` of the domain onto it.
    pub fn derivatives_within(
        &self,
        u: f64,
        order: usize,
        tolerance: Tolerance,
    ) -> Result<Vec<Vector3>> {
        let u = self
            .knots
            .clamp_parameter(self.degree, u, tolerance.linear)?;
        rational_curve_derivatives(
            self.degree,
            self.knots.as_slice(),
            &self.control_points,
            &self.weights,
            u,
            order,
        )
    }

    /// Curve point at `t`, clamping any `t` within `tolerance.linear` of the
    /// domain onto it.
    pub fn point_at_within(&self, t: f64, tolerance: Tolerance) -> Result<Point3> {
        let t = self
            .knots
            .clamp_parameter(self.degree, t, tolerance.linear)?;
        rational_curve_point(
            self.degree,
            self.knots.as_slice(),
            &self.control_points,
            &self.weights,
            t,
        )
    }

    /// Sample `sample_count` uniformly spaced points across the domain,
    /// both ends included.
    pub fn evaluate_polyline(&self, sample_count: usize) -> Result<Vec<Point3>> {
        tessellate::curve_to_polyline(self, sample_count)
    }
}

impl Validate for NurbsCurve {
    fn validate(&self) -> Result<()> {
        if self.weights.len() != self.control_points.len() {
            return Err(NurbsError::WeightCountMismatch {
                expected: self.control_points.len(),
                actual: self.weights.len(),
            });
        }
        if self.control_points.iter().any(|p| !p.is_finite()) {
            return Err(NurbsError::NonFiniteInput("control points"));
        }
        if self.weights.iter().any(|w| !w.is_finite()) {
            return Err(NurbsError::NonFiniteInput("weights"));
        }
        self.knots.check(self.degree, self.control_points.len())
    }
}

impl BoundingBox for NurbsCurve {
    type Point = Point3;

    /// Box around the control polygon, which contains the curve when every
    /// weight is positive.
    fn bounding_box(&self) -> (Point3, Point3) {
        let aabb = Aabb3::from_points(&self.control_points)
            .unwrap_or(Aabb3::new(Point3::ZERO, Point3::ZERO));
        (aabb.min, aabb.max)
    }
}

impl Curve for NurbsCurve {
    fn point_at(&self, t: f64) -> Result<Point3> {
        self.point_at_within(t, Tolerance::default())
    }

    fn tangent_at(&self, t: f64) -> Result<Vector3> {
        Ok(self.derivatives(t, 1)?[1])
    }

    fn domain(&self) -> (f64, f64) {
        self.knots.domain(self.degree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nurbs::UniformKnotBuilder;
    use approx::assert_abs_diff_eq;
    use nurbs_math::DVec3;

    fn wavy() -> NurbsCurve {
        NurbsCurve::with_builder(
            3,
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(1.0, 2.0, 0.0),
                DVec3::new(2.0, -1.0, 0.5),
                DVec3::new(3.0, 1.0, 0.0),
                DVec3::new(4.0, 0.0, 1.0),
            ],
            vec![1.0, 0.5, 2.0, 1.5, 1.0],
            &UniformKnotBuilder::clamped(),
        )
        .unwrap()
    }

    #[test]
    fn test_construction_errors() {
        let pts = vec![DVec3::ZERO, DVec3::X, DVec3::Y];
        let knots = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        assert_eq!(
            NurbsCurve::new(2, knots.clone(), pts.clone(), vec![1.0; 2]),
            Err(NurbsError::WeightCountMismatch {
                expected: 3,
                actual: 2
            })
        );
        assert!(matches!(
            NurbsCurve::new(3, knots.clone(), pts.clone(), vec![1.0; 3]),
            Err(NurbsError::InvalidDegree { .. })
        ));
        assert!(matches!(
            NurbsCurve::new(2, knots[1..].to_vec(), pts.clone(), vec![1.0; 3]),
            Err(NurbsError::KnotCountMismatch { .. })
        ));
        assert!(NurbsCurve::new(2, knots, pts, vec![1.0, f64::INFINITY, 1.0]).is_err());
    }

    #[test]
    fn test_clamped_endpoints_interpolate() {
        let curve = wavy();
        let (a, b) = curve.domain();
        assert_abs_diff_eq!(curve.point_at(a).unwrap(), curve.control_points()[0], epsilon = 1e-12);
        assert_abs_diff_eq!(curve.point_at(b).unwrap(), curve.control_points()[4], epsilon = 1e-12);
    }

    #[test]
    fn test_control_point_lookup() {
        let curve = wavy();
        let cp = curve.control_point(ControlPointHandle::new(2)).unwrap();
        assert_eq!(cp.position, DVec3::new(2.0, -1.0, 0.5));
        assert_eq!(cp.homogeneous().w, 2.0);
        assert_eq!(cp.homogeneous().x, 4.0);
        assert_eq!(
            curve.control_point(ControlPointHandle::new(5)),
            Err(NurbsError::IndexOutOfRange { index: 5, count: 5 })
        );
        assert_eq!(curve.handles().count(), 5);
    }

    #[test]
    fn test_from_control_points() {
        let cps = [
            ControlPoint::new(DVec3::ZERO, 1.0),
            ControlPoint::new(DVec3::X, 3.0),
        ];
        let curve = NurbsCurve::from_control_points(1, vec![0.0, 0.0, 1.0, 1.0], &cps).unwrap();
        assert_eq!(curve.weights(), &[1.0, 3.0]);
        // Weighted midpoint: 3/4 of the way to the heavy point.
        assert_abs_diff_eq!(curve.point_at(0.5).unwrap(), DVec3::new(0.75, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_tangent_matches_first_derivative() {
        let curve = wavy();
        let ders = curve.derivatives(0.4, 2).unwrap();
        assert_eq!(ders.len(), 3);
        assert_abs_diff_eq!(curve.tangent_at(0.4).unwrap(), ders[1], epsilon = 1e-15);
        assert_abs_diff_eq!(curve.point_at(0.4).unwrap(), ders[0], epsilon = 1e-12);
    }

    #[test]
    fn test_point_at_within_widens_domain() {
        let curve = wavy();
        let (_, end) = curve.domain();
        let past = end + 1e-4;
        assert!(matches!(
            curve.point_at(past),
            Err(NurbsError::ParameterOutOfDomain { .. })
        ));
        let loose = Tolerance::new(1e-3);
        assert_eq!(curve.point_at_within(past, loose), curve.point_at(end));
        let ders = curve.derivatives_within(past, 1, loose).unwrap();
        assert_eq!(ders[1], curve.tangent_at(end).unwrap());
    }

    #[test]
    fn test_bounding_box_contains_samples() {
        let curve = wavy();
        let (min, max) = curve.bounding_box();
        let aabb = Aabb3::new(min, max).expand(1e-9);
        for p in curve.evaluate_polyline(64).unwrap() {
            assert!(aabb.contains_point(p), "{:?} outside control hull box", p);
        }
    }

    #[test]
    fn test_json_round_trip_validates() {
        let curve = wavy();
        let text = serde_json::to_string(&curve).unwrap();
        let back: NurbsCurve = serde_json::from_str(&text).unwrap();
        assert_eq!(back, curve);

        let bad = r#"{"degree":2,"knots":[0,0,1,1],"control_points":[[0,0,0],[1,0,0]],"weights":[1,1]}"#;
        assert!(serde_json::from_str::<NurbsCurve>(bad).is_err());
    }
}

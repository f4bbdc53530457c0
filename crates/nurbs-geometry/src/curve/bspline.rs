//! Non-rational B-spline curves.

use nurbs_core::{traits::Validate, NurbsError, Result, Tolerance};
use nurbs_math::{Point3, Vector3};
use serde::Serialize;

use super::Curve;
use crate::nurbs::{curve_derivatives, curve_point, KnotVector};

/// A B-spline curve defined by degree, knot vector, and control points.
///
/// Equivalent to a [`NurbsCurve`](super::NurbsCurve) with every weight 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BSplineCurve {
    degree: usize,
    knots: KnotVector,
    control_points: Vec<Point3>,
}

impl BSplineCurve {
    pub fn new(degree: usize, knots: Vec<f64>, control_points: Vec<Point3>) -> Result<Self> {
        let curve = Self {
            degree,
            knots: KnotVector::new(knots)?,
            control_points,
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
}

impl Validate for BSplineCurve {
    fn validate(&self) -> Result<()> {
        if self.control_points.iter().any(|p| !p.is_finite()) {
            return Err(NurbsError::NonFiniteInput("control points"));
        }
        self.knots.check(self.degree, self.control_points.len())
    }
}

impl Curve for BSplineCurve {
    fn point_at(&self, t: f64) -> Result<Point3> {
        let t = self
            .knots
            .clamp_parameter(self.degree, t, Tolerance::DEFAULT_LINEAR)?;
        Ok(curve_point(
            self.degree,
            self.knots.as_slice(),
            &self.control_points,
            t,
        ))
    }

    fn tangent_at(&self, t: f64) -> Result<Vector3> {
        let t = self
            .knots
            .clamp_parameter(self.degree, t, Tolerance::DEFAULT_LINEAR)?;
        let ders = curve_derivatives(
            self.degree,
            self.knots.as_slice(),
            &self.control_points,
            t,
            1,
        );
        Ok(ders[1])
    }

    fn domain(&self) -> (f64, f64) {
        self.knots.domain(self.degree)
    }
}

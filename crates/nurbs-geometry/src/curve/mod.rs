//! Curve traits and implementations.

mod bspline;
mod circle;
mod nurbs;

use nurbs_core::Result;
use nurbs_math::{Point3, Vector3};

pub use bspline::BSplineCurve;
pub use nurbs::{ControlPoint, NurbsCurve};

/// Trait for parametric curves in 3D space.
pub trait Curve: Send + Sync {
    /// Evaluate the curve at parameter `t`.
    fn point_at(&self, t: f64) -> Result<Point3>;

    /// Evaluate the tangent vector at parameter `t`.
    fn tangent_at(&self, t: f64) -> Result<Vector3>;

    /// Return the parameter domain `(t_min, t_max)`.
    fn domain(&self) -> (f64, f64);

    /// Whether the curve is closed (start == end).
    fn is_closed(&self) -> bool {
        let (a, b) = self.domain();
        match (self.point_at(a), self.point_at(b)) {
            (Ok(p), Ok(q)) => (p - q).length() < nurbs_core::Tolerance::DEFAULT_LINEAR,
            _ => false,
        }
    }
}

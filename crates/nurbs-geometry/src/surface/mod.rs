//! Surface traits and implementations.

mod nurbs;

use nurbs_core::Result;
use nurbs_math::{Point3, Vector3};

pub use nurbs::NurbsSurface;

/// Trait for parametric surfaces in 3D space.
pub trait Surface: Send + Sync {
    /// Evaluate the surface at parameters `(u, v)`.
    fn point_at(&self, u: f64, v: f64) -> Result<Point3>;

    /// First partial derivatives `(dP/du, dP/dv)` at `(u, v)`.
    fn partials_at(&self, u: f64, v: f64) -> Result<(Vector3, Vector3)>;

    /// Evaluate the unit surface normal at parameters `(u, v)`.
    fn normal_at(&self, u: f64, v: f64) -> Result<Vector3>;

    /// Return the u-parameter domain `(u_min, u_max)`.
    fn domain_u(&self) -> (f64, f64);

    /// Return the v-parameter domain `(v_min, v_max)`.
    fn domain_v(&self) -> (f64, f64);
}

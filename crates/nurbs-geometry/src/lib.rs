//! NURBS geometry: knot vectors, basis functions, rational curves and
//! surfaces, their derivatives, and consistent structural editing.

pub mod curve;
pub mod editor;
pub mod nurbs;
pub mod surface;
pub mod tessellate;

pub use curve::{BSplineCurve, ControlPoint, Curve, NurbsCurve};
pub use editor::{CurveEditor, EditSession, SurfaceEditor};
pub use nurbs::{KnotVector, KnotVectorBuilder, UniformKnotBuilder};
pub use surface::{NurbsSurface, Surface};
pub use tessellate::TriangleMesh;

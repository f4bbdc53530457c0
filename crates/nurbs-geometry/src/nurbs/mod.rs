//! NURBS core algorithms: knot vectors, basis functions, rational
//! evaluation, and derivatives.

pub mod basis;
pub mod derivatives;
pub mod knot;
pub mod rational;

pub use basis::{basis_function, basis_function_derivatives, basis_row};
pub use derivatives::{
    curve_derivatives, homogeneous_curve_derivatives, homogeneous_surface_derivatives, rational_curve_derivatives,
    rational_surface_derivatives, surface_normal,
};
pub use knot::{find_span, KnotVector, KnotVectorBuilder, UniformKnotBuilder};
pub use rational::{curve_point, rational_curve_point, rational_surface_point};

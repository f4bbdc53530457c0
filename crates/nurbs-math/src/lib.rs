pub mod aabb;
pub mod homogeneous;

pub use aabb::Aabb3;
pub use glam::{DVec3, DVec4};
pub use homogeneous::{binomial, lift, project};

pub type Point3 = DVec3;
pub type Vector3 = DVec3;
/// Weighted point `(x·w, y·w, z·w, w)`.
pub type HomogeneousPoint = DVec4;

//! Sampling curves and surfaces into polylines and triangle meshes.
//!
//! Sampling is eager: every call evaluates the full parameter grid and
//! returns owned buffers, so results can be redrawn or discarded freely.

use nurbs_core::{NurbsError, Result};
use nurbs_math::{Aabb3, Point3, Vector3};

use crate::curve::Curve;
use crate::surface::Surface;

/// Triangle mesh with one normal per vertex.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub positions: Vec<Point3>,
    pub normals: Vec<Vector3>,
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    /// Number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Compute the axis-aligned bounding box of all positions.
    pub fn bounding_box(&self) -> Aabb3 {
        Aabb3::from_points(&self.positions).unwrap_or(Aabb3::new(Point3::ZERO, Point3::ZERO))
    }

    /// Replace the normals of `vertices`, given with their `(u, v)`, by the
    /// normalized sum of the normals of their adjacent triangles, flipped by
    /// `sign`. Fails if every adjacent triangle is degenerate too.
    fn smooth_normals(&mut self, vertices: &[(usize, f64, f64)], sign: f64) -> Result<()> {
        let mut accum = vec![Vector3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let p0 = self.positions[i0];
            let normal = (self.positions[i1] - p0).cross(self.positions[i2] - p0);
            accum[i0] += normal;
            accum[i1] += normal;
            accum[i2] += normal;
        }
        for &(vertex, u, v) in vertices {
            let normal = (sign * accum[vertex]).normalize_or_zero();
            if normal == Vector3::ZERO {
                return Err(NurbsError::DegenerateNormal { u, v });
            }
            self.normals[vertex] = normal;
        }
        Ok(())
    }
}

/// Sample `sample_count` points uniformly across the curve's domain, both
/// ends included.
pub fn curve_to_polyline(curve: &dyn Curve, sample_count: usize) -> Result<Vec<Point3>> {
    if sample_count < 2 {
        return Err(NurbsError::InvalidSampleCount {
            count: sample_count,
            minimum: 2,
        });
    }
    let (t_min, t_max) = curve.domain();
    let last = (sample_count - 1) as f64;
    (0..sample_count)
        .map(|i| {
            let t = if i + 1 == sample_count {
                t_max
            } else {
                t_min + (t_max - t_min) * i as f64 / last
            };
            curve.point_at(t)
        })
        .collect()
}

/// Convert a surface to a triangle mesh using uniform parameter subdivision.
///
/// Produces a `(subdivisions + 1)²` vertex grid, row `i` along `u`, and
/// `2 · subdivisions²` triangles. Vertices where the analytic normal is
/// undefined (collapsed rows or columns) take the averaged normal of the
/// adjacent triangles. A degenerate weight anywhere, or a vertex with no
/// non-degenerate triangle around it, fails the whole mesh.
pub fn surface_to_mesh(surface: &dyn Surface, subdivisions: usize) -> Result<TriangleMesh> {
    if subdivisions < 1 {
        return Err(NurbsError::InvalidSampleCount {
            count: subdivisions,
            minimum: 1,
        });
    }
    let (u_min, u_max) = surface.domain_u();
    let (v_min, v_max) = surface.domain_v();
    let count = subdivisions + 1;
    let param = |lo: f64, hi: f64, i: usize| {
        if i == subdivisions {
            hi
        } else {
            lo + (hi - lo) * i as f64 / subdivisions as f64
        }
    };

    let mut mesh = TriangleMesh {
        positions: Vec::with_capacity(count * count),
        normals: Vec::with_capacity(count * count),
        indices: Vec::with_capacity(subdivisions * subdivisions * 6),
    };
    let mut repair = Vec::new();

    for i in 0..count {
        let u = param(u_min, u_max, i);
        for j in 0..count {
            let v = param(v_min, v_max, j);
            mesh.positions.push(surface.point_at(u, v)?);
            match surface.normal_at(u, v) {
                Ok(n) => mesh.normals.push(n),
                Err(NurbsError::DegenerateNormal { .. }) => {
                    repair.push((mesh.normals.len(), u, v));
                    mesh.normals.push(Vector3::ZERO);
                }
                Err(e) => return Err(e),
            }
        }
    }

    let idx = |ii: usize, jj: usize| -> u32 { (ii * count + jj) as u32 };
    for i in 0..subdivisions {
        for j in 0..subdivisions {
            mesh.indices
                .extend_from_slice(&[idx(i, j), idx(i + 1, j), idx(i + 1, j + 1)]);
            mesh.indices
                .extend_from_slice(&[idx(i, j), idx(i + 1, j + 1), idx(i, j + 1)]);
        }
    }

    if !repair.is_empty() {
        // Triangle winding follows Su x Sv; surface normals point the other way.
        mesh.smooth_normals(&repair, -1.0)?;
    }

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::NurbsCurve;
    use crate::surface::NurbsSurface;
    use approx::assert_abs_diff_eq;
    use nurbs_math::DVec3;

    fn plane(weights: Vec<f64>) -> NurbsSurface {
        NurbsSurface::new(
            2,
            2,
            vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::new(1.0, 1.0, 0.0)],
            weights,
            vec![0.0, 0.0, 1.0, 1.0],
            vec![0.0, 0.0, 1.0, 1.0],
            1,
            1,
        )
        .unwrap()
    }

    #[test]
    fn test_polyline_endpoints_and_count() {
        let circle = NurbsCurve::circle(DVec3::ZERO, 1.0).unwrap();
        let points = curve_to_polyline(&circle, 50).unwrap();
        assert_eq!(points.len(), 50);
        assert_abs_diff_eq!(points[0], DVec3::X, epsilon = 1e-12);
        assert_abs_diff_eq!(points[49], DVec3::X, epsilon = 1e-12);
        for p in &points {
            assert_abs_diff_eq!(p.length(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_polyline_rejects_single_sample() {
        let circle = NurbsCurve::circle(DVec3::ZERO, 1.0).unwrap();
        assert_eq!(
            curve_to_polyline(&circle, 1),
            Err(NurbsError::InvalidSampleCount {
                count: 1,
                minimum: 2
            })
        );
    }

    #[test]
    fn test_mesh_counts() {
        let mesh = surface_to_mesh(&plane(vec![1.0; 4]), 4).unwrap();
        assert_eq!(mesh.vertex_count(), 25);
        assert_eq!(mesh.normals.len(), 25);
        assert_eq!(mesh.triangle_count(), 32);
        let n = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
    }

    #[test]
    fn test_mesh_winding_agrees_with_normals() {
        let mesh = surface_to_mesh(&plane(vec![1.0, 2.0, 1.0, 0.5]), 3).unwrap();
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.positions[i as usize]);
            let face = (b - a).cross(c - a);
            let n = mesh.normals[tri[0] as usize];
            assert!(face.dot(n) < 0.0);
        }
    }

    #[test]
    fn test_mesh_fails_on_degenerate_weight() {
        let err = surface_to_mesh(&plane(vec![0.0; 4]), 2).unwrap_err();
        assert!(matches!(err, NurbsError::DegenerateWeight { .. }));
    }

    #[test]
    fn test_collapsed_edge_gets_repaired_normal() {
        // Row 0 collapses to a single point, like the pole of a sphere.
        let surf = NurbsSurface::new(
            2,
            2,
            vec![DVec3::ZERO, DVec3::ZERO, DVec3::Y, DVec3::new(1.0, 1.0, 0.0)],
            vec![1.0; 4],
            vec![0.0, 0.0, 1.0, 1.0],
            vec![0.0, 0.0, 1.0, 1.0],
            1,
            1,
        )
        .unwrap();
        assert!(surf.normal_at(0.0, 0.5).is_err());
        let mesh = surf.evaluate_mesh(4).unwrap();
        for n in &mesh.normals {
            assert_abs_diff_eq!(*n, DVec3::Z, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_surface_collapsed_to_line_fails() {
        // Both rows trace the same segment, so no triangle has any area.
        let surf = NurbsSurface::new(
            2,
            2,
            vec![DVec3::ZERO, DVec3::X, DVec3::ZERO, DVec3::X],
            vec![1.0; 4],
            vec![0.0, 0.0, 1.0, 1.0],
            vec![0.0, 0.0, 1.0, 1.0],
            1,
            1,
        )
        .unwrap();
        let err = surface_to_mesh(&surf, 3).unwrap_err();
        assert!(matches!(err, NurbsError::DegenerateNormal { .. }));
    }

    #[test]
    fn test_mesh_bounding_box() {
        let mesh = surface_to_mesh(&plane(vec![1.0, 3.0, 1.0, 1.0]), 5).unwrap();
        let aabb = mesh.bounding_box();
        assert_abs_diff_eq!(aabb.min, DVec3::ZERO, epsilon = 1e-12);
        assert_abs_diff_eq!(aabb.max, DVec3::new(1.0, 1.0, 0.0), epsilon = 1e-12);
        assert_eq!(TriangleMesh::default().bounding_box().min, DVec3::ZERO);
    }
}

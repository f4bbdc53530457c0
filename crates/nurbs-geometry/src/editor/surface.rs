use log::{debug, warn};
use nurbs_core::{ControlPointHandle, EvalSettings, NurbsError, Result};
use nurbs_math::{Point3, Vector3};

use super::EditSession;
use crate::surface::NurbsSurface;
use crate::tessellate::TriangleMesh;

impl NurbsSurface {
    /// Replace the whole weight grid (row-major, same shape as the points).
    pub fn set_weights(&mut self, weights: Vec<f64>) -> Result<()> {
        if weights.len() != self.control_points.len() {
            return Err(NurbsError::WeightCountMismatch {
                expected: self.control_points.len(),
                actual: weights.len(),
            });
        }
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(NurbsError::NonFiniteInput("weights"));
        }
        self.weights = weights;
        Ok(())
    }

    pub fn move_control_point(&mut self, handle: ControlPointHandle, position: Point3) -> Result<()> {
        let i = self.check_handle(handle)?;
        if !position.is_finite() {
            return Err(NurbsError::NonFiniteInput("control points"));
        }
        self.control_points[i] = position;
        Ok(())
    }
}

/// Interactive owner of a surface and its sampled mesh.
///
/// Same commit rule as [`CurveEditor`](super::CurveEditor): an edit that
/// makes the mesh fail to build is discarded.
#[derive(Debug, Clone)]
pub struct SurfaceEditor {
    surface: NurbsSurface,
    session: EditSession,
    settings: EvalSettings,
    mesh: TriangleMesh,
}

impl SurfaceEditor {
    pub fn new(surface: NurbsSurface, settings: EvalSettings) -> Result<Self> {
        let mesh = surface.evaluate_mesh(settings.surface_subdivisions)?;
        Ok(Self {
            surface,
            session: EditSession::default(),
            settings,
            mesh,
        })
    }

    pub fn with_session(mut self, session: EditSession) -> Self {
        self.session = session;
        self
    }

    pub fn surface(&self) -> &NurbsSurface {
        &self.surface
    }

    pub fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    /// Surface point at `(u, v)` under the editor's domain tolerance.
    pub fn point_at(&self, u: f64, v: f64) -> Result<Point3> {
        self.surface.point_at_within(u, v, self.settings.tolerance)
    }

    /// Unit normal at `(u, v)` under the editor's domain tolerance.
    pub fn normal_at(&self, u: f64, v: f64) -> Result<Vector3> {
        self.surface.normal_at_within(u, v, self.settings.tolerance)
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.session.enabled = enabled;
    }

    /// Select grid entry `(row, col)`.
    pub fn select(&mut self, row: usize, col: usize) -> Result<ControlPointHandle> {
        let handle = self.surface.handle(row, col)?;
        self.session.selected = Some(handle);
        Ok(handle)
    }

    pub fn clear_selection(&mut self) {
        self.session.selected = None;
    }

    pub fn set_weights(&mut self, weights: Vec<f64>) -> Result<()> {
        self.apply(|surface| surface.set_weights(weights))
    }

    /// Change only the selected point's weight.
    pub fn set_selected_weight(&mut self, weight: f64) -> Result<()> {
        let handle = self.session.selection()?;
        let mut weights = self.surface.weights().to_vec();
        let i = self.surface.check_handle(handle)?;
        weights[i] = weight;
        self.set_weights(weights)
    }

    pub fn move_control_point(&mut self, handle: ControlPointHandle, position: Point3) -> Result<()> {
        self.apply(|surface| surface.move_control_point(handle, position))
    }

    /// Translate the selected control point by `delta`.
    pub fn drag_selected(&mut self, delta: Vector3) -> Result<()> {
        let handle = self.session.selection()?;
        self.apply(|surface| {
            let i = surface.check_handle(handle)?;
            let target = surface.control_points()[i] + delta;
            surface.move_control_point(handle, target)
        })
    }

    fn apply(&mut self, edit: impl FnOnce(&mut NurbsSurface) -> Result<()>) -> Result<()> {
        self.session.require_enabled()?;
        let mut candidate = self.surface.clone();
        edit(&mut candidate)?;
        match candidate.evaluate_mesh(self.settings.surface_subdivisions) {
            Ok(mesh) => {
                debug!(
                    "surface edit committed: {} vertices, {} triangles",
                    mesh.vertex_count(),
                    mesh.triangle_count()
                );
                self.surface = candidate;
                self.mesh = mesh;
                Ok(())
            }
            Err(e) => {
                warn!("surface edit rejected, keeping previous geometry: {}", e);
                Err(e)
            }
        }
    }
}

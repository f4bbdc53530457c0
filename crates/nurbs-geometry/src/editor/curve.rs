use log::{debug, warn};
use nurbs_core::{ControlPointHandle, EvalSettings, NurbsError, Result};
use nurbs_math::{Point3, Vector3};

use super::EditSession;
use crate::curve::{ControlPoint, NurbsCurve};
use crate::nurbs::KnotVectorBuilder;

fn check_finite(position: Point3, weight: f64) -> Result<()> {
    if !position.is_finite() {
        return Err(NurbsError::NonFiniteInput("control points"));
    }
    if !weight.is_finite() {
        return Err(NurbsError::NonFiniteInput("weights"));
    }
    Ok(())
}

impl NurbsCurve {
    /// Append a weighted point at the end and rebuild the knot vector.
    pub fn append_control_point(
        &mut self,
        position: Point3,
        weight: f64,
        builder: &impl KnotVectorBuilder,
    ) -> Result<ControlPointHandle> {
        check_finite(position, weight)?;
        let knots = builder.rebuild(&self.knots, self.degree, true)?;

        self.control_points.push(position);
        self.weights.push(weight);
        self.knots = knots;
        Ok(ControlPointHandle::new(self.control_points.len() - 1))
    }

    /// Remove one point and rebuild the knot vector.
    ///
    /// Fails without touching the curve when the handle is stale or the curve
    /// would drop below `degree + 1` points.
    pub fn remove_control_point(
        &mut self,
        handle: ControlPointHandle,
        builder: &impl KnotVectorBuilder,
    ) -> Result<ControlPoint> {
        let i = self.check_handle(handle)?;
        let remaining = self.len() - 1;
        if remaining < self.min_control_points() {
            return Err(NurbsError::TooFewControlPoints {
                remaining,
                minimum: self.min_control_points(),
            });
        }
        let knots = builder.rebuild(&self.knots, self.degree, false)?;

        let removed = ControlPoint::new(self.control_points.remove(i), self.weights.remove(i));
        self.knots = knots;
        Ok(removed)
    }

    /// Replace every weight at once.
    pub fn set_weights(&mut self, weights: Vec<f64>) -> Result<()> {
        if weights.len() != self.len() {
            return Err(NurbsError::WeightCountMismatch {
                expected: self.len(),
                actual: weights.len(),
            });
        }
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(NurbsError::NonFiniteInput("weights"));
        }
        self.weights = weights;
        Ok(())
    }

    /// Rebuild the knot vector for the current point count.
    pub fn set_clamping(&mut self, builder: &impl KnotVectorBuilder) -> Result<()> {
        self.knots = builder.build(self.len(), self.degree)?;
        Ok(())
    }

    /// Move one control point, keeping its weight.
    pub fn move_control_point(&mut self, handle: ControlPointHandle, position: Point3) -> Result<()> {
        let i = self.check_handle(handle)?;
        if !position.is_finite() {
            return Err(NurbsError::NonFiniteInput("control points"));
        }
        self.control_points[i] = position;
        Ok(())
    }
}

/// Interactive owner of a curve and its sampled polyline.
///
/// Every edit is applied to a copy of the curve and resampled at
/// `settings.curve_samples`; the copy replaces the curve only if sampling
/// succeeds, so [`polyline`](Self::polyline) always shows the last valid
/// geometry.
#[derive(Debug, Clone)]
pub struct CurveEditor {
    curve: NurbsCurve,
    session: EditSession,
    settings: EvalSettings,
    polyline: Vec<Point3>,
}

impl CurveEditor {
    pub fn new(curve: NurbsCurve, settings: EvalSettings) -> Result<Self> {
        let polyline = curve.evaluate_polyline(settings.curve_samples)?;
        Ok(Self {
            curve,
            session: EditSession::default(),
            settings,
            polyline,
        })
    }

    pub fn with_session(mut self, session: EditSession) -> Self {
        self.session = session;
        self
    }

    pub fn curve(&self) -> &NurbsCurve {
        &self.curve
    }

    pub fn polyline(&self) -> &[Point3] {
        &self.polyline
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    /// Curve point at `t` under the editor's domain tolerance, for picking.
    pub fn point_at(&self, t: f64) -> Result<Point3> {
        self.curve.point_at_within(t, self.settings.tolerance)
    }

    /// Tangent at `t` under the editor's domain tolerance.
    pub fn tangent_at(&self, t: f64) -> Result<Vector3> {
        Ok(self
            .curve
            .derivatives_within(t, 1, self.settings.tolerance)?[1])
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.session.enabled = enabled;
    }

    pub fn select(&mut self, handle: ControlPointHandle) -> Result<()> {
        self.curve.check_handle(handle)?;
        self.session.selected = Some(handle);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.session.selected = None;
    }

    pub fn append_control_point(&mut self, position: Point3, weight: f64) -> Result<ControlPointHandle> {
        self.apply(|curve, session| {
            curve.append_control_point(position, weight, &session.knot_builder())
        })
    }

    pub fn remove_control_point(&mut self, handle: ControlPointHandle) -> Result<ControlPoint> {
        let removed = self.apply(|curve, session| {
            curve.remove_control_point(handle, &session.knot_builder())
        })?;
        self.session.shift_after_removal(handle);
        Ok(removed)
    }

    pub fn remove_selected(&mut self) -> Result<ControlPoint> {
        let handle = self.session.selection()?;
        self.remove_control_point(handle)
    }

    pub fn set_weights(&mut self, weights: Vec<f64>) -> Result<()> {
        self.apply(|curve, _| curve.set_weights(weights))
    }

    pub fn set_clamping(&mut self, clamped_ends: bool) -> Result<()> {
        let mut session = self.session;
        session.clamped_ends = clamped_ends;
        self.apply(|curve, _| curve.set_clamping(&session.knot_builder()))?;
        self.session.clamped_ends = clamped_ends;
        Ok(())
    }

    pub fn move_control_point(&mut self, handle: ControlPointHandle, position: Point3) -> Result<()> {
        self.apply(|curve, _| curve.move_control_point(handle, position))
    }

    /// Translate the selected control point by `delta`.
    pub fn drag_selected(&mut self, delta: Vector3) -> Result<()> {
        let handle = self.session.selection()?;
        self.apply(|curve, _| {
            let current = curve.control_point(handle)?.position;
            curve.move_control_point(handle, current + delta)
        })
    }

    fn apply<T>(
        &mut self,
        edit: impl FnOnce(&mut NurbsCurve, &EditSession) -> Result<T>,
    ) -> Result<T> {
        self.session.require_enabled()?;
        let mut candidate = self.curve.clone();
        let out = edit(&mut candidate, &self.session)?;
        match candidate.evaluate_polyline(self.settings.curve_samples) {
            Ok(polyline) => {
                debug!(
                    "curve edit committed: {} control points, {} knots",
                    candidate.len(),
                    candidate.knots().len()
                );
                self.curve = candidate;
                self.polyline = polyline;
                Ok(out)
            }
            Err(e) => {
                warn!("curve edit rejected, keeping previous geometry: {}", e);
                Err(e)
            }
        }
    }
}

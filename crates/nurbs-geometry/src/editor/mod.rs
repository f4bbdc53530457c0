//! Structural editing of control nets.
//!
//! The raw operations on [`NurbsCurve`](crate::curve::NurbsCurve) and
//! [`NurbsSurface`](crate::surface::NurbsSurface) treat control points,
//! weights, and knots as one unit: each either succeeds completely or leaves
//! all three untouched. [`CurveEditor`] and [`SurfaceEditor`] add session
//! state and resample the geometry after every edit, committing only when
//! resampling succeeds.

mod curve;
mod surface;

use nurbs_core::{ControlPointHandle, NurbsError, Result};
use serde::{Deserialize, Serialize};

use crate::nurbs::UniformKnotBuilder;

pub use curve::CurveEditor;
pub use surface::SurfaceEditor;

/// Editor state for one interactive session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSession {
    /// Control point targeted by drag and remove-selected.
    pub selected: Option<ControlPointHandle>,
    /// When false every edit is rejected with [`NurbsError::EditingDisabled`].
    pub enabled: bool,
    /// Whether rebuilt knot vectors repeat their end knots.
    pub clamped_ends: bool,
}

impl Default for EditSession {
    fn default() -> Self {
        Self {
            selected: None,
            enabled: true,
            clamped_ends: true,
        }
    }
}

impl EditSession {
    pub fn knot_builder(&self) -> UniformKnotBuilder {
        UniformKnotBuilder {
            clamped: self.clamped_ends,
        }
    }

    pub fn require_enabled(&self) -> Result<()> {
        if self.enabled {
            Ok(())
        } else {
            Err(NurbsError::EditingDisabled)
        }
    }

    pub fn selection(&self) -> Result<ControlPointHandle> {
        self.selected.ok_or(NurbsError::NothingSelected)
    }

    /// Keep the selection pointing at the same point after `removed` is
    /// erased.
    pub(crate) fn shift_after_removal(&mut self, removed: ControlPointHandle) {
        self.selected = match self.selected {
            Some(h) if h == removed => None,
            Some(h) if h > removed => Some(ControlPointHandle::new(h.index() - 1)),
            other => other,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_shift() {
        let mut s = EditSession {
            selected: Some(ControlPointHandle::new(3)),
            ..EditSession::default()
        };
        s.shift_after_removal(ControlPointHandle::new(5));
        assert_eq!(s.selected, Some(ControlPointHandle::new(3)));
        s.shift_after_removal(ControlPointHandle::new(1));
        assert_eq!(s.selected, Some(ControlPointHandle::new(2)));
        s.shift_after_removal(ControlPointHandle::new(2));
        assert_eq!(s.selected, None);
        assert_eq!(s.selection(), Err(NurbsError::NothingSelected));
    }

    #[test]
    fn test_disabled_session() {
        let s = EditSession {
            enabled: false,
            ..EditSession::default()
        };
        assert_eq!(s.require_enabled(), Err(NurbsError::EditingDisabled));
        assert!(s.knot_builder().clamped);
    }
}

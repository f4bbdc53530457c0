use serde::{Deserialize, Serialize};

use crate::tolerance::Tolerance;

/// Sampling resolution used when geometry is redrawn after an edit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalSettings {
    /// Number of polyline points sampled across a curve's domain.
    pub curve_samples: usize,
    /// Number of subdivisions per parameter direction of a surface mesh.
    pub surface_subdivisions: usize,
    /// Domain tolerance for parameter queries made through an editor.
    pub tolerance: Tolerance,
}

impl EvalSettings {
    pub const DEFAULT_SUBDIVISIONS: usize = 50;

    pub fn with_resolution(curve_samples: usize, surface_subdivisions: usize) -> Self {
        Self {
            curve_samples,
            surface_subdivisions,
            ..Self::default()
        }
    }
}

impl Default for EvalSettings {
    fn default() -> Self {
        Self {
            curve_samples: Self::DEFAULT_SUBDIVISIONS,
            surface_subdivisions: Self::DEFAULT_SUBDIVISIONS,
            tolerance: Tolerance::default(),
        }
    }
}

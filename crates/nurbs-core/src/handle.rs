use serde::{Deserialize, Serialize};

/// Index-based reference to a control point inside the curve or surface that
/// owns it. Handles carry no borrow; a handle is checked against the owner's
/// current point count every time it is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ControlPointHandle(usize);

impl ControlPointHandle {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Handle of grid entry `(row, col)` in a row-major grid with `cols` columns.
    pub fn from_grid(row: usize, col: usize, cols: usize) -> Self {
        Self(row * cols + col)
    }

    pub fn index(self) -> usize {
        self.0
    }

    /// Split back into `(row, col)` for a row-major grid with `cols` columns.
    pub fn grid_position(self, cols: usize) -> (usize, usize) {
        (self.0 / cols, self.0 % cols)
    }
}

impl std::fmt::Display for ControlPointHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

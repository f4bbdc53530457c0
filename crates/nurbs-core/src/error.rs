use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NurbsError {
    #[error("Invalid degree {degree} for {control_points} control points (need degree < count)")]
    InvalidDegree { degree: usize, control_points: usize },

    #[error("Knot vector length mismatch: expected {expected}, got {actual}")]
    KnotCountMismatch { expected: usize, actual: usize },

    #[error("Knot vector decreases at index {index}: {previous} > {next}")]
    KnotsNotMonotonic { index: usize, previous: f64, next: f64 },

    #[error("Empty parameter domain [{start}, {end}]")]
    EmptyDomain { start: f64, end: f64 },

    #[error("Weight count mismatch: expected {expected}, got {actual}")]
    WeightCountMismatch { expected: usize, actual: usize },

    #[error("Control grid mismatch: {rows} x {cols} grid needs {expected} points, got {actual}")]
    GridSizeMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Non-finite value in {0}")]
    NonFiniteInput(&'static str),

    #[error("Degenerate rational weight at u={u}, v={v:?}")]
    DegenerateWeight { u: f64, v: Option<f64> },

    #[error("Degenerate surface normal at u={u}, v={v}")]
    DegenerateNormal { u: f64, v: f64 },

    #[error("Parameter {value} outside domain [{start}, {end}]")]
    ParameterOutOfDomain { value: f64, start: f64, end: f64 },

    #[error("Control point index {index} out of range (count {count})")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("Cannot go below {minimum} control points (would leave {remaining})")]
    TooFewControlPoints { remaining: usize, minimum: usize },

    #[error("Invalid sample count {count} (minimum {minimum})")]
    InvalidSampleCount { count: usize, minimum: usize },

    #[error("Editing is disabled for this session")]
    EditingDisabled,

    #[error("No control point selected")]
    NothingSelected,
}

impl NurbsError {
    /// Whether this error came from evaluating otherwise well-formed geometry.
    pub fn is_degenerate(&self) -> bool {
        matches!(
            self,
            NurbsError::DegenerateWeight { .. } | NurbsError::DegenerateNormal { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, NurbsError>;

/// Tolerances for parameter checks and rational denominators.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tolerance {
    /// How far outside the parameter domain a query may land and still be
    /// clamped onto it.
    pub linear: f64,
}

impl Tolerance {
    pub const DEFAULT_LINEAR: f64 = 1e-7;

    /// Rational denominators with magnitude below this are treated as zero.
    pub const DEGENERATE_WEIGHT: f64 = 1e-12;

    pub fn new(linear: f64) -> Self {
        Self { linear }
    }

    /// Check if a rational denominator is too small to divide by
    pub fn is_degenerate_weight(w: f64) -> bool {
        !w.is_finite() || w.abs() < Self::DEGENERATE_WEIGHT
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LINEAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_weight() {
        assert!(Tolerance::is_degenerate_weight(0.0));
        assert!(Tolerance::is_degenerate_weight(-1e-14));
        assert!(Tolerance::is_degenerate_weight(f64::NAN));
        assert!(!Tolerance::is_degenerate_weight(1e-6));
        assert!(!Tolerance::is_degenerate_weight(-0.5));
    }

    #[test]
    fn test_default_linear() {
        assert_eq!(Tolerance::default().linear, Tolerance::DEFAULT_LINEAR);
        assert_eq!(Tolerance::new(1e-3).linear, 1e-3);
    }
}

/// Icosphere generation parameters
use crate::error::{IcoResult, IcoSphereError};
use crate::icosahedron::BASE_TRIANGLES;

/// Default cap on subdivision passes (20 * 4^8 = 1,310,720 triangles).
pub const DEFAULT_MAX_ITERATIONS: u32 = 8;

/// Highest pass count whose vertex ids fit in `u32` (10 * 4^14 + 2 vertices).
pub const INDEXABLE_ITERATIONS: u32 = 14;

/// Parameters for icosphere generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IcoSphereParams {
    /// Number of subdivision passes applied to the base icosahedron.
    pub iterations: u32,

    /// Upper bound on `iterations`; generation is refused above it.
    /// Values past `INDEXABLE_ITERATIONS` are treated as that limit.
    pub max_iterations: u32,
}

impl Default for IcoSphereParams {
    fn default() -> Self {
        Self {
            iterations: 0,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl IcoSphereParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build parameters from an untyped signed count, as received from JS or a shell.
    pub fn from_signed_iterations(iterations: i64) -> IcoResult<Self> {
        if iterations < 0 {
            return Err(IcoSphereError::NegativeIterations(iterations));
        }
        // Oversized counts saturate and are refused later by `validate`.
        let iterations = u32::try_from(iterations).unwrap_or(u32::MAX);
        Ok(Self::default().with_iterations(iterations))
    }

    #[must_use]
    pub const fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Cap actually enforced: `max_iterations`, clamped so indices fit in `u32`.
    #[must_use]
    pub fn effective_max_iterations(&self) -> u32 {
        self.max_iterations.min(INDEXABLE_ITERATIONS)
    }

    /// Check the parameters before any geometry is built.
    pub fn validate(&self) -> IcoResult<()> {
        let max = self.effective_max_iterations();
        if self.iterations > max {
            return Err(IcoSphereError::TooManyIterations {
                requested: self.iterations,
                max,
            });
        }
        Ok(())
    }

    /// Triangle count after subdivision, before seam duplication.
    #[must_use]
    pub const fn expected_triangles(&self) -> usize {
        let mut triangles = BASE_TRIANGLES.len();
        let mut i = 0;
        while i < self.iterations {
            triangles *= 4;
            i += 1;
        }
        triangles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = IcoSphereParams::default();
        assert_eq!(params.iterations, 0);
        assert_eq!(params.max_iterations, DEFAULT_MAX_ITERATIONS);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let params = IcoSphereParams::new()
            .with_iterations(3)
            .with_max_iterations(4);
        assert_eq!(params.iterations, 3);
        assert_eq!(params.max_iterations, 4);
    }

    #[test]
    fn test_signed_iterations() {
        let params = IcoSphereParams::from_signed_iterations(2).unwrap();
        assert_eq!(params.iterations, 2);

        let err = IcoSphereParams::from_signed_iterations(-1).unwrap_err();
        assert!(matches!(err, IcoSphereError::NegativeIterations(-1)));
    }

    #[test]
    fn test_validate_cap() {
        let params = IcoSphereParams::new().with_iterations(9);
        let err = params.validate().unwrap_err();
        assert!(matches!(
            err,
            IcoSphereError::TooManyIterations { requested: 9, max: 8 }
        ));

        assert!(params.with_max_iterations(9).validate().is_ok());
    }

    #[test]
    fn test_raised_cap_accepts_large_signed_counts() {
        let params = IcoSphereParams::from_signed_iterations(9)
            .unwrap()
            .with_max_iterations(9);
        assert!(params.validate().is_ok());
        assert_eq!(params.expected_triangles(), 20 * 4usize.pow(9));
    }

    #[test]
    fn test_cap_clamped_to_indexable() {
        let params = IcoSphereParams::new()
            .with_iterations(INDEXABLE_ITERATIONS + 1)
            .with_max_iterations(u32::MAX);
        assert_eq!(params.effective_max_iterations(), INDEXABLE_ITERATIONS);

        let err = params.validate().unwrap_err();
        assert!(matches!(
            err,
            IcoSphereError::TooManyIterations { requested: 15, max: 14 }
        ));

        // Vertex count at the limit still fits in a u32 id.
        let vertices = 10 * 4u64.pow(INDEXABLE_ITERATIONS) + 2;
        assert!(vertices < u64::from(u32::MAX));
        assert!(10 * 4u64.pow(INDEXABLE_ITERATIONS + 1) + 2 > u64::from(u32::MAX));

        let saturated = IcoSphereParams::from_signed_iterations(i64::MAX)
            .unwrap()
            .with_max_iterations(u32::MAX);
        assert!(saturated.validate().is_err());
    }

    #[test]
    fn test_expected_triangles() {
        assert_eq!(IcoSphereParams::new().expected_triangles(), 20);
        assert_eq!(IcoSphereParams::new().with_iterations(1).expected_triangles(), 80);
        assert_eq!(IcoSphereParams::new().with_iterations(3).expected_triangles(), 1280);
    }
}

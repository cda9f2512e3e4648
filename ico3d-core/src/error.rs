/// Error types for icosphere generation and export
use thiserror::Error;

/// Errors that can occur while generating or exporting an icosphere.
#[derive(Debug, Error)]
pub enum IcoSphereError {
    /// Iteration count supplied as a signed value was below zero.
    #[error("Invalid iteration count: {0} (must be >= 0)")]
    NegativeIterations(i64),

    /// Iteration count exceeds the configured cap.
    #[error("Too many iterations: {requested} (max {max})")]
    TooManyIterations {
        /// Requested iteration count.
        requested: u32,
        /// Configured maximum.
        max: u32,
    },

    /// The averaged edge vector had zero length and cannot be projected onto the sphere.
    #[error("Degenerate midpoint between vertices {a} and {b}")]
    DegenerateMidpoint {
        /// First edge endpoint.
        a: u32,
        /// Second edge endpoint.
        b: u32,
    },

    /// A triangle's edge vectors are parallel, so it has no face normal.
    #[error("Degenerate face normal for triangle {triangle}")]
    DegenerateFace {
        /// Triangle number in the index buffer.
        triangle: usize,
    },

    /// Writing an export failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for icosphere operations.
pub type IcoResult<T> = std::result::Result<T, IcoSphereError>;

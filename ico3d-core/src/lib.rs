//! ico3d Core Library - Icosphere mesh generation
//!
//! This library builds unit icospheres as flat, GPU-ready buffers (positions,
//! indices, flat normals, spherical texture coordinates with seam
//! duplication), plus a triangle-soup mesh view and STL export.

pub mod attributes;
pub mod error;
pub mod geometry;
pub mod icosahedron;
pub mod icosphere;
pub mod params;
pub mod stl;
pub mod subdivide;

// Re-export commonly used types
pub use error::{IcoResult, IcoSphereError};
pub use geometry::{Mesh, Triangle, Vertex};
pub use icosphere::IcoSphereGeometry;
pub use params::{IcoSphereParams, DEFAULT_MAX_ITERATIONS, INDEXABLE_ITERATIONS};

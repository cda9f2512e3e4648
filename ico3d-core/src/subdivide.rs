//! Sphere-projected midpoint subdivision.
//!
//! One pass splits every triangle into four. Edge midpoints are averaged,
//! pushed back onto the unit sphere and memoized so a shared edge yields a
//! single new vertex.

use std::collections::HashMap;

use log::debug;
use nalgebra::Point3;

use crate::error::{IcoResult, IcoSphereError};

/// Smallest averaged-edge length that can still be projected onto the sphere.
const MIN_MIDPOINT_NORM: f32 = 1e-12;

/// Per-pass cache from an unordered edge to its midpoint vertex.
#[derive(Debug, Default)]
pub struct MidpointMemo {
    midpoints: HashMap<(u32, u32), u32>,
}

impl MidpointMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Memo sized for a pass over `triangles` triangles (each edge is shared by two).
    pub fn with_capacity(triangles: usize) -> Self {
        Self {
            midpoints: HashMap::with_capacity(triangles * 3 / 2),
        }
    }

    pub fn len(&self) -> usize {
        self.midpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.midpoints.is_empty()
    }

    /// Return the midpoint vertex of edge `(a, b)`, creating it on first request.
    ///
    /// `(a, b)` and `(b, a)` resolve to the same vertex. A newly created vertex is
    /// appended to `vertices` and reported to `on_vertex_added`.
    pub fn midpoint<F>(
        &mut self,
        a: u32,
        b: u32,
        vertices: &mut Vec<Point3<f32>>,
        on_vertex_added: &mut F,
    ) -> IcoResult<u32>
    where
        F: FnMut(u32, &Point3<f32>),
    {
        let edge = canonical_edge(a, b);
        if let Some(&index) = self.midpoints.get(&edge) {
            return Ok(index);
        }

        let p0 = vertices[a as usize];
        let p1 = vertices[b as usize];
        let coords = ((p0.coords + p1.coords) * 0.5)
            .try_normalize(MIN_MIDPOINT_NORM)
            .ok_or(IcoSphereError::DegenerateMidpoint { a: edge.0, b: edge.1 })?;
        let midpoint = Point3::from(coords);

        let index = vertices.len() as u32;
        vertices.push(midpoint);
        on_vertex_added(index, &midpoint);
        self.midpoints.insert(edge, index);

        Ok(index)
    }
}

/// Order an edge so the smaller vertex id comes first.
const fn canonical_edge(a: u32, b: u32) -> (u32, u32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Run one subdivision pass and return the new index buffer.
///
/// Each triangle `(v0, v1, v2)` with midpoints `a = mid(v0, v1)`,
/// `b = mid(v1, v2)`, `c = mid(v2, v0)` becomes
/// `(c, v0, a)`, `(a, v1, b)`, `(b, v2, c)`, `(a, b, c)`, which keeps the
/// parent's winding.
pub fn subdivide_once<F>(
    indices: &[u32],
    vertices: &mut Vec<Point3<f32>>,
    on_vertex_added: &mut F,
) -> IcoResult<Vec<u32>>
where
    F: FnMut(u32, &Point3<f32>),
{
    let triangles = indices.len() / 3;
    let mut memo = MidpointMemo::with_capacity(triangles);
    let mut subdivided = Vec::with_capacity(indices.len() * 4);

    for tri in indices.chunks_exact(3) {
        let (v0, v1, v2) = (tri[0], tri[1], tri[2]);
        let a = memo.midpoint(v0, v1, vertices, on_vertex_added)?;
        let b = memo.midpoint(v1, v2, vertices, on_vertex_added)?;
        let c = memo.midpoint(v2, v0, vertices, on_vertex_added)?;

        subdivided.extend_from_slice(&[c, v0, a, a, v1, b, b, v2, c, a, b, c]);
    }

    debug!(
        "Subdivided {} triangles into {}, {} new vertices",
        triangles,
        subdivided.len() / 3,
        memo.len()
    );

    Ok(subdivided)
}

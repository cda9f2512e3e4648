//! Per-vertex normals and texture coordinates.
//!
//! Normals are flat: each triangle stamps its face normal on its three
//! vertices, and triangles are visited from last to first, so a shared
//! vertex keeps the normal of the lowest-numbered triangle that uses it.
//!
//! Texture coordinates come from spherical longitude/latitude. Longitude
//! wraps at `u = 0`; triangles straddling that line get a duplicate with
//! `u = 1` appended to the mesh.

use std::f32::consts::{PI, TAU};

use log::debug;
use nalgebra::{Point3, Vector2, Vector3};

use crate::error::{IcoResult, IcoSphereError};

const MIN_NORMAL_NORM: f32 = 1e-12;

/// Normals and texture coordinates, one entry per vertex.
#[derive(Debug, Clone, Default)]
pub struct VertexAttributes {
    pub normals: Vec<Vector3<f32>>,
    pub tex_coords: Vec<Vector2<f32>>,
    /// Triangles that straddled the seam and were duplicated.
    pub seam_triangles: usize,
}

/// Spherical texture coordinate of a point: `u` from longitude, `v` from polar angle.
pub fn spherical_uv(p: &Point3<f32>) -> Vector2<f32> {
    let r = p.coords.norm();
    let theta = (p.z / r).clamp(-1.0, 1.0).acos();
    let phi = p.y.atan2(p.x) + PI;
    Vector2::new(1.0 - phi / TAU, theta / PI)
}

/// Flat normal of triangle `(p1, p2, p3)`: `cross(p3 - p2, p1 - p2)`, normalized.
///
/// Returns `None` when the edges are parallel.
pub fn face_normal(p1: &Point3<f32>, p2: &Point3<f32>, p3: &Point3<f32>) -> Option<Vector3<f32>> {
    (p3 - p2).cross(&(p1 - p2)).try_normalize(MIN_NORMAL_NORM)
}

/// True when at least one `u` is exactly 0 and every other `u` is above 0.5.
///
/// Only catches triangles with a vertex exactly on the seam; a triangle
/// spanning it with small but non-zero `u` on one side is not detected.
#[allow(clippy::float_cmp)]
pub fn crosses_seam(u: [f32; 3]) -> bool {
    u.iter().any(|&u| u == 0.0) && u.iter().all(|&u| u == 0.0 || u > 0.5)
}

/// Compute normals and texture coordinates for every vertex, duplicating
/// seam-straddling triangles.
///
/// Duplicated vertices are appended to `vertices`, their triangles appended to
/// `indices`, and each new vertex is reported to `on_vertex_added`.
pub fn compute_attributes<F>(
    vertices: &mut Vec<Point3<f32>>,
    indices: &mut Vec<u32>,
    on_vertex_added: &mut F,
) -> IcoResult<VertexAttributes>
where
    F: FnMut(u32, &Point3<f32>),
{
    let mut normals = vec![Vector3::zeros(); vertices.len()];
    let mut tex_coords = vec![Vector2::zeros(); vertices.len()];
    let mut seam_triangles = 0;

    let triangles = indices.len() / 3;
    for triangle in (0..triangles).rev() {
        let tri = [
            indices[triangle * 3],
            indices[triangle * 3 + 1],
            indices[triangle * 3 + 2],
        ];
        let points = tri.map(|i| vertices[i as usize]);
        let uvs = points.map(|p| spherical_uv(&p));

        let normal = face_normal(&points[0], &points[1], &points[2])
            .ok_or(IcoSphereError::DegenerateFace { triangle })?;

        if crosses_seam(uvs.map(|uv| uv.x)) {
            seam_triangles += 1;
            for (p, uv) in points.iter().zip(&uvs) {
                let index = vertices.len() as u32;
                vertices.push(*p);
                normals.push(normal);
                tex_coords.push(Vector2::new(1.0, uv.y));
                indices.push(index);
                on_vertex_added(index, p);
            }
        }

        for (&i, uv) in tri.iter().zip(uvs) {
            normals[i as usize] = normal;
            tex_coords[i as usize] = uv;
        }
    }

    debug!(
        "Computed attributes for {} triangles, {} duplicated across the seam",
        triangles, seam_triangles
    );

    Ok(VertexAttributes {
        normals,
        tex_coords,
        seam_triangles,
    })
}

//! Icosphere generation.
//!
//! # Example
//!
//! ```
//! use ico3d_core::{IcoSphereGeometry, IcoSphereParams};
//!
//! let params = IcoSphereParams::new().with_iterations(2);
//! let sphere = IcoSphereGeometry::generate(&params)?;
//!
//! assert_eq!(sphere.subdivided_triangle_count(), 320);
//! assert_eq!(sphere.normals().len(), sphere.positions().len());
//! # Ok::<(), ico3d_core::IcoSphereError>(())
//! ```

use log::debug;
use nalgebra::{Point3, Vector2, Vector3};

use crate::attributes::compute_attributes;
use crate::error::IcoResult;
use crate::icosahedron::{base_indices, base_vertices, BASE_VERTICES};
use crate::params::IcoSphereParams;
use crate::subdivide::subdivide_once;

/// Static mesh data of a unit icosphere, stored as flat GPU-ready buffers.
#[derive(Debug, Clone)]
pub struct IcoSphereGeometry {
    positions: Vec<f32>,
    indices: Vec<u32>,
    normals: Vec<f32>,
    tex_coords: Vec<f32>,
    iterations: u32,
    seam_triangles: usize,
}

impl IcoSphereGeometry {
    /// Generate an icosphere.
    ///
    /// # Errors
    ///
    /// Fails before doing any work if `params` does not validate, and fails
    /// without returning partial geometry on a numerical degeneracy.
    pub fn generate(params: &IcoSphereParams) -> IcoResult<Self> {
        Self::generate_with(params, |_, _| {})
    }

    /// Generate an icosphere, reporting every vertex added beyond the 12 base
    /// vertices (midpoints and seam duplicates) with its index and position.
    pub fn generate_with<F>(params: &IcoSphereParams, mut on_vertex_added: F) -> IcoResult<Self>
    where
        F: FnMut(u32, &Point3<f32>),
    {
        params.validate()?;

        let mut vertices = base_vertices();
        let mut indices = base_indices();

        for pass in 0..params.iterations {
            indices = subdivide_once(&indices, &mut vertices, &mut on_vertex_added)?;
            debug!(
                "Pass {}: {} triangles, {} vertices",
                pass + 1,
                indices.len() / 3,
                vertices.len()
            );
        }

        let attributes = compute_attributes(&mut vertices, &mut indices, &mut on_vertex_added)?;

        let geometry = Self {
            positions: flatten(vertices.iter().map(|p| p.coords)),
            indices,
            normals: flatten(attributes.normals.iter().copied()),
            tex_coords: attributes
                .tex_coords
                .iter()
                .flat_map(|uv| [uv.x, uv.y])
                .collect(),
            iterations: params.iterations,
            seam_triangles: attributes.seam_triangles,
        };
        debug!("Generated {}", geometry);

        Ok(geometry)
    }

    /// Flat vertex positions, stride 3.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Flat triangle indices, stride 3.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Flat per-vertex normals, stride 3.
    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    /// Flat per-vertex texture coordinates, stride 2.
    pub fn tex_coords(&self) -> &[f32] {
        &self.tex_coords
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Triangle count including seam duplicates.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Triangle count produced by subdivision alone (20 * 4^iterations).
    pub fn subdivided_triangle_count(&self) -> usize {
        self.triangle_count() - self.seam_triangles
    }

    /// Number of triangles that straddled the texture seam and were duplicated.
    pub fn seam_triangle_count(&self) -> usize {
        self.seam_triangles
    }

    /// Vertices added on top of the base icosahedron.
    pub fn added_vertex_count(&self) -> usize {
        self.vertex_count() - BASE_VERTICES.len()
    }

    pub fn position(&self, index: usize) -> Point3<f32> {
        let p = &self.positions[index * 3..index * 3 + 3];
        Point3::new(p[0], p[1], p[2])
    }

    pub fn normal(&self, index: usize) -> Vector3<f32> {
        let n = &self.normals[index * 3..index * 3 + 3];
        Vector3::new(n[0], n[1], n[2])
    }

    pub fn tex_coord(&self, index: usize) -> Vector2<f32> {
        let uv = &self.tex_coords[index * 2..index * 2 + 2];
        Vector2::new(uv[0], uv[1])
    }

    /// Iterate triangles as vertex index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Triangles appended by seam duplication, in append order.
    pub fn seam_duplicates(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.triangles().skip(self.subdivided_triangle_count())
    }
}

impl std::fmt::Display for IcoSphereGeometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "IcoSphere ({} iterations): {} vertices, {} triangles ({} seam duplicates)",
            self.iterations,
            self.vertex_count(),
            self.triangle_count(),
            self.seam_triangles
        )
    }
}

fn flatten(vectors: impl Iterator<Item = Vector3<f32>>) -> Vec<f32> {
    vectors.flat_map(|v| [v.x, v.y, v.z]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::face_normal;
    use crate::error::IcoSphereError;
    use approx::assert_relative_eq;

    fn generate(iterations: u32) -> IcoSphereGeometry {
        IcoSphereGeometry::generate(&IcoSphereParams::new().with_iterations(iterations)).unwrap()
    }

    #[test]
    fn test_triangle_counts() {
        for iterations in 0..=3 {
            let sphere = generate(iterations);
            assert_eq!(sphere.subdivided_triangle_count(), 20 * 4usize.pow(iterations));
            assert_eq!(
                sphere.triangle_count(),
                sphere.subdivided_triangle_count() + sphere.seam_triangle_count()
            );
        }
    }

    #[test]
    fn test_buffer_invariants() {
        for iterations in 0..=3 {
            let sphere = generate(iterations);
            let vertices = sphere.vertex_count();
            assert_eq!(sphere.positions().len(), vertices * 3);
            assert_eq!(sphere.normals().len(), vertices * 3);
            assert_eq!(sphere.tex_coords().len(), vertices * 2);
            assert_eq!(sphere.indices().len() % 3, 0);
            assert!(sphere.indices().iter().all(|&i| (i as usize) < vertices));
        }
    }

    #[test]
    fn test_vertices_on_unit_sphere() {
        for iterations in 0..=3 {
            let sphere = generate(iterations);
            for i in 0..sphere.vertex_count() {
                let norm = sphere.position(i).coords.norm();
                assert!((norm - 1.0).abs() < 1e-5, "vertex {i} norm {norm}");
            }
        }
    }

    #[test]
    fn test_normals_face_outward() {
        for iterations in 0..=3 {
            let sphere = generate(iterations);
            for [a, b, c] in sphere.triangles() {
                let [p1, p2, p3] = [a, b, c].map(|i| sphere.position(i as usize));
                let normal = face_normal(&p1, &p2, &p3).unwrap();
                let centroid = (p1.coords + p2.coords + p3.coords) / 3.0;
                assert!(normal.dot(&centroid) > 0.0);
                for i in [a, b, c] {
                    assert!(sphere.normal(i as usize).dot(&sphere.position(i as usize).coords) > 0.0);
                }
            }
        }
    }

    #[test]
    fn test_zero_iterations_is_base() {
        let sphere = generate(0);
        assert_eq!(sphere.vertex_count(), 12);
        assert_eq!(sphere.triangle_count(), 20);
        assert_eq!(sphere.seam_triangle_count(), 0);
        assert_eq!(sphere.added_vertex_count(), 0);

        let base = base_vertices();
        for (i, p) in base.iter().enumerate() {
            assert_eq!(sphere.position(i), *p);
        }
        assert_eq!(sphere.indices(), base_indices().as_slice());
        assert!(sphere.normals().iter().all(|n| n.is_finite()));
        assert!(sphere.tex_coords().iter().all(|t| t.is_finite()));
    }

    #[test]
    fn test_seam_duplication_after_one_pass() {
        let sphere = generate(1);
        assert!(sphere.seam_triangle_count() >= 1);

        let duplicates: Vec<[u32; 3]> = sphere.seam_duplicates().collect();
        assert_eq!(duplicates.len(), sphere.seam_triangle_count());

        for tri in duplicates {
            let mut v_values = Vec::new();
            for i in tri {
                let uv = sphere.tex_coord(i as usize);
                assert_eq!(uv.x, 1.0);
                v_values.push(uv.y);
            }

            // The duplicate copies an original triangle whose u's are still wrapped.
            let positions = tri.map(|i| sphere.position(i as usize));
            let original = sphere
                .triangles()
                .take(sphere.subdivided_triangle_count())
                .find(|t| t.map(|i| sphere.position(i as usize)) == positions)
                .expect("duplicate has an original");
            let original_u: Vec<f32> = original.iter().map(|&i| sphere.tex_coord(i as usize).x).collect();
            assert!(original_u.contains(&0.0));
            assert!(original_u.iter().all(|&u| u == 0.0 || u > 0.5));
            for (k, &i) in original.iter().enumerate() {
                assert_eq!(sphere.tex_coord(i as usize).y, v_values[k]);
            }
        }
    }

    #[test]
    fn test_one_pass_seam_count() {
        // Only the 162/198 degree edge midpoint lands exactly on the seam;
        // two of the children of face (3, 8, 4) straddle it.
        let sphere = generate(1);
        assert_eq!(sphere.seam_triangle_count(), 2);
        assert_eq!(sphere.vertex_count(), 42 + 6);
    }

    #[test]
    fn test_callback_counts_added_vertices() {
        for iterations in 0..=3 {
            let params = IcoSphereParams::new().with_iterations(iterations);
            let mut seen = Vec::new();
            let sphere = IcoSphereGeometry::generate_with(&params, |index, position| {
                seen.push((index, *position));
            })
            .unwrap();

            assert_eq!(seen.len(), sphere.vertex_count() - 12);
            assert_eq!(seen.len(), sphere.added_vertex_count());
            for (k, (index, position)) in seen.iter().enumerate() {
                assert_eq!(*index as usize, 12 + k);
                assert_eq!(sphere.position(*index as usize), *position);
            }
        }
    }

    #[test]
    fn test_callback_does_not_change_output() {
        let params = IcoSphereParams::new().with_iterations(2);
        let plain = IcoSphereGeometry::generate(&params).unwrap();
        let mut calls = 0;
        let observed = IcoSphereGeometry::generate_with(&params, |_, _| calls += 1).unwrap();

        assert!(calls > 0);
        assert_eq!(plain.positions(), observed.positions());
        assert_eq!(plain.indices(), observed.indices());
        assert_eq!(plain.normals(), observed.normals());
        assert_eq!(plain.tex_coords(), observed.tex_coords());
    }

    #[test]
    fn test_flat_normals() {
        // Every non-duplicated vertex carries the normal of the first triangle using it.
        let sphere = generate(2);
        let mut first_owner = vec![None; sphere.vertex_count()];
        for (t, tri) in sphere.triangles().enumerate() {
            for i in tri {
                first_owner[i as usize].get_or_insert(t);
            }
        }
        let triangles: Vec<[u32; 3]> = sphere.triangles().collect();
        for (i, owner) in first_owner.iter().enumerate() {
            let [a, b, c] = triangles[owner.unwrap()].map(|v| sphere.position(v as usize));
            let expected = face_normal(&a, &b, &c).unwrap();
            assert_relative_eq!(sphere.normal(i), expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_rejects_before_work() {
        let params = IcoSphereParams::new().with_iterations(5).with_max_iterations(4);
        let mut calls = 0;
        let err = IcoSphereGeometry::generate_with(&params, |_, _| calls += 1).unwrap_err();
        assert!(matches!(err, IcoSphereError::TooManyIterations { .. }));
        assert_eq!(calls, 0);

        let err = IcoSphereParams::from_signed_iterations(-2).unwrap_err();
        assert!(matches!(err, IcoSphereError::NegativeIterations(-2)));
    }

    #[test]
    fn test_display() {
        let display = format!("{}", generate(1));
        assert!(display.contains("1 iterations"));
        assert!(display.contains("48 vertices"));
        assert!(display.contains("2 seam duplicates"));
    }
}

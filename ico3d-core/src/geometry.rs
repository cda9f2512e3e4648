/// Triangle-soup render mesh built from generated icosphere buffers
use nalgebra::{Point3, Vector2, Vector3};

use crate::icosphere::IcoSphereGeometry;

/// A 3D vertex with position, normal and texture coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
    pub tex_coord: Vector2<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, tex_coord: Vector2<f32>) -> Self {
        Self {
            position,
            normal,
            tex_coord,
        }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Counter-clockwise geometric normal, zero for a degenerate triangle
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1
            .cross(&edge2)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&IcoSphereGeometry> for Mesh {
    fn from(geometry: &IcoSphereGeometry) -> Self {
        let vertex = |i: u32| {
            let i = i as usize;
            Vertex::new(geometry.position(i), geometry.normal(i), geometry.tex_coord(i))
        };

        let mut mesh = Self::with_capacity(geometry.triangle_count());
        for [a, b, c] in geometry.triangles() {
            mesh.add_triangle(Triangle::new(vertex(a), vertex(b), vertex(c)));
        }
        mesh
    }
}

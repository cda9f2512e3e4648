/// Base icosahedron: 12 unit vertices and 20 counter-clockwise faces.
///
/// Poles sit on the z axis. The upper ring (z = 1/sqrt(5)) is at longitudes
/// 18 + 72k degrees and the lower ring (z = -1/sqrt(5)) at 54 + 72k degrees,
/// so no base vertex lies on the `u = 0` texture seam (y = 0, x < 0).
use nalgebra::Point3;

// Ring radius 2/sqrt(5) split into cos/sin components of 18 and 54 degrees.
const A: f32 = 0.850_650_8;
const B: f32 = 0.276_393_2;
const C: f32 = 0.525_731_1;
const D: f32 = 0.723_606_8;
const R: f32 = 0.894_427_2;
const H: f32 = 0.447_213_6;

pub const BASE_VERTICES: [[f32; 3]; 12] = [
    [0.0, 0.0, 1.0],
    // upper ring: 18, 90, 162, 234, 306 degrees
    [A, B, H],
    [0.0, R, H],
    [-A, B, H],
    [-C, -D, H],
    [C, -D, H],
    // lower ring: 54, 126, 198, 270, 342 degrees
    [C, D, -H],
    [-C, D, -H],
    [-A, -B, -H],
    [0.0, -R, -H],
    [A, -B, -H],
    [0.0, 0.0, -1.0],
];

pub const BASE_TRIANGLES: [[u32; 3]; 20] = [
    // north cap
    [0, 1, 2],
    [0, 2, 3],
    [0, 3, 4],
    [0, 4, 5],
    [0, 5, 1],
    // band, pointing down
    [1, 6, 2],
    [2, 7, 3],
    [3, 8, 4],
    [4, 9, 5],
    [5, 10, 1],
    // band, pointing up
    [6, 7, 2],
    [7, 8, 3],
    [8, 9, 4],
    [9, 10, 5],
    [10, 6, 1],
    // south cap
    [11, 7, 6],
    [11, 8, 7],
    [11, 9, 8],
    [11, 10, 9],
    [11, 6, 10],
];

/// Base vertices projected onto the unit sphere.
pub fn base_vertices() -> Vec<Point3<f32>> {
    BASE_VERTICES
        .iter()
        .map(|&[x, y, z]| {
            let p = Point3::new(x, y, z);
            Point3::from(p.coords.normalize())
        })
        .collect()
}

/// Base faces as a flat index buffer.
pub fn base_indices() -> Vec<u32> {
    BASE_TRIANGLES.iter().flatten().copied().collect()
}

/// STL export for binary and ASCII formats
use std::io::Write;

use log::info;
use nalgebra::Vector3;

use crate::error::IcoResult;
use crate::geometry::Mesh;

const HEADER_LEN: usize = 80;

/// Write a binary STL: 80-byte header, little-endian triangle count, then
/// 50 bytes per facet (normal, three vertices, attribute byte count).
pub fn write_binary_stl<W: Write>(mesh: &Mesh, name: &str, writer: &mut W) -> IcoResult<()> {
    let mut header = [0u8; HEADER_LEN];
    let name = name.as_bytes();
    let len = name.len().min(HEADER_LEN);
    header[..len].copy_from_slice(&name[..len]);
    writer.write_all(&header)?;

    writer.write_all(&(mesh.triangles.len() as u32).to_le_bytes())?;

    for triangle in &mesh.triangles {
        write_vector_le(writer, &triangle.calculate_normal())?;
        for vertex in &triangle.vertices {
            write_vector_le(writer, &vertex.position.coords)?;
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }

    info!("Wrote binary STL '{}' with {} facets", String::from_utf8_lossy(name), mesh.triangles.len());
    Ok(())
}

/// Write an ASCII STL (`solid <name>` ... `endsolid <name>`).
pub fn write_ascii_stl<W: Write>(mesh: &Mesh, name: &str, writer: &mut W) -> IcoResult<()> {
    writeln!(writer, "solid {}", name)?;
    for triangle in &mesh.triangles {
        let n = triangle.calculate_normal();
        writeln!(writer, "  facet normal {:e} {:e} {:e}", n.x, n.y, n.z)?;
        writeln!(writer, "    outer loop")?;
        for vertex in &triangle.vertices {
            let p = vertex.position;
            writeln!(writer, "      vertex {:e} {:e} {:e}", p.x, p.y, p.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid {}", name)?;

    info!("Wrote ASCII STL '{}' with {} facets", name, mesh.triangles.len());
    Ok(())
}

fn write_vector_le<W: Write>(writer: &mut W, v: &Vector3<f32>) -> std::io::Result<()> {
    for c in [v.x, v.y, v.z] {
        writer.write_all(&c.to_le_bytes())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icosphere::IcoSphereGeometry;
    use crate::params::IcoSphereParams;

    fn sphere_mesh() -> Mesh {
        let sphere = IcoSphereGeometry::generate(&IcoSphereParams::new()).unwrap();
        Mesh::from(&sphere)
    }

    #[test]
    fn test_binary_layout() {
        let mesh = sphere_mesh();
        let mut data = Vec::new();
        write_binary_stl(&mesh, "icosphere", &mut data).unwrap();

        assert_eq!(data.len(), 84 + 50 * 20);
        assert_eq!(&data[..9], b"icosphere");
        assert!(data[9..80].iter().all(|&b| b == 0));
        assert_eq!(u32::from_le_bytes([data[80], data[81], data[82], data[83]]), 20);

        // First vertex of the first facet is the north pole.
        let z = f32::from_le_bytes([data[84 + 20], data[84 + 21], data[84 + 22], data[84 + 23]]);
        assert_eq!(z, 1.0);
    }

    #[test]
    fn test_binary_long_name_truncated() {
        let mut data = Vec::new();
        write_binary_stl(&Mesh::new(), &"x".repeat(200), &mut data).unwrap();
        assert_eq!(data.len(), 84);
        assert!(data[..80].iter().all(|&b| b == b'x'));
    }

    #[test]
    fn test_ascii_structure() {
        let mesh = sphere_mesh();
        let mut data = Vec::new();
        write_ascii_stl(&mesh, "ico", &mut data).unwrap();
        let text = String::from_utf8(data).unwrap();

        assert!(text.starts_with("solid ico\n"));
        assert!(text.trim_end().ends_with("endsolid ico"));
        assert_eq!(text.matches("facet normal").count(), 20);
        assert_eq!(text.matches("vertex").count(), 60);
    }
}

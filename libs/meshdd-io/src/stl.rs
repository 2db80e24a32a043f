//! STL (Stereolithography) file format support.
//!
//! STL stores a triangle soup without shared vertices or attributes. The
//! reader welds bit-identical positions back into an indexed mesh so that
//! the classifier sees a connected surface; the writer emits one facet per
//! triangle with its geometric normal.
//!
//! # Binary Format
//!
//! ```text
//! UINT8[80]    – Header
//! UINT32       – Number of triangles
//! foreach triangle
//!     REAL32[3] – Normal vector
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count
//! end
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use glam::DVec3;
use meshdd::clean::clean;
use meshdd::{Mesh, MeshSource};
use tracing::debug;

use crate::error::{IoError, IoResult};

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one triangle in binary STL (normal + 3 vertices + attribute).
const TRIANGLE_SIZE: usize = 50;

/// Mesh source reading and writing STL files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StlMeshSource {
    /// Write binary instead of ASCII.
    pub binary: bool,
}

impl Default for StlMeshSource {
    fn default() -> Self {
        Self { binary: true }
    }
}

impl MeshSource for StlMeshSource {
    type Error = IoError;

    fn read(&self, path: &Path) -> IoResult<Mesh> {
        load_stl(path)
    }

    fn write(&mut self, path: &Path, mesh: &Mesh) -> IoResult<()> {
        save_stl(mesh, path, self.binary)
    }
}

/// Loads a mesh from an STL file, detecting ASCII and binary content.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid STL.
pub fn load_stl<P: AsRef<Path>>(path: P) -> IoResult<Mesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| IoError::from_open(path, e))?;
    let mesh = read_stl(BufReader::new(file))?;
    debug!(
        path = %path.display(),
        vertices = mesh.vertex_count(),
        faces = mesh.triangle_count(),
        "read STL"
    );
    Ok(mesh)
}

/// Reads STL data and welds identical positions.
pub fn read_stl<R: BufRead>(mut reader: R) -> IoResult<Mesh> {
    let mut head = Vec::with_capacity(HEADER_SIZE + 4);
    (&mut reader).take((HEADER_SIZE + 4) as u64).read_to_end(&mut head)?;

    if head.len() < 6 {
        return Err(IoError::invalid_content("file too small to be valid STL"));
    }

    let ascii = String::from_utf8_lossy(&head[..head.len().min(HEADER_SIZE)])
        .trim_start()
        .starts_with("solid")
        && !head[..head.len().min(HEADER_SIZE)].contains(&0);

    let soup = if ascii {
        read_ascii(head.as_slice().chain(reader))?
    } else {
        read_binary(&head, reader)?
    };

    Ok(clean(&soup, 0.0))
}

/// Reads binary triangles following the already consumed header.
fn read_binary<R: Read>(head: &[u8], mut reader: R) -> IoResult<Mesh> {
    if head.len() < HEADER_SIZE + 4 {
        return Err(IoError::InvalidHeader {
            expected: HEADER_SIZE + 4,
            got: head.len(),
        });
    }

    let face_count = u32::from_le_bytes([
        head[HEADER_SIZE],
        head[HEADER_SIZE + 1],
        head[HEADER_SIZE + 2],
        head[HEADER_SIZE + 3],
    ]);

    let mut mesh = Mesh::with_capacity(face_count as usize * 3, face_count as usize);
    let mut buf = [0u8; TRIANGLE_SIZE];
    for i in 0..face_count {
        reader.read_exact(&mut buf).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                IoError::InvalidFaceCount {
                    expected: face_count,
                    got: i,
                }
            } else {
                IoError::Io(e)
            }
        })?;

        // Skip the stored normal
        let a = mesh.add_vertex(read_vertex(&buf[12..24]));
        let b = mesh.add_vertex(read_vertex(&buf[24..36]));
        let c = mesh.add_vertex(read_vertex(&buf[36..48]));
        mesh.add_triangle(a, b, c);
    }

    Ok(mesh)
}

/// Reads a vertex from 12 bytes (3 f32s).
fn read_vertex(buf: &[u8]) -> DVec3 {
    let x = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let y = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let z = f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    DVec3::new(f64::from(x), f64::from(y), f64::from(z))
}

/// Reads ASCII facets.
fn read_ascii<R: BufRead>(reader: R) -> IoResult<Mesh> {
    let mut mesh = Mesh::new();
    let mut corners: Vec<DVec3> = Vec::with_capacity(3);

    for line in reader.lines() {
        let line = line?;
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("outer") => corners.clear(),
            Some("vertex") => {
                let mut coord = || -> IoResult<f64> {
                    let token = parts
                        .next()
                        .ok_or_else(|| IoError::invalid_content("vertex with fewer than 3 coordinates"))?;
                    Ok(token.parse()?)
                };
                corners.push(DVec3::new(coord()?, coord()?, coord()?));
            }
            Some("endfacet") => {
                let [a, b, c] = <[DVec3; 3]>::try_from(corners.as_slice()).map_err(|_| {
                    IoError::invalid_content(format!("facet with {} vertices", corners.len()))
                })?;
                let base = mesh.add_vertex(a);
                mesh.add_vertex(b);
                mesh.add_vertex(c);
                mesh.add_triangle(base, base + 1, base + 2);
                corners.clear();
            }
            Some("endsolid") => break,
            _ => {}
        }
    }

    Ok(mesh)
}

/// Saves a mesh to an STL file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_stl<P: AsRef<Path>>(mesh: &Mesh, path: P, binary: bool) -> IoResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);

    if binary {
        write_binary(mesh, &mut writer)?;
    } else {
        write_ascii(mesh, &mut writer)?;
    }
    writer.flush()?;

    debug!(
        path = %path.display(),
        faces = mesh.triangle_count(),
        binary,
        "wrote STL"
    );
    Ok(())
}

/// Unit geometric normal of a triangle, zero when degenerate.
fn facet_normal(mesh: &Mesh, tri: [u32; 3]) -> DVec3 {
    let [v0, v1, v2] = tri.map(|i| mesh.vertex(i));
    (v1 - v0).cross(v2 - v0).normalize_or_zero()
}

fn write_binary<W: Write>(mesh: &Mesh, writer: &mut W) -> IoResult<()> {
    let mut header = [b' '; HEADER_SIZE];
    let text = b"Binary STL generated by meshdd";
    header[..text.len()].copy_from_slice(text);
    writer.write_all(&header)?;

    let face_count = u32::try_from(mesh.triangle_count())
        .map_err(|_| IoError::invalid_content("too many triangles for binary STL"))?;
    writer.write_all(&face_count.to_le_bytes())?;

    for &tri in mesh.triangles() {
        write_vector(writer, facet_normal(mesh, tri))?;
        for i in tri {
            write_vector(writer, mesh.vertex(i))?;
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }

    Ok(())
}

/// Writes a vector as 3 little-endian f32s.
fn write_vector<W: Write>(writer: &mut W, v: DVec3) -> IoResult<()> {
    for c in v.to_array() {
        writer.write_all(&(c as f32).to_le_bytes())?;
    }
    Ok(())
}

fn write_ascii<W: Write>(mesh: &Mesh, writer: &mut W) -> IoResult<()> {
    writeln!(writer, "solid meshdd")?;
    for &tri in mesh.triangles() {
        let n = facet_normal(mesh, tri);
        writeln!(writer, "  facet normal {:e} {:e} {:e}", n.x, n.y, n.z)?;
        writeln!(writer, "    outer loop")?;
        for i in tri {
            let v = mesh.vertex(i);
            writeln!(writer, "      vertex {:e} {:e} {:e}", v.x, v.y, v.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid meshdd")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshdd::classify::EdgeAdjacency;
    use meshdd::primitives::create_uv_sphere;
    use std::io::Cursor;

    #[test]
    fn roundtrip_binary_welds_vertices() {
        let original = create_uv_sphere(1.0, 12, 5).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sphere.stl");

        save_stl(&original, &path, true).unwrap();
        let loaded = load_stl(&path).unwrap();

        assert_eq!(loaded.vertex_count(), original.vertex_count());
        assert_eq!(loaded.triangle_count(), original.triangle_count());
        assert!(EdgeAdjacency::build(loaded.triangles()).is_watertight());
        assert!((loaded.signed_volume() - original.signed_volume()).abs() < 1e-5);
    }

    #[test]
    fn roundtrip_ascii() {
        let original = create_uv_sphere(1.0, 6, 2).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sphere_ascii.stl");

        save_stl(&original, &path, false).unwrap();
        let loaded = load_stl(&path).unwrap();
        assert_eq!(loaded.vertex_count(), original.vertex_count());
        assert_eq!(loaded.triangle_count(), original.triangle_count());
        assert!(EdgeAdjacency::build(loaded.triangles()).is_watertight());
    }

    #[test]
    fn ascii_parsing() {
        let data = "solid test\n\
            facet normal 0 0 1\n\
              outer loop\n\
                vertex 0 0 0\n\
                vertex 1 0 0\n\
                vertex 0 1 0\n\
              endloop\n\
            endfacet\n\
            endsolid test\n";
        let mesh = read_stl(Cursor::new(data)).unwrap();
        assert_eq!(mesh.triangles(), &[[0, 1, 2]]);
        assert_eq!(mesh.vertex(2), DVec3::Y);
    }

    #[test]
    fn truncated_binary_reports_face_count() {
        let mut data = vec![0u8; HEADER_SIZE];
        data.extend_from_slice(&2u32.to_le_bytes());
        data.extend_from_slice(&[0u8; TRIANGLE_SIZE]);
        let err = read_stl(Cursor::new(data)).unwrap_err();
        assert!(matches!(err, IoError::InvalidFaceCount { expected: 2, got: 1 }));
    }

    #[test]
    fn short_binary_header() {
        let err = read_stl(Cursor::new(vec![1u8; 40])).unwrap_err();
        assert!(matches!(err, IoError::InvalidHeader { got: 40, .. }));
    }

    #[test]
    fn load_nonexistent_file() {
        let err = load_stl("/nonexistent/path/mesh.stl").unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }
}

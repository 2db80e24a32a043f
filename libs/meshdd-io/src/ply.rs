//! PLY (Polygon File Format) support.
//!
//! # Supported Properties
//!
//! - Vertex positions `x`, `y`, `z` - required
//! - Vertex normals `nx`, `ny`, `nz` - optional
//! - Texture coordinates `s`, `t` (or `u`, `v`, `texture_u`, `texture_v`) -
//!   optional
//! - Face vertex indices (`vertex_indices` or `vertex_index`) - triangles
//!   only
//!
//! Positions and attributes are written as doubles so a written mesh reads
//! back bit-for-bit.
//!
//! # Example
//!
//! ```no_run
//! use meshdd::MeshSource;
//! use meshdd_io::PlyMeshSource;
//! use std::path::Path;
//!
//! let mut source = PlyMeshSource::binary();
//! let mesh = source.read(Path::new("sphere.ply")).unwrap();
//! source.write(Path::new("copy.ply"), &mesh).unwrap();
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use glam::{DVec2, DVec3};
use meshdd::{Mesh, MeshError, MeshSource};
use ply_rs::parser::Parser;
use ply_rs::ply::{
    Addable, DefaultElement, ElementDef, Encoding, Ply, Property, PropertyDef, PropertyType,
    ScalarType,
};
use ply_rs::writer::Writer;
use tracing::debug;

use crate::error::{IoError, IoResult};

/// Texture coordinate property names, in lookup order.
const UV_KEYS: [(&str, &str); 3] = [("s", "t"), ("u", "v"), ("texture_u", "texture_v")];

/// Face index list property names, in lookup order.
const INDEX_KEYS: [&str; 2] = ["vertex_indices", "vertex_index"];

/// Mesh source reading and writing PLY files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlyMeshSource {
    /// Write binary little-endian instead of ASCII.
    pub binary: bool,
}

impl PlyMeshSource {
    /// Source writing ASCII files.
    pub fn ascii() -> Self {
        Self { binary: false }
    }

    /// Source writing binary little-endian files.
    pub fn binary() -> Self {
        Self { binary: true }
    }
}

impl MeshSource for PlyMeshSource {
    type Error = IoError;

    fn read(&self, path: &Path) -> IoResult<Mesh> {
        load_ply(path)
    }

    fn write(&mut self, path: &Path, mesh: &Mesh) -> IoResult<()> {
        save_ply(mesh, path, self.binary)
    }
}

/// Loads a triangle mesh from a PLY file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid PLY, lacks
/// vertex positions, or holds a face that is not a triangle.
pub fn load_ply<P: AsRef<Path>>(path: P) -> IoResult<Mesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| IoError::from_open(path, e))?;
    let mesh = read_ply(&mut BufReader::new(file))?;
    debug!(
        path = %path.display(),
        vertices = mesh.vertex_count(),
        faces = mesh.triangle_count(),
        "read PLY"
    );
    Ok(mesh)
}

/// Reads a triangle mesh from PLY data.
pub fn read_ply<R: BufRead>(reader: &mut R) -> IoResult<Mesh> {
    let parser = Parser::<DefaultElement>::new();

    let header = parser
        .read_header(reader)
        .map_err(|e| IoError::invalid_content(format!("failed to parse PLY header: {e}")))?;
    let payload = parser
        .read_payload(reader, &header)
        .map_err(|e| IoError::invalid_content(format!("failed to read PLY payload: {e}")))?;

    let no_elements = Vec::new();
    let vertex_elements = payload.get("vertex").unwrap_or(&no_elements);
    let face_elements = payload.get("face").unwrap_or(&no_elements);

    let vertices = vertex_elements
        .iter()
        .enumerate()
        .map(|(i, e)| vector(e, i, ["x", "y", "z"]))
        .collect::<IoResult<Vec<_>>>()?;

    let first = vertex_elements.first();
    let has_normals = first.is_some_and(|e| e.contains_key("nx"));
    let uv_keys = first.and_then(|e| UV_KEYS.into_iter().find(|(u, _)| e.contains_key(*u)));

    let mut faces = Vec::with_capacity(face_elements.len());
    for (i, element) in face_elements.iter().enumerate() {
        let indices = index_list(element, i)?;
        let [a, b, c] = <[u32; 3]>::try_from(indices.as_slice()).map_err(|_| {
            MeshError::invalid_topology(format!(
                "face {i} has {} vertices, only triangles are supported",
                indices.len()
            ))
        })?;
        faces.push([a, b, c]);
    }

    let mut mesh = Mesh::from_buffers(vertices, faces)?;

    if has_normals {
        let normals = vertex_elements
            .iter()
            .enumerate()
            .map(|(i, e)| vector(e, i, ["nx", "ny", "nz"]))
            .collect::<IoResult<Vec<_>>>()?;
        mesh.set_normals(normals)?;
    }

    if let Some((u, v)) = uv_keys {
        let uvs = vertex_elements
            .iter()
            .enumerate()
            .map(|(i, e)| Ok(DVec2::new(scalar(e, i, u)?, scalar(e, i, v)?)))
            .collect::<IoResult<Vec<_>>>()?;
        mesh.set_uvs(uvs)?;
    }

    Ok(mesh)
}

/// Reads a numeric property of vertex `index` as f64.
fn scalar(element: &DefaultElement, index: usize, key: &str) -> IoResult<f64> {
    let value = match element.get(key) {
        Some(Property::Double(v)) => *v,
        Some(Property::Float(v)) => f64::from(*v),
        Some(Property::Int(v)) => f64::from(*v),
        Some(Property::UInt(v)) => f64::from(*v),
        Some(Property::Short(v)) => f64::from(*v),
        Some(Property::UShort(v)) => f64::from(*v),
        Some(Property::Char(v)) => f64::from(*v),
        Some(Property::UChar(v)) => f64::from(*v),
        _ => {
            return Err(IoError::invalid_content(format!(
                "vertex {index} lacks numeric property '{key}'"
            )))
        }
    };
    Ok(value)
}

fn vector(element: &DefaultElement, index: usize, keys: [&str; 3]) -> IoResult<DVec3> {
    Ok(DVec3::new(
        scalar(element, index, keys[0])?,
        scalar(element, index, keys[1])?,
        scalar(element, index, keys[2])?,
    ))
}

/// Extracts the vertex index list of face `index`.
fn index_list(element: &DefaultElement, index: usize) -> IoResult<Vec<u32>> {
    let negative = || IoError::invalid_content(format!("face {index} has a negative vertex index"));

    for key in INDEX_KEYS {
        let Some(prop) = element.get(key) else {
            continue;
        };
        return match prop {
            Property::ListInt(v) => v.iter().map(|&i| u32::try_from(i).map_err(|_| negative())).collect(),
            Property::ListShort(v) => v.iter().map(|&i| u32::try_from(i).map_err(|_| negative())).collect(),
            Property::ListChar(v) => v.iter().map(|&i| u32::try_from(i).map_err(|_| negative())).collect(),
            Property::ListUInt(v) => Ok(v.clone()),
            Property::ListUShort(v) => Ok(v.iter().map(|&i| u32::from(i)).collect()),
            Property::ListUChar(v) => Ok(v.iter().map(|&i| u32::from(i)).collect()),
            _ => Err(IoError::invalid_content(format!(
                "face {index} property '{key}' is not an integer list"
            ))),
        };
    }

    Err(IoError::invalid_content(format!(
        "face {index} has no vertex index list"
    )))
}

/// Saves a mesh to a PLY file, binary little-endian or ASCII.
///
/// Normals and texture coordinates are written when the mesh carries them.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_ply<P: AsRef<Path>>(mesh: &Mesh, path: P, binary: bool) -> IoResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);

    if binary {
        write_ply_binary(mesh, &mut writer)?;
    } else {
        write_ply_ascii(mesh, &mut writer)?;
    }
    writer.flush()?;

    debug!(
        path = %path.display(),
        vertices = mesh.vertex_count(),
        faces = mesh.triangle_count(),
        binary,
        "wrote PLY"
    );
    Ok(())
}

/// Vertex property names written for `mesh`.
fn vertex_keys(mesh: &Mesh) -> Vec<&'static str> {
    let mut keys = vec!["x", "y", "z"];
    if mesh.normals().is_some() {
        keys.extend(["nx", "ny", "nz"]);
    }
    if mesh.uvs().is_some() {
        keys.extend(["s", "t"]);
    }
    keys
}

/// Vertex property values in the order of [`vertex_keys`].
fn vertex_values(mesh: &Mesh, index: usize) -> Vec<f64> {
    let p = mesh.vertices()[index];
    let mut values = vec![p.x, p.y, p.z];
    if let Some(normals) = mesh.normals() {
        let n = normals[index];
        values.extend([n.x, n.y, n.z]);
    }
    if let Some(uvs) = mesh.uvs() {
        let uv = uvs[index];
        values.extend([uv.x, uv.y]);
    }
    values
}

/// Writes binary little-endian PLY.
///
/// Written by hand: the `ply-rs` binary writer emits the element count in
/// place of the list length for list properties.
fn write_ply_binary<W: Write>(mesh: &Mesh, writer: &mut W) -> IoResult<()> {
    writeln!(writer, "ply")?;
    writeln!(writer, "format binary_little_endian 1.0")?;
    writeln!(writer, "comment meshdd")?;
    writeln!(writer, "element vertex {}", mesh.vertex_count())?;
    for key in vertex_keys(mesh) {
        writeln!(writer, "property double {key}")?;
    }
    writeln!(writer, "element face {}", mesh.triangle_count())?;
    writeln!(writer, "property list uchar uint vertex_indices")?;
    writeln!(writer, "end_header")?;

    for i in 0..mesh.vertex_count() {
        for value in vertex_values(mesh, i) {
            writer.write_all(&value.to_le_bytes())?;
        }
    }

    for tri in mesh.triangles() {
        writer.write_all(&[3u8])?;
        for index in tri {
            writer.write_all(&index.to_le_bytes())?;
        }
    }

    Ok(())
}

/// Writes ASCII PLY through `ply-rs`.
fn write_ply_ascii<W: Write>(mesh: &Mesh, writer: &mut W) -> IoResult<()> {
    let mut ply = Ply::<DefaultElement>::new();
    ply.header.encoding = Encoding::Ascii;
    ply.header.comments.push("meshdd".to_string());

    let keys = vertex_keys(mesh);
    let mut vertex_def = ElementDef::new("vertex".to_string());
    for key in &keys {
        vertex_def.properties.add(PropertyDef::new(
            key.to_string(),
            PropertyType::Scalar(ScalarType::Double),
        ));
    }
    vertex_def.count = mesh.vertex_count();
    ply.header.elements.add(vertex_def);

    let mut face_def = ElementDef::new("face".to_string());
    face_def.properties.add(PropertyDef::new(
        "vertex_indices".to_string(),
        PropertyType::List(ScalarType::UChar, ScalarType::UInt),
    ));
    face_def.count = mesh.triangle_count();
    ply.header.elements.add(face_def);

    let vertex_elements = (0..mesh.vertex_count())
        .map(|i| {
            let mut element = DefaultElement::new();
            for (key, value) in keys.iter().zip(vertex_values(mesh, i)) {
                element.insert(key.to_string(), Property::Double(value));
            }
            element
        })
        .collect();
    ply.payload.insert("vertex".to_string(), vertex_elements);

    let face_elements = mesh
        .triangles()
        .iter()
        .map(|tri| {
            let mut element = DefaultElement::new();
            element.insert("vertex_indices".to_string(), Property::ListUInt(tri.to_vec()));
            element
        })
        .collect();
    ply.payload.insert("face".to_string(), face_elements);

    Writer::new()
        .write_ply(writer, &mut ply)
        .map_err(|e| IoError::invalid_content(format!("failed to write PLY: {e}")))?;

    Ok(())
}

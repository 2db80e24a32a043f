//! # Mesh Data Structure
//!
//! Triangle mesh with vertex positions, face indices and the optional
//! per-vertex normals and texture coordinates used by displacement.

use crate::error::{check_faces, check_len, MeshError};
use glam::{DVec2, DVec3};

/// A triangle mesh with vertices, indices and optional vertex attributes.
///
/// All geometry uses f64. Face winding defines the outward normal.
///
/// # Example
///
/// ```rust
/// use meshdd::Mesh;
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
/// mesh.add_triangle(0, 1, 2);
/// assert_eq!(mesh.triangle_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions
    vertices: Vec<DVec3>,
    /// Triangle indices (3 indices per triangle)
    triangles: Vec<[u32; 3]>,
    /// Optional vertex normals, used as displacement directions
    normals: Option<Vec<DVec3>>,
    /// Optional texture coordinates
    uvs: Option<Vec<DVec2>>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
            normals: None,
            uvs: None,
        }
    }

    /// Creates a mesh from vertex and face buffers.
    ///
    /// Fails if a face references a missing vertex or repeats an index.
    pub fn from_buffers(vertices: Vec<DVec3>, triangles: Vec<[u32; 3]>) -> Result<Self, MeshError> {
        check_faces(&triangles, vertices.len())?;
        Ok(Self {
            vertices,
            triangles,
            normals: None,
            uvs: None,
        })
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if the mesh has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Adds a vertex and returns its index.
    pub fn add_vertex(&mut self, position: DVec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        index
    }

    /// Adds a triangle by vertex indices.
    pub fn add_triangle(&mut self, v0: u32, v1: u32, v2: u32) {
        self.triangles.push([v0, v1, v2]);
    }

    /// Returns a reference to the vertices.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Returns a reference to the triangles.
    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Returns the vertex at the given index.
    #[inline]
    pub fn vertex(&self, index: u32) -> DVec3 {
        self.vertices[index as usize]
    }

    /// Returns the triangle at the given index.
    #[inline]
    pub fn triangle(&self, index: usize) -> [u32; 3] {
        self.triangles[index]
    }

    /// Sets vertex normals, one per vertex.
    pub fn set_normals(&mut self, normals: Vec<DVec3>) -> Result<(), MeshError> {
        check_len("normals", self.vertices.len(), normals.len())?;
        self.normals = Some(normals);
        Ok(())
    }

    /// Returns the vertex normals.
    pub fn normals(&self) -> Option<&[DVec3]> {
        self.normals.as_deref()
    }

    /// Sets texture coordinates, one per vertex.
    pub fn set_uvs(&mut self, uvs: Vec<DVec2>) -> Result<(), MeshError> {
        check_len("texture coordinates", self.vertices.len(), uvs.len())?;
        self.uvs = Some(uvs);
        Ok(())
    }

    /// Returns the texture coordinates.
    pub fn uvs(&self) -> Option<&[DVec2]> {
        self.uvs.as_deref()
    }

    /// Returns a mesh sharing this connectivity and these attributes but
    /// using new vertex positions.
    pub fn with_vertices(&self, vertices: Vec<DVec3>) -> Result<Self, MeshError> {
        check_len("vertices", self.vertices.len(), vertices.len())?;
        Ok(Self {
            vertices,
            triangles: self.triangles.clone(),
            normals: self.normals.clone(),
            uvs: self.uvs.clone(),
        })
    }

    /// Splits the mesh into its buffers.
    pub fn into_parts(self) -> (Vec<DVec3>, Vec<[u32; 3]>, Option<Vec<DVec3>>, Option<Vec<DVec2>>) {
        (self.vertices, self.triangles, self.normals, self.uvs)
    }

    /// Computes area weighted vertex normals and stores them.
    pub fn compute_normals(&mut self) {
        let mut normals = vec![DVec3::ZERO; self.vertices.len()];

        for tri in &self.triangles {
            let v0 = self.vertices[tri[0] as usize];
            let v1 = self.vertices[tri[1] as usize];
            let v2 = self.vertices[tri[2] as usize];

            let normal = (v1 - v0).cross(v2 - v0);

            normals[tri[0] as usize] += normal;
            normals[tri[1] as usize] += normal;
            normals[tri[2] as usize] += normal;
        }

        for normal in &mut normals {
            *normal = normal.normalize_or_zero();
        }

        self.normals = Some(normals);
    }

    /// Computes the axis-aligned bounding box.
    ///
    /// Returns (min, max) corners of the bounding box.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        if self.vertices.is_empty() {
            return (DVec3::ZERO, DVec3::ZERO);
        }

        let mut min = self.vertices[0];
        let mut max = self.vertices[0];

        for v in &self.vertices[1..] {
            min = min.min(*v);
            max = max.max(*v);
        }

        (min, max)
    }

    /// Scales all vertices uniformly about the origin.
    ///
    /// Normals keep their direction under a positive uniform scale.
    pub fn scale(&mut self, factor: f64) {
        for v in &mut self.vertices {
            *v *= factor;
        }
    }

    /// Reverses the winding of every triangle, flipping the surface
    /// orientation.
    pub fn flip(&mut self) {
        for tri in &mut self.triangles {
            tri.swap(1, 2);
        }
    }

    /// Returns a copy with reversed winding.
    pub fn flipped(&self) -> Self {
        let mut mesh = self.clone();
        mesh.flip();
        mesh
    }

    /// Signed enclosed volume (divergence theorem).
    ///
    /// Positive for a closed mesh whose faces point outward.
    pub fn signed_volume(&self) -> f64 {
        self.triangles
            .iter()
            .map(|tri| {
                let v0 = self.vertices[tri[0] as usize];
                let v1 = self.vertices[tri[1] as usize];
                let v2 = self.vertices[tri[2] as usize];
                v0.dot(v1.cross(v2))
            })
            .sum::<f64>()
            / 6.0
    }

    /// Validates face indices and attribute lengths.
    pub fn validate(&self) -> Result<(), MeshError> {
        check_faces(&self.triangles, self.vertices.len())?;
        if let Some(normals) = &self.normals {
            check_len("normals", self.vertices.len(), normals.len())?;
        }
        if let Some(uvs) = &self.uvs {
            check_len("texture coordinates", self.vertices.len(), uvs.len())?;
        }
        Ok(())
    }
}
